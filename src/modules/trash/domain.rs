//! Trash (§4.8): soft-delete, restore, hard purge.

use serde::Serialize;

/// The uniform `{count}` shape every trash operation returns.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResult {
    pub count: u64,
}
