use uuid::Uuid;

/// Who is making the request, resolved from the §6.1 credential chain.
#[derive(Debug, Clone)]
pub enum Principal {
    /// A logged-in user, identified by their session.
    User {
        user_id: Uuid,
        session_id: Uuid,
        is_admin: bool,
    },
    /// A programmatic caller using an API key scoped to a permission set.
    ApiKey {
        user_id: Uuid,
        key_id: Uuid,
        permissions: Vec<String>,
    },
    /// An anonymous caller holding a shared-link key or slug.
    SharedLink {
        link_id: Uuid,
        owner_id: Uuid,
        allow_upload: bool,
        allow_download: bool,
        show_exif: bool,
        album_id: Option<Uuid>,
    },
}

impl Principal {
    /// The user whose data is being accessed — the link's owner for a shared
    /// link, the key's holder for an API key, the session's user otherwise.
    pub fn effective_user_id(&self) -> Uuid {
        match self {
            Principal::User { user_id, .. } => *user_id,
            Principal::ApiKey { user_id, .. } => *user_id,
            Principal::SharedLink { owner_id, .. } => *owner_id,
        }
    }

    pub fn is_shared_link(&self) -> bool {
        matches!(self, Principal::SharedLink { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::User { is_admin: true, .. })
    }
}

/// Resolved principal plus request-scoped flags that gate §4.3's tie-breaks.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    /// True when an unexpired PIN unlock is active for this session
    /// (`visibility = 'locked'` gate, §4.3).
    pub has_elevated_permission: bool,
}

impl AuthContext {
    pub fn user_id(&self) -> Uuid {
        self.principal.effective_user_id()
    }
}
