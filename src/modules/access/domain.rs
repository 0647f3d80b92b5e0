/// One (resource-kind, verb) pair from §4.3's permission table.
///
/// `AssetRead` stands in for `asset.read`/`asset.view`/`asset.download` —
/// spec.md groups all three under one predicate, so they share one variant
/// here; callers that need to distinguish them for shared-link gating
/// (`allowDownload`) do so separately in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    AssetRead,
    AssetUpdate,
    AssetDelete,
    AssetShare,
    AssetReplace,
    AssetCopy,
    AssetUpload,
    AlbumRead,
    AlbumUpdate,
    AlbumDelete,
    AlbumShare,
    /// ids are album ids; requires the album to have `isActivityEnabled`.
    ActivityCreate,
    /// ids are the *other* user's id in the partnership (the `sharedById` side).
    PartnerUpdate,
}

impl Permission {
    /// Matches the teacher's `kind.verb` grant-string convention, used both
    /// for API-key permission sets and for error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::AssetRead => "asset.read",
            Permission::AssetUpdate => "asset.update",
            Permission::AssetDelete => "asset.delete",
            Permission::AssetShare => "asset.share",
            Permission::AssetReplace => "asset.replace",
            Permission::AssetCopy => "asset.copy",
            Permission::AssetUpload => "asset.upload",
            Permission::AlbumRead => "album.read",
            Permission::AlbumUpdate => "album.update",
            Permission::AlbumDelete => "album.delete",
            Permission::AlbumShare => "album.share",
            Permission::ActivityCreate => "activity.create",
            Permission::PartnerUpdate => "partner.update",
        }
    }

    fn is_read_only(self) -> bool {
        matches!(self, Permission::AssetRead | Permission::AlbumRead)
    }

    /// Whether a shared-link principal can ever be granted this permission,
    /// independent of the ids requested (§4.3: "only *.read/view/download and
    /// the link's allowed writes are grantable").
    pub(super) fn grantable_to_shared_link(self, allow_upload: bool, allow_download: bool) -> bool {
        match self {
            Permission::AssetRead => allow_download || true, // viewing is always allowed; download gates the byte stream itself
            Permission::AssetUpload => allow_upload,
            _ => self.is_read_only(),
        }
    }
}
