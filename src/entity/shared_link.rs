use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shared_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub key: Vec<u8>,
    pub slug: Option<String>,
    pub expires_at: Option<DateTimeWithTimeZone>,
    pub password: Option<String>,
    pub show_exif: bool,
    pub allow_upload: bool,
    pub allow_download: bool,
    pub album_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
