use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub library_id: Option<Uuid>,
    pub checksum: Vec<u8>,
    pub original_path: String,
    pub original_file_name: String,
    pub device_asset_id: String,
    pub device_id: String,
    pub r#type: AssetType,
    pub visibility: AssetVisibility,
    pub is_favorite: bool,
    pub file_created_at: DateTimeWithTimeZone,
    pub file_modified_at: DateTimeWithTimeZone,
    pub local_date_time: DateTimeWithTimeZone,
    pub file_size_in_byte: i64,
    pub duration_in_seconds: Option<f64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub thumbhash: Option<Vec<u8>>,
    pub live_photo_video_id: Option<Uuid>,
    pub stack_id: Option<Uuid>,
    pub status: AssetStatus,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub updated_at: DateTimeWithTimeZone,
    pub update_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "asset_type")]
pub enum AssetType {
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "audio")]
    Audio,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "asset_visibility")]
pub enum AssetVisibility {
    #[sea_orm(string_value = "timeline")]
    Timeline,
    #[sea_orm(string_value = "archive")]
    Archive,
    #[sea_orm(string_value = "hidden")]
    Hidden,
    #[sea_orm(string_value = "locked")]
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "asset_status")]
pub enum AssetStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "trashed")]
    Trashed,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Exif,
    Files,
    Metadata,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Exif => Entity::has_one(super::asset_exif::Entity).into(),
            Self::Files => Entity::has_many(super::asset_file::Entity).into(),
            Self::Metadata => Entity::has_many(super::asset_metadata::Entity).into(),
        }
    }
}

impl Related<super::asset_exif::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exif.def()
    }
}

impl Related<super::asset_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl Related<super::asset_metadata::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Metadata.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
