use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "asset_exif")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub asset_id: Uuid,
    pub make: Option<String>,
    pub model: Option<String>,
    pub exif_image_width: Option<i32>,
    pub exif_image_height: Option<i32>,
    pub orientation: Option<String>,
    pub date_time_original: Option<DateTimeWithTimeZone>,
    pub modify_date: Option<DateTimeWithTimeZone>,
    pub time_zone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub projection_type: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub fps: Option<f64>,
    pub exposure_time: Option<String>,
    pub rating: Option<i16>,
    pub iso: Option<i32>,
    pub f_number: Option<f64>,
    pub focal_length: Option<f64>,
    pub lens_model: Option<String>,
    pub live_photo_cid: Option<String>,
    pub auto_stack_id: Option<String>,
    pub colorspace: Option<String>,
    pub bits_per_sample: Option<i16>,
    pub profile_description: Option<String>,
    pub tags: Option<Json>,
    /// Names of fields a user has explicitly set; excluded from automatic
    /// overwrite by the next extractor run.
    pub locked_properties: Json,
    pub update_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Asset,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Asset => Entity::belongs_to(super::asset::Entity)
                .from(Column::AssetId)
                .to(super::asset::Column::Id)
                .into(),
        }
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
