//! 登录记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "login_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: i64,
    pub ip_address: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geo_provider: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_login_session(self) -> crate::models::sessions::entities::LoginSession {
        use crate::models::sessions::entities::{GeoLocation, LoginSession};

        LoginSession {
            id: self.id,
            user_id: self.user_id,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            location: GeoLocation {
                city: self.city,
                region: self.region,
                country: self.country,
                latitude: self.latitude,
                longitude: self.longitude,
                provider: self.geo_provider,
            },
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
