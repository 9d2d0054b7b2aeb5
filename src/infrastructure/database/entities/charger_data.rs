//! Charger data entity: one row per stored port status transition

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "charger_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub charger_name: String,

    /// RFC 3339 cycle timestamp, UTC
    pub timestamp: String,

    pub port_id: String,

    pub port_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
