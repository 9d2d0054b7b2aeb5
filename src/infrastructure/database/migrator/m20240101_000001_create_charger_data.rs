//! Create charger_data table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChargerData::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChargerData::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChargerData::ChargerName).string().not_null())
                    .col(ColumnDef::new(ChargerData::Timestamp).string().not_null())
                    .col(ColumnDef::new(ChargerData::PortId).string().not_null())
                    .col(ColumnDef::new(ChargerData::PortStatus).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Last-state lookups filter on charger_name first
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_charger_name")
                    .table(ChargerData::Table)
                    .col(ChargerData::ChargerName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChargerData::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChargerData {
    Table,
    Id,
    ChargerName,
    Timestamp,
    PortId,
    PortStatus,
}
