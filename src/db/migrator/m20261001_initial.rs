use crate::entities::prelude::*;
use crate::entities::sheet_rows;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(SheetHeaders)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(SheetRows)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Not unique: deletes shift positions with a single UPDATE.
        manager
            .create_index(
                Index::create()
                    .name("idx_sheet_rows_table_position")
                    .table(SheetRows)
                    .col(sheet_rows::Column::TableName)
                    .col(sheet_rows::Column::Position)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SheetRows).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SheetHeaders).to_owned())
            .await?;

        Ok(())
    }
}
