use crate::constants::{columns, tables};
use crate::entities::prelude::*;
use crate::entities::sheet_headers;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SHEETS: [(&str, &[&str]); 4] = [
    (tables::SHOWS, columns::SHOWS),
    (tables::TEAM, columns::TEAM),
    (tables::STUDIOS, columns::DICTIONARY),
    (tables::ROLES, columns::DICTIONARY),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, header) in SHEETS {
            let columns_json =
                serde_json::to_string(header).map_err(|e| DbErr::Custom(e.to_string()))?;

            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(SheetHeaders)
                .columns([
                    sheet_headers::Column::TableName,
                    sheet_headers::Column::Columns,
                ])
                .values_panic([table.into(), columns_json.into()])
                .on_conflict(
                    OnConflict::column(sheet_headers::Column::TableName)
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables: Vec<&str> = SHEETS.iter().map(|(table, _)| *table).collect();
        let delete = sea_orm_migration::sea_query::Query::delete()
            .from_table(SheetHeaders)
            .and_where(Expr::col(sheet_headers::Column::TableName).is_in(tables))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
