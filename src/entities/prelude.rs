pub use super::sheet_headers::Entity as SheetHeaders;
pub use super::sheet_rows::Entity as SheetRows;
