pub mod prelude;

pub mod sheet_headers;
pub mod sheet_rows;
