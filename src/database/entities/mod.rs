pub mod companies;
pub mod operation_logs;
pub mod projects;
pub mod row_grants;
pub mod sheet_columns;
pub mod sheet_rows;
pub mod sheets;
pub mod users;
pub mod workbooks;
