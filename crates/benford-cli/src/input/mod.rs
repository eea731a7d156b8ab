pub mod csv_table;
pub mod file;
pub mod request;
pub mod stdin;
