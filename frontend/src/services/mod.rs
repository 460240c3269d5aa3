pub mod api;
pub mod csv_export;
pub mod date_utils;
pub mod search;
