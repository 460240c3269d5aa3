pub mod check_in_page;
pub mod classes_page;
pub mod flash;
pub mod header;
pub mod reports_page;
pub mod students_page;
