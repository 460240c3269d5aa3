pub mod use_class_roster;
pub mod use_students;
