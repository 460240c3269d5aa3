pub mod attendance_repository;
pub mod class_repository;
pub mod student_repository;

pub use attendance_repository::AttendanceRepository;
pub use class_repository::ClassRepository;
pub use student_repository::StudentRepository;
