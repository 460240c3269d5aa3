pub mod attendance;
pub mod class;
pub mod student;

pub use attendance::NewCheckIn;
pub use class::NewClass;
pub use student::NewStudent;
