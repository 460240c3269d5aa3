use shared::Student;

/// Students whose name contains `term`, ignoring case.
///
/// A blank term matches nobody; the check-in page shows the selected class's
/// roster in that case instead.
pub fn filter_students_by_name(students: &[Student], term: &str) -> Vec<Student> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    students
        .iter()
        .filter(|student| student.name.to_lowercase().contains(&term))
        .cloned()
        .collect()
}
