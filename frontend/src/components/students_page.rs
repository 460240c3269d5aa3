use yew::prelude::*;
use web_sys::HtmlInputElement;
use wasm_bindgen_futures::spawn_local;
use shared::{Student, StudentRequest};

use super::flash::{show_flash, Flash, FlashMessage};
use crate::hooks::use_students::use_students;
use crate::services::api::ApiClient;

/// Raw text of the add/edit form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentForm {
    pub name: String,
    pub age: String,
    pub nfc_token: String,
}

impl StudentForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            age: student.age.to_string(),
            nfc_token: student.nfc_token.clone().unwrap_or_default(),
        }
    }

    /// Request body, or the message to show when name or age is unusable
    pub fn to_request(&self) -> Result<StudentRequest, String> {
        let name = self.name.trim();
        let age = self.age.trim().parse::<i64>().ok();
        if name.is_empty() || age.is_none() {
            return Err("Name and age are required".to_string());
        }

        let token = self.nfc_token.trim();
        Ok(StudentRequest {
            name: Some(name.to_string()),
            age,
            nfc_token: (!token.is_empty()).then(|| token.to_string()),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct StudentsPageProps {
    pub api_client: ApiClient,
}

#[function_component(StudentsPage)]
pub fn students_page(props: &StudentsPageProps) -> Html {
    let students = use_students(&props.api_client);
    let form = use_state(StudentForm::default);
    let editing = use_state(|| Option::<i64>::None);
    let show_modal = use_state(|| false);
    let saving = use_state(|| false);
    let flash = use_state(|| Option::<Flash>::None);

    let open_add = {
        let form = form.clone();
        let editing = editing.clone();
        let show_modal = show_modal.clone();
        Callback::from(move |_| {
            editing.set(None);
            form.set(StudentForm::default());
            show_modal.set(true);
        })
    };

    let close_modal = {
        let show_modal = show_modal.clone();
        Callback::from(move |_| show_modal.set(false))
    };

    let field = |update: fn(&mut StudentForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            update(&mut next, input.value());
            form.set(next);
        })
    };
    let on_name = field(|f, v| f.name = v);
    let on_age = field(|f, v| f.age = v);
    let on_token = field(|f, v| f.nfc_token = v);

    let on_submit = {
        let api_client = props.api_client.clone();
        let form = form.clone();
        let editing = editing.clone();
        let show_modal = show_modal.clone();
        let saving = saving.clone();
        let flash = flash.clone();
        let refresh = students.refresh.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let request = match form.to_request() {
                Ok(request) => request,
                Err(message) => {
                    show_flash(&flash, Flash::Error(message));
                    return;
                }
            };

            let api_client = api_client.clone();
            let editing_id = *editing;
            let form = form.clone();
            let show_modal = show_modal.clone();
            let saving = saving.clone();
            let flash = flash.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                saving.set(true);

                let result = match editing_id {
                    Some(id) => api_client.update_student(id, &request).await.map(|r| r.message),
                    None => api_client.create_student(&request).await.map(|r| r.message),
                };
                match result {
                    Ok(message) => {
                        show_flash(&flash, Flash::Success(message));
                        show_modal.set(false);
                        form.set(StudentForm::default());
                        refresh.emit(());
                    }
                    Err(e) => show_flash(&flash, Flash::Error(e)),
                }

                saving.set(false);
            });
        })
    };

    let on_edit = {
        let form = form.clone();
        let editing = editing.clone();
        let show_modal = show_modal.clone();
        Callback::from(move |student: Student| {
            editing.set(Some(student.id));
            form.set(StudentForm::from_student(&student));
            show_modal.set(true);
        })
    };

    let on_delete = {
        let api_client = props.api_client.clone();
        let flash = flash.clone();
        let refresh = students.refresh.clone();
        Callback::from(move |student_id: i64| {
            if !gloo::dialogs::confirm("Are you sure you want to delete this student?") {
                return;
            }

            let api_client = api_client.clone();
            let flash = flash.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match api_client.delete_student(student_id).await {
                    Ok(response) => {
                        show_flash(&flash, Flash::Success(response.message));
                        refresh.emit(());
                    }
                    Err(e) => show_flash(&flash, Flash::Error(e)),
                }
            });
        })
    };

    html! {
        <div class="page-container">
            <div class="page-header">
                <h1 class="page-title">{"Student Management"}</h1>
                <button class="btn btn-primary" onclick={open_add}>{"Add New Student"}</button>
            </div>
            <FlashMessage flash={(*flash).clone()} />
            {if let Some(error) = students.state.error.as_ref() {
                html! { <div class="alert alert-error">{format!("Failed to fetch students: {}", error)}</div> }
            } else { html! {} }}

            {if students.state.loading && !*show_modal {
                html! { <div class="loading"><div class="spinner"></div></div> }
            } else {
                html! {
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{"Name"}</th>
                                <th>{"Age"}</th>
                                <th>{"NFC Token"}</th>
                                <th>{"Actions"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for students.state.students.iter().map(|student| {
                                let on_edit = on_edit.clone();
                                let on_delete = on_delete.clone();
                                let edit_target = student.clone();
                                let delete_id = student.id;
                                html! {
                                    <tr key={student.id}>
                                        <td>{&student.name}</td>
                                        <td>{student.age}</td>
                                        <td>{student.nfc_token.clone().unwrap_or_else(|| "-".to_string())}</td>
                                        <td>
                                            <div class="action-buttons">
                                                <button class="btn btn-secondary btn-small"
                                                    onclick={Callback::from(move |_| on_edit.emit(edit_target.clone()))}>
                                                    {"Edit"}
                                                </button>
                                                <button class="btn btn-danger btn-small"
                                                    onclick={Callback::from(move |_| on_delete.emit(delete_id))}>
                                                    {"Delete"}
                                                </button>
                                            </div>
                                        </td>
                                    </tr>
                                }
                            })}
                        </tbody>
                    </table>
                }
            }}

            {if students.state.students.is_empty() && !students.state.loading {
                html! { <p class="empty-state">{"No students found. Click \"Add New Student\" to get started."}</p> }
            } else { html! {} }}

            {if *show_modal {
                html! {
                    <div class="modal-overlay">
                        <div class="modal">
                            <div class="modal-header">
                                <h2 class="modal-title">
                                    {if editing.is_some() { "Edit Student" } else { "Add New Student" }}
                                </h2>
                                <button class="close-btn" onclick={close_modal.clone()}>{"×"}</button>
                            </div>
                            <form onsubmit={on_submit}>
                                <div class="form-group">
                                    <label for="student-name">{"Name *"}</label>
                                    <input id="student-name" type="text" value={form.name.clone()} oninput={on_name} />
                                </div>
                                <div class="form-group">
                                    <label for="student-age">{"Age *"}</label>
                                    <input id="student-age" type="number" min="1" value={form.age.clone()} oninput={on_age} />
                                </div>
                                <div class="form-group">
                                    <label for="student-token">{"NFC Token (optional)"}</label>
                                    <input id="student-token" type="text" placeholder="For future NFC check-in"
                                        value={form.nfc_token.clone()} oninput={on_token} />
                                </div>
                                <div class="form-actions">
                                    <button type="button" class="btn btn-secondary" onclick={close_modal}>{"Cancel"}</button>
                                    <button type="submit" class="btn btn-primary" disabled={*saving}>
                                        {if *saving { "Saving..." } else if editing.is_some() { "Update" } else { "Create" }}
                                    </button>
                                </div>
                            </form>
                        </div>
                    </div>
                }
            } else { html! {} }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_name_and_numeric_age() {
        let form = StudentForm {
            name: "  ".to_string(),
            age: "9".to_string(),
            nfc_token: String::new(),
        };
        assert_eq!(form.to_request().unwrap_err(), "Name and age are required");

        let form = StudentForm {
            name: "Ana".to_string(),
            age: "nine".to_string(),
            nfc_token: String::new(),
        };
        assert!(form.to_request().is_err());
    }

    #[test]
    fn test_blank_token_is_omitted() {
        let form = StudentForm {
            name: " Ana ".to_string(),
            age: "9".to_string(),
            nfc_token: "   ".to_string(),
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.name.as_deref(), Some("Ana"));
        assert_eq!(request.age, Some(9));
        assert!(request.nfc_token.is_none());
    }
}
