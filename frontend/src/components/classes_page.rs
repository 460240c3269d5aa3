use yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use wasm_bindgen_futures::spawn_local;
use shared::{Class, ClassRequest};

use super::flash::{show_flash, Flash, FlashMessage};
use crate::hooks::use_class_roster::use_class_roster;
use crate::hooks::use_students::use_students;
use crate::services::api::ApiClient;
use crate::services::date_utils::{day_name, day_options};

/// Raw values of the add/edit class form
#[derive(Clone, Debug, PartialEq)]
pub struct ClassForm {
    pub name: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
}

impl Default for ClassForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            day_of_week: 0,
            start_time: String::new(),
            end_time: String::new(),
            active: true,
        }
    }
}

impl ClassForm {
    pub fn from_class(class: &Class) -> Self {
        Self {
            name: class.name.clone(),
            day_of_week: class.day_of_week,
            start_time: class.start_time.clone(),
            end_time: class.end_time.clone(),
            active: class.active,
        }
    }

    pub fn to_request(&self) -> Result<ClassRequest, String> {
        if self.name.trim().is_empty() || self.start_time.is_empty() || self.end_time.is_empty() {
            return Err("All fields are required".to_string());
        }

        Ok(ClassRequest {
            name: Some(self.name.trim().to_string()),
            day_of_week: Some(self.day_of_week),
            start_time: Some(self.start_time.clone()),
            end_time: Some(self.end_time.clone()),
            active: Some(self.active),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct ClassesPageProps {
    pub api_client: ApiClient,
}

#[function_component(ClassesPage)]
pub fn classes_page(props: &ClassesPageProps) -> Html {
    let classes = use_state(Vec::<Class>::new);
    let loading = use_state(|| false);
    let students = use_students(&props.api_client);
    let roster = use_class_roster(&props.api_client);
    let form = use_state(ClassForm::default);
    let editing = use_state(|| Option::<i64>::None);
    let show_form = use_state(|| false);
    let enrolling = use_state(|| Option::<Class>::None);
    let flash = use_state(|| Option::<Flash>::None);

    let refresh = {
        let api_client = props.api_client.clone();
        let classes = classes.clone();
        let loading = loading.clone();
        let flash = flash.clone();
        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let classes = classes.clone();
            let loading = loading.clone();
            let flash = flash.clone();
            spawn_local(async move {
                loading.set(true);
                match api_client.list_classes().await {
                    Ok(list) => classes.set(list),
                    Err(e) => {
                        gloo::console::error!("Failed to fetch classes:", e.clone());
                        show_flash(&flash, Flash::Error(format!("Failed to fetch classes: {}", e)));
                    }
                }
                loading.set(false);
            });
        })
    };

    use_effect_with((), {
        let refresh = refresh.clone();
        move |_| {
            refresh.emit(());
            || ()
        }
    });

    let open_add = {
        let form = form.clone();
        let editing = editing.clone();
        let show_form = show_form.clone();
        Callback::from(move |_| {
            editing.set(None);
            form.set(ClassForm::default());
            show_form.set(true);
        })
    };

    let close_form = {
        let show_form = show_form.clone();
        Callback::from(move |_| show_form.set(false))
    };

    let text_field = |update: fn(&mut ClassForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            update(&mut next, input.value());
            form.set(next);
        })
    };
    let on_name = text_field(|f, v| f.name = v);
    let on_start = text_field(|f, v| f.start_time = v);
    let on_end = text_field(|f, v| f.end_time = v);

    let on_day = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.day_of_week = select.value().parse().unwrap_or(0);
            form.set(next);
        })
    };

    let on_active = {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.active = input.checked();
            form.set(next);
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let form = form.clone();
        let editing = editing.clone();
        let show_form = show_form.clone();
        let flash = flash.clone();
        let refresh = refresh.clone();
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
            let show_form = show_form.clone();
            let flash = flash.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                let result = match editing_id {
                    Some(id) => api_client.update_class(id, &request).await.map(|r| r.message),
                    None => api_client.create_class(&request).await.map(|r| r.message),
                };
                match result {
                    Ok(message) => {
                        show_flash(&flash, Flash::Success(message));
                        show_form.set(false);
                        refresh.emit(());
                    }
                    Err(e) => show_flash(&flash, Flash::Error(e)),
                }
            });
        })
    };

    let on_edit = {
        let form = form.clone();
        let editing = editing.clone();
        let show_form = show_form.clone();
        Callback::from(move |class: Class| {
            editing.set(Some(class.id));
            form.set(ClassForm::from_class(&class));
            show_form.set(true);
        })
    };

    let on_delete = {
        let api_client = props.api_client.clone();
        let flash = flash.clone();
        let refresh = refresh.clone();
        Callback::from(move |class_id: i64| {
            if !gloo::dialogs::confirm("Are you sure you want to delete this class?") {
                return;
            }
            let api_client = api_client.clone();
            let flash = flash.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match api_client.delete_class(class_id).await {
                    Ok(response) => {
                        show_flash(&flash, Flash::Success(response.message));
                        refresh.emit(());
                    }
                    Err(e) => show_flash(&flash, Flash::Error(e)),
                }
            });
        })
    };

    let on_manage = {
        let enrolling = enrolling.clone();
        let load = roster.load.clone();
        Callback::from(move |class: Class| {
            load.emit(class.id);
            enrolling.set(Some(class));
        })
    };

    let close_enrollment = {
        let enrolling = enrolling.clone();
        let clear = roster.clear.clone();
        Callback::from(move |_| {
            enrolling.set(None);
            clear.emit(());
        })
    };

    // Enroll when `enroll` is true, otherwise remove
    let on_enrollment = {
        let api_client = props.api_client.clone();
        let enrolling = enrolling.clone();
        let flash = flash.clone();
        let load = roster.load.clone();
        Callback::from(move |(student_id, enroll): (i64, bool)| {
            let Some(class_id) = enrolling.as_ref().map(|c| c.id) else {
                return;
            };
            let api_client = api_client.clone();
            let flash = flash.clone();
            let load = load.clone();
            spawn_local(async move {
                let result = if enroll {
                    api_client.enroll_student(class_id, student_id).await
                } else {
                    api_client.unenroll_student(class_id, student_id).await
                };
                match result {
                    Ok(response) => show_flash(&flash, Flash::Success(response.message)),
                    Err(e) => show_flash(&flash, Flash::Error(e)),
                }
                load.emit(class_id);
            });
        })
    };

    html! {
        <div class="page-container">
            <div class="page-header">
                <h1 class="page-title">{"Class Schedule Management"}</h1>
                <button class="btn btn-primary" onclick={open_add}>{"Add New Class"}</button>
            </div>
            <FlashMessage flash={(*flash).clone()} />

            {if *loading {
                html! { <div class="loading"><div class="spinner"></div></div> }
            } else {
                html! {
                    <table class="table">
                        <thead>
                            <tr>
                                <th>{"Class Name"}</th>
                                <th>{"Day"}</th>
                                <th>{"Time"}</th>
                                <th>{"Status"}</th>
                                <th>{"Actions"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for classes.iter().map(|class| {
                                let on_manage = on_manage.clone();
                                let on_edit = on_edit.clone();
                                let on_delete = on_delete.clone();
                                let manage_target = class.clone();
                                let edit_target = class.clone();
                                let delete_id = class.id;
                                html! {
                                    <tr key={class.id}>
                                        <td>{&class.name}</td>
                                        <td>{day_name(class.day_of_week)}</td>
                                        <td>{format!("{} - {}", class.start_time, class.end_time)}</td>
                                        <td>
                                            <span class={if class.active { "status-active" } else { "status-inactive" }}>
                                                {if class.active { "Active" } else { "Inactive" }}
                                            </span>
                                        </td>
                                        <td>
                                            <div class="action-buttons">
                                                <button class="btn btn-success btn-small"
                                                    onclick={Callback::from(move |_| on_manage.emit(manage_target.clone()))}>
                                                    {"Manage Students"}
                                                </button>
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

            {if classes.is_empty() && !*loading {
                html! { <p class="empty-state">{"No classes found. Click \"Add New Class\" to get started."}</p> }
            } else { html! {} }}

            {if *show_form {
                html! {
                    <div class="modal-overlay">
                        <div class="modal">
                            <div class="modal-header">
                                <h2 class="modal-title">
                                    {if editing.is_some() { "Edit Class" } else { "Add New Class" }}
                                </h2>
                                <button class="close-btn" onclick={close_form.clone()}>{"×"}</button>
                            </div>
                            <form onsubmit={on_submit}>
                                <div class="form-group">
                                    <label for="class-name">{"Class Name *"}</label>
                                    <input id="class-name" type="text" placeholder="e.g., Kids Karate, Adult Jiu-Jitsu"
                                        value={form.name.clone()} oninput={on_name} />
                                </div>
                                <div class="form-group">
                                    <label for="class-day">{"Day of Week *"}</label>
                                    <select id="class-day" onchange={on_day}>
                                        {for day_options().map(|(value, label)| html! {
                                            <option value={value.to_string()} selected={value == form.day_of_week}>{label}</option>
                                        })}
                                    </select>
                                </div>
                                <div class="form-group">
                                    <label for="class-start">{"Start Time *"}</label>
                                    <input id="class-start" type="time" value={form.start_time.clone()} oninput={on_start} />
                                </div>
                                <div class="form-group">
                                    <label for="class-end">{"End Time *"}</label>
                                    <input id="class-end" type="time" value={form.end_time.clone()} oninput={on_end} />
                                </div>
                                <div class="form-group">
                                    <label>
                                        <input type="checkbox" checked={form.active} onchange={on_active} />
                                        {" Active"}
                                    </label>
                                </div>
                                <div class="form-actions">
                                    <button type="button" class="btn btn-secondary" onclick={close_form}>{"Cancel"}</button>
                                    <button type="submit" class="btn btn-primary">
                                        {if editing.is_some() { "Update" } else { "Create" }}
                                    </button>
                                </div>
                            </form>
                        </div>
                    </div>
                }
            } else { html! {} }}

            {if let Some(class) = enrolling.as_ref() {
                let enrolled_ids: Vec<i64> = roster.students.iter().map(|s| s.id).collect();
                html! {
                    <div class="modal-overlay">
                        <div class="modal">
                            <div class="modal-header">
                                <h2 class="modal-title">{format!("Manage Students - {}", class.name)}</h2>
                                <button class="close-btn" onclick={close_enrollment}>{"×"}</button>
                            </div>
                            <h3>{format!("Enrolled Students ({})", roster.students.len())}</h3>
                            {if roster.students.is_empty() {
                                html! { <p class="empty-state">{"No students enrolled yet."}</p> }
                            } else {
                                html! {
                                    <ul class="enrollment-list">
                                        {for roster.students.iter().map(|student| {
                                            let on_enrollment = on_enrollment.clone();
                                            let id = student.id;
                                            html! {
                                                <li key={id}>
                                                    {&student.name}
                                                    <button class="btn btn-danger btn-small"
                                                        onclick={Callback::from(move |_| on_enrollment.emit((id, false)))}>
                                                        {"Remove"}
                                                    </button>
                                                </li>
                                            }
                                        })}
                                    </ul>
                                }
                            }}
                            <h3>{"Add Students"}</h3>
                            <ul class="enrollment-list">
                                {for students.state.students.iter()
                                    .filter(|s| !enrolled_ids.contains(&s.id))
                                    .map(|student| {
                                        let on_enrollment = on_enrollment.clone();
                                        let id = student.id;
                                        html! {
                                            <li key={id}>
                                                {format!("{} (Age: {})", student.name, student.age)}
                                                <button class="btn btn-success btn-small"
                                                    onclick={Callback::from(move |_| on_enrollment.emit((id, true)))}>
                                                    {"Enroll"}
                                                </button>
                                            </li>
                                        }
                                    })}
                            </ul>
                        </div>
                    </div>
                }
            } else { html! {} }}
        </div>
    }
}
