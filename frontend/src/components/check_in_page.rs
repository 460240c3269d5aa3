use yew::prelude::*;
use web_sys::HtmlInputElement;
use wasm_bindgen_futures::spawn_local;
use shared::{CheckInRequest, Class, Student};

use super::flash::{show_flash, Flash, FlashMessage};
use crate::hooks::use_class_roster::use_class_roster;
use crate::hooks::use_students::use_students;
use crate::services::api::ApiClient;
use crate::services::date_utils::day_name;
use crate::services::search::filter_students_by_name;

#[derive(Properties, PartialEq)]
pub struct CheckInPageProps {
    pub api_client: ApiClient,
}

#[function_component(CheckInPage)]
pub fn check_in_page(props: &CheckInPageProps) -> Html {
    let students = use_students(&props.api_client);
    let roster = use_class_roster(&props.api_client);
    let classes = use_state(Vec::<Class>::new);
    let selected_class = use_state(|| Option::<Class>::None);
    let search_term = use_state(String::new);
    let flash = use_state(|| Option::<Flash>::None);
    let checking_in = use_state(|| false);

    // Classes in session now, or failing that the next one today
    use_effect_with((), {
        let api_client = props.api_client.clone();
        let classes = classes.clone();
        let selected_class = selected_class.clone();
        move |_| {
            spawn_local(async move {
                let found = match api_client.get_current_classes().await {
                    Ok(current) if !current.is_empty() => current,
                    Ok(_) => match api_client.get_upcoming_class().await {
                        Ok(upcoming) => upcoming.into_iter().collect(),
                        Err(e) => {
                            gloo::console::error!("Failed to fetch upcoming class:", e);
                            Vec::new()
                        }
                    },
                    Err(e) => {
                        gloo::console::error!("Failed to fetch current classes:", e);
                        Vec::new()
                    }
                };
                selected_class.set(found.first().cloned());
                classes.set(found);
            });
            || ()
        }
    });

    use_effect_with((*selected_class).clone(), {
        let load = roster.load.clone();
        let clear = roster.clear.clone();
        move |selected: &Option<Class>| {
            match selected {
                Some(class) => load.emit(class.id),
                None => clear.emit(()),
            }
            || ()
        }
    });

    let on_search = {
        let search_term = search_term.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search_term.set(input.value());
        })
    };

    let on_check_in = {
        let api_client = props.api_client.clone();
        let selected_class = selected_class.clone();
        let search_term = search_term.clone();
        let flash = flash.clone();
        let checking_in = checking_in.clone();

        Callback::from(move |student: Student| {
            let Some(class) = (*selected_class).clone() else {
                show_flash(
                    &flash,
                    Flash::Error("No class selected. Please select a class first.".to_string()),
                );
                return;
            };

            let api_client = api_client.clone();
            let search_term = search_term.clone();
            let flash = flash.clone();
            let checking_in = checking_in.clone();

            spawn_local(async move {
                checking_in.set(true);

                let request = CheckInRequest {
                    student_id: Some(student.id),
                    class_id: Some(class.id),
                    date: None,
                };
                match api_client.check_in(&request).await {
                    Ok(_) => {
                        show_flash(
                            &flash,
                            Flash::Success(format!("{} checked in successfully!", student.name)),
                        );
                        search_term.set(String::new());
                    }
                    Err(e) => show_flash(&flash, Flash::Error(e)),
                }

                checking_in.set(false);
            });
        })
    };

    let visible: Vec<Student> = if !search_term.trim().is_empty() {
        filter_students_by_name(&students.state.students, &search_term)
    } else if selected_class.is_some() {
        roster.students.clone()
    } else {
        Vec::new()
    };

    html! {
        <div class="page-container">
            <h1 class="page-title">{"Student Check-In"}</h1>
            <FlashMessage flash={(*flash).clone()} />

            {if !classes.is_empty() {
                html! {
                    <div class="card">
                        <h2 class="card-title">{"Current/Upcoming Class"}</h2>
                        <div class="class-buttons">
                            {for classes.iter().map(|class| {
                                let is_selected = selected_class.as_ref().map(|c| c.id) == Some(class.id);
                                let selected_class = selected_class.clone();
                                let choice = class.clone();
                                html! {
                                    <button
                                        class={if is_selected { "btn btn-primary" } else { "btn btn-secondary" }}
                                        onclick={Callback::from(move |_| selected_class.set(Some(choice.clone())))}
                                    >
                                        {&class.name}
                                    </button>
                                }
                            })}
                        </div>
                        {if let Some(class) = selected_class.as_ref() {
                            html! {
                                <p class="class-time">
                                    {format!("{} {} - {}", day_name(class.day_of_week), class.start_time, class.end_time)}
                                </p>
                            }
                        } else { html! {} }}
                    </div>
                }
            } else { html! {} }}

            <input
                type="text"
                class="search-box"
                placeholder="Type student name to check in..."
                value={(*search_term).clone()}
                oninput={on_search}
            />

            {if !visible.is_empty() {
                html! {
                    <div class="student-grid">
                        {for visible.into_iter().map(|student| {
                            let on_check_in = on_check_in.clone();
                            let name = student.name.clone();
                            let age = student.age;
                            html! {
                                <div
                                    class="student-card"
                                    onclick={Callback::from(move |_| on_check_in.emit(student.clone()))}
                                >
                                    <div class="student-name">{name}</div>
                                    <div class="student-age">{format!("Age: {}", age)}</div>
                                </div>
                            }
                        })}
                    </div>
                }
            } else if !search_term.trim().is_empty() {
                html! { <p class="empty-state">{format!("No students found matching \"{}\"", *search_term)}</p> }
            } else if let Some(class) = selected_class.as_ref() {
                html! {
                    <p class="empty-state">
                        {format!("Showing students enrolled in {}. Start typing to search all students.", class.name)}
                    </p>
                }
            } else {
                html! { <p class="empty-state">{"No active classes at the moment. Please contact the administrator."}</p> }
            }}

            {if *checking_in || students.state.loading {
                html! { <div class="loading"><div class="spinner"></div></div> }
            } else { html! {} }}
        </div>
    }
}
