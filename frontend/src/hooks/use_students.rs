use yew::prelude::*;
use shared::Student;
use wasm_bindgen_futures::spawn_local;
use crate::services::api::ApiClient;

#[derive(Clone, PartialEq)]
pub struct StudentsState {
    pub students: Vec<Student>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct UseStudentsResult {
    pub state: StudentsState,
    pub refresh: Callback<()>,
}

/// Full roster, loaded on mount and reloaded through `refresh`
#[hook]
pub fn use_students(api_client: &ApiClient) -> UseStudentsResult {
    let students = use_state(Vec::<Student>::new);
    let loading = use_state(|| false);
    let error = use_state(|| Option::<String>::None);

    let refresh = {
        let api_client = api_client.clone();
        let students = students.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let students = students.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                loading.set(true);

                match api_client.list_students().await {
                    Ok(list) => {
                        students.set(list);
                        error.set(None);
                    }
                    Err(e) => {
                        gloo::console::error!("Failed to fetch students:", e.clone());
                        error.set(Some(e));
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

    UseStudentsResult {
        state: StudentsState {
            students: (*students).clone(),
            loading: *loading,
            error: (*error).clone(),
        },
        refresh,
    }
}
