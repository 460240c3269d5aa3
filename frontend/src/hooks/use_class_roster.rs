use yew::prelude::*;
use shared::Student;
use wasm_bindgen_futures::spawn_local;
use crate::services::api::ApiClient;

pub struct UseClassRosterResult {
    pub students: Vec<Student>,
    /// Reload the roster of the given class
    pub load: Callback<i64>,
    pub clear: Callback<()>,
}

/// Students enrolled in one class, fetched on demand
#[hook]
pub fn use_class_roster(api_client: &ApiClient) -> UseClassRosterResult {
    let students = use_state(Vec::<Student>::new);

    let load = {
        let api_client = api_client.clone();
        let students = students.clone();

        use_callback((), move |class_id: i64, _| {
            let api_client = api_client.clone();
            let students = students.clone();

            spawn_local(async move {
                match api_client.list_students_in_class(class_id).await {
                    Ok(list) => students.set(list),
                    Err(e) => gloo::console::error!("Failed to fetch class students:", e),
                }
            });
        })
    };

    let clear = {
        let students = students.clone();
        use_callback((), move |_, _| students.set(Vec::new()))
    };

    UseClassRosterResult {
        students: (*students).clone(),
        load,
        clear,
    }
}
