use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::check_in_page::CheckInPage;
use components::classes_page::ClassesPage;
use components::header::{Header, Page};
use components::reports_page::ReportsPage;
use components::students_page::StudentsPage;
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let current_page = use_state(|| Page::CheckIn);
    let api_client = use_memo((), |_| ApiClient::new());
    let api_client = (*api_client).clone();

    let on_navigate = {
        let current_page = current_page.clone();
        Callback::from(move |page: Page| current_page.set(page))
    };

    let page = match *current_page {
        Page::CheckIn => html! { <CheckInPage api_client={api_client} /> },
        Page::Students => html! { <StudentsPage api_client={api_client} /> },
        Page::Classes => html! { <ClassesPage api_client={api_client} /> },
        Page::Reports => html! { <ReportsPage api_client={api_client} /> },
    };

    html! {
        <div class="app">
            <Header current={*current_page} {on_navigate} />
            <main class="main-content">
                {page}
            </main>
            <footer class="footer">
                <p>{"Martial Arts School Attendance"}</p>
            </footer>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
