use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    CheckIn,
    Students,
    Classes,
    Reports,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::CheckIn, Page::Students, Page::Classes, Page::Reports];

    pub fn label(self) -> &'static str {
        match self {
            Page::CheckIn => "Check-In",
            Page::Students => "Students",
            Page::Classes => "Classes",
            Page::Reports => "Reports",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub current: Page,
    pub on_navigate: Callback<Page>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    html! {
        <nav class="navbar">
            <div class="nav-container">
                <h1 class="logo">{"Martial Arts School"}</h1>
                <ul class="nav-menu">
                    {for Page::ALL.iter().map(|page| {
                        let page = *page;
                        let on_navigate = props.on_navigate.clone();
                        let class = if page == props.current { "nav-link active" } else { "nav-link" };
                        html! {
                            <li>
                                <button class={class} onclick={Callback::from(move |_| on_navigate.emit(page))}>
                                    {page.label()}
                                </button>
                            </li>
                        }
                    })}
                </ul>
            </div>
        </nav>
    }
}
