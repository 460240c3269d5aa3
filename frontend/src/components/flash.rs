use yew::prelude::*;

/// Transient banner shown at the top of a page
#[derive(Clone, Debug, PartialEq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// Show `flash`; success banners clear themselves after three seconds
pub fn show_flash(handle: &UseStateHandle<Option<Flash>>, flash: Flash) {
    let auto_clear = matches!(flash, Flash::Success(_));
    handle.set(Some(flash));

    if auto_clear {
        let handle = handle.clone();
        gloo::timers::callback::Timeout::new(3000, move || {
            handle.set(None);
        })
        .forget();
    }
}

#[derive(Properties, PartialEq)]
pub struct FlashMessageProps {
    pub flash: Option<Flash>,
}

#[function_component(FlashMessage)]
pub fn flash_message(props: &FlashMessageProps) -> Html {
    match &props.flash {
        Some(Flash::Success(text)) => html! { <div class="alert alert-success">{text}</div> },
        Some(Flash::Error(text)) => html! { <div class="alert alert-error">{text}</div> },
        None => html! {},
    }
}
