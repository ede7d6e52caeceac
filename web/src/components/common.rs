use dioxus::prelude::*;

use crate::utils::error::AppError;

#[component]
pub fn LoadingState(message: Option<String>) -> Element {
    rsx! {
        div {
            class: "loading",
            if let Some(msg) = message {
                "{msg}"
            } else {
                "Loading..."
            }
        }
    }
}

#[component]
pub fn ErrorState(error: AppError, title: Option<String>) -> Element {
    rsx! {
        div {
            class: "error",
            if let Some(title) = title {
                h3 { "{title}" }
            }
            "{error}"
        }
    }
}

#[component]
pub fn EmptyState(message: String) -> Element {
    rsx! {
        div {
            class: "empty",
            "{message}"
        }
    }
}

#[component]
pub fn PageTitle(title: String, subtitle: Option<String>) -> Element {
    rsx! {
        div {
            class: "page-title",
            h1 { "{title}" }
            if let Some(subtitle) = subtitle {
                p { "{subtitle}" }
            }
        }
    }
}
