use dioxus::prelude::*;

#[component]
pub fn Card(title: String, children: Element) -> Element {
    rsx! {
        section {
            class: "card",
            header {
                h3 { "{title}" }
            }
            div { class: "card-body", {children} }
        }
    }
}
