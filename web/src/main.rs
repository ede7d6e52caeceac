use dioxus::prelude::*;

mod api;
mod app;
mod browser;
mod components;
mod drafts;
mod hooks;
mod pages;
mod stores;
mod utils;

use app::App;

fn main() {
    launch(App);
}
