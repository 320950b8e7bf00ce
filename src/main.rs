//! Kanban Frontend Entry Point

mod api;
mod app;
mod autoscroll;
mod components;
mod context;
mod dnd;
mod settings;
mod state;
mod sync;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = settings::load_config();
    settings::init_logging(&config);
    log::info!("[APP] starting with api base {}", config.api_base);

    mount_to_body(move || view! { <App config=config.clone() /> });
}
