//! Lorikeet Dashboard entry point
//!
//! Built with `trunk build`; the output in `dist/` is served by the dev server.

use leptos::*;
use lorikeet_dash_ui::app::App;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <App /> });
}
