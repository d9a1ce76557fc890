//! App Root Component

use leptos::*;

use crate::components::Grid;

/// Root application component: a header above the chart grid
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Header />
        <Grid />
    }
}

#[component]
fn Header() -> impl IntoView {
    view! {
        <div class="header">
            <div class="logo">"Lorikeet Dashboard"</div>
        </div>
    }
}
