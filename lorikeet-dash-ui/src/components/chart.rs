//! Chart Component
//!
//! A backend-rendered SVG sized to its container.

use gloo_timers::callback::Interval;
use leptos::*;

use crate::api::ChartImage;

/// How often the cache-busting timestamp is renewed
pub const REFRESH_INTERVAL_MS: u32 = 10_000;

/// Chart image filling its container.
///
/// The image is left out until the container has been painted with a
/// non-zero size, and for as long as `changing` is set. Size is read from the
/// container on every render, so a layout change is picked up as soon as
/// `changing` clears.
#[component]
pub fn Chart(
    /// Chart name as listed by the backend
    #[prop(into)]
    name: String,
    /// Set while the surrounding layout is being resized
    #[prop(into)]
    changing: Signal<bool>,
    #[prop(default = REFRESH_INTERVAL_MS)] refresh_ms: u32,
) -> impl IntoView {
    let container = create_node_ref::<html::Div>();
    let painted = create_rw_signal(false);
    let timestamp = create_rw_signal(now_millis());

    let refresh = Interval::new(refresh_ms, move || timestamp.set(now_millis()));
    on_cleanup(move || drop(refresh));

    container.on_load(move |_| {
        request_animation_frame(move || {
            painted.try_set(true);
        });
    });

    let image = create_memo(move |_| {
        if changing.get() || !painted.get() {
            return None;
        }

        let div = container.get()?;
        ChartImage::measured(&name, div.client_width(), div.client_height(), timestamp.get())
    });

    view! {
        <div node_ref=container class="chart">
            <Show when=move || image.with(Option::is_some)>
                <img
                    draggable="false"
                    on:dragstart=|ev| ev.prevent_default()
                    src=move || image.with(|image| image.as_ref().map(ChartImage::url))
                    alt=move || image.with(|image| image.as_ref().map(|image| image.name.clone()))
                />
            </Show>
        </div>
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
