//! Grid Component
//!
//! Responsive grid of chart tiles. Tiles can be resized from their corner
//! handle; sizes are kept only for the lifetime of the page.

use leptos::*;
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::Chart;
use crate::layout::{columns_for_width, layout, resize_span, LayoutEntry, COLUMNS, ROW_PITCH_PX};
use crate::state::{ChangeTracker, SETTLE_DELAY_MS};

/// Chart grid, populated from the backend's chart list on mount
#[component]
pub fn Grid(#[prop(default = SETTLE_DELAY_MS)] settle_ms: u32) -> impl IntoView {
    let charts = create_rw_signal(Vec::<String>::new());
    let tracker = ChangeTracker::new(settle_ms);

    let grid_ref = create_node_ref::<html::Div>();
    let grid_width = create_rw_signal(None::<i32>);
    let columns = create_memo(move |_| grid_width.get().map(columns_for_width).unwrap_or(COLUMNS));
    let cell_width = Signal::derive(move || {
        grid_width.get().unwrap_or(0) as f64 / columns.get() as f64
    });

    load_charts(charts, api::fetch_charts());

    // Width changes, including the first measurement after paint
    let measure_width = {
        let tracker = tracker.clone();
        move || {
            let Some(width) = grid_ref.get_untracked().map(|div| div.client_width()) else {
                return;
            };
            if grid_width.get_untracked() != Some(width) {
                grid_width.set(Some(width));
                tracker.notify();
            }
        }
    };

    grid_ref.on_load({
        let measure_width = measure_width.clone();
        move |_| request_animation_frame(measure_width)
    });

    let resize_listener = window_event_listener(ev::resize, move |_| measure_width());
    on_cleanup(move || resize_listener.remove());

    let changing = tracker.changing();

    view! {
        <div class="grid-container">
            <div
                node_ref=grid_ref
                class="layout"
                style=move || format!("grid-template-columns: repeat({}, minmax(0, 1fr));", columns.get())
            >
                <For
                    each=move || charts.with(|charts| layout(charts))
                    key=|entry| entry.id.clone()
                    children=move |entry| {
                        view! {
                            <Tile
                                entry=entry
                                columns=columns
                                cell_width=cell_width
                                changing=changing
                                tracker=tracker.clone()
                            />
                        }
                    }
                />
            </div>
        </div>
    }
}

/// Store the chart list once `fetch` resolves, unless the calling component
/// has been disposed by then.
fn load_charts<F>(charts: RwSignal<Vec<String>>, fetch: F)
where
    F: Future<Output = Result<Vec<String>, String>> + 'static,
{
    let mounted = Rc::new(Cell::new(true));
    on_cleanup({
        let mounted = Rc::clone(&mounted);
        move || mounted.set(false)
    });

    spawn_local(async move {
        match fetch.await {
            Ok(names) if mounted.get() => charts.set(names),
            Ok(_) => {}
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to fetch charts: {}", e).into());
            }
        }
    });
}

/// Where a resize drag started
#[derive(Clone, Copy)]
struct ResizeStart {
    x: i32,
    y: i32,
    span: (u32, u32),
}

/// One grid cell holding a chart and its resize handle
#[component]
fn Tile(
    entry: LayoutEntry,
    columns: Memo<u32>,
    cell_width: Signal<f64>,
    changing: Signal<bool>,
    tracker: ChangeTracker,
) -> impl IntoView {
    let name = entry.id.clone();
    let span = create_rw_signal((entry.w, entry.h));
    let drag = Rc::new(Cell::new(None::<ResizeStart>));

    let style = move || {
        let (w, h) = span.get();
        entry.with_span(w, h).fit(columns.get()).style()
    };

    // Ends the drag, if one is running; the flag settles after the delay
    let finish = {
        let drag = Rc::clone(&drag);
        let tracker = tracker.clone();
        move || {
            if drag.take().is_some() {
                tracker.release();
            }
        }
    };

    let on_resize_start = {
        let drag = Rc::clone(&drag);
        let tracker = tracker.clone();
        move |ev: ev::PointerEvent| {
            ev.prevent_default();
            ev.stop_propagation();
            // Keep receiving the pointer's events if it leaves the window
            if let Some(handle) = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
                let _ = handle.set_pointer_capture(ev.pointer_id());
            }

            let was_dragging = drag
                .replace(Some(ResizeStart {
                    x: ev.client_x(),
                    y: ev.client_y(),
                    span: span.get_untracked(),
                }))
                .is_some();
            if !was_dragging {
                tracker.hold();
            }
        }
    };

    let move_listener = window_event_listener(ev::pointermove, {
        let drag = Rc::clone(&drag);
        let tracker = tracker.clone();
        let finish = finish.clone();
        move |ev| {
            let Some(start) = drag.get() else {
                return;
            };
            // Button released where no pointerup reached us
            if ev.buttons() == 0 {
                finish();
                return;
            }

            let delta = (
                (ev.client_x() - start.x) as f64,
                (ev.client_y() - start.y) as f64,
            );
            let next = resize_span(
                start.span,
                delta,
                (cell_width.get_untracked(), ROW_PITCH_PX),
                columns.get_untracked(),
            );
            if next != span.get_untracked() {
                span.set(next);
            }
            tracker.notify();
        }
    });

    let up_listener = window_event_listener(ev::pointerup, {
        let finish = finish.clone();
        move |_| finish()
    });
    let cancel_listener = window_event_listener(ev::pointercancel, {
        let finish = finish.clone();
        move |_| finish()
    });

    on_cleanup(move || {
        move_listener.remove();
        up_listener.remove();
        cancel_listener.remove();
        finish();
    });

    view! {
        <div class="tile" style=style>
            <Chart name=name changing=changing />
            <span class="resize-handle" on:pointerdown=on_resize_start />
        </div>
    }
}
