//! Lorikeet Dashboard
//!
//! Client-side rendered Leptos application that shows a resizable grid of
//! charts. Each chart is an SVG rendered by the charting backend and fetched
//! through the dev server's `/charts` proxy.
//!
//! # Architecture
//!
//! - [`app`]: page shell (header + grid)
//! - [`components`]: `Grid` and `Chart`
//! - [`layout`]: pure tile placement
//! - [`state`]: the debounced "layout is changing" flag
//! - [`api`]: chart list fetch and image URLs

pub mod api;
pub mod app;
pub mod components;
pub mod layout;
pub mod state;
