//! UI Components
//!
//! Leptos components for the dashboard.

pub mod chart;
pub mod grid;

pub use chart::Chart;
pub use grid::Grid;
