//! State Management
//!
//! Component-scoped reactive state shared between the grid and its charts.

pub mod changing;

pub use changing::{ChangeTracker, SettleDebounce, SETTLE_DELAY_MS};
