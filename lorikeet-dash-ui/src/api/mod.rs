//! API Module
//!
//! HTTP client for the chart listing and chart image URLs.

pub mod client;

pub use client::*;
