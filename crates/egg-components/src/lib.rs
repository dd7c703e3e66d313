//! # egg-components
//!
//! Leptos UI components for the egg inspection dashboard.

pub mod dashboard;
pub mod legend;
pub mod overview;

pub use dashboard::*;
pub use legend::*;
pub use overview::*;
