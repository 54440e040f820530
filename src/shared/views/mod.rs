//! Server-side rendering of the shop's pages.

pub mod engine;

pub use engine::{init_views, render, render_with_status};
