//! Popcorn terminal front-end: configuration, input loop and rendering.
pub mod config;
pub mod effects;
pub mod input;
pub mod persistence;
pub mod render;

mod app;

pub use app::{run, Resolved, Session};
