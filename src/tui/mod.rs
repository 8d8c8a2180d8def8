pub mod app;
pub mod command;
pub mod event;
pub mod form;
pub mod keys;
pub mod render;
pub mod theme;
pub mod views;

pub use app::{App, run};
