pub mod auth;
pub mod config;
pub mod focus_area;
pub mod task;

pub use auth::*;
pub use config::*;
pub use focus_area::*;
pub use task::*;
