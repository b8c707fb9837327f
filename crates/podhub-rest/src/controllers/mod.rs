//! REST API controllers.

pub mod auth_controller;
pub mod category_controller;
pub mod episode_controller;
pub mod health_controller;
pub mod podcast_controller;

pub use health_controller::*;
