//! Application services. Each is a trait plus its default implementation.

mod auth_service;
mod category_service;
mod episode_service;
mod password_reset_service;
mod podcast_service;

pub use auth_service::{AuthService, AuthServiceImpl};
pub use category_service::{CategoryService, CategoryServiceImpl};
pub use episode_service::{EpisodeService, EpisodeServiceImpl, EPISODES_PER_PAGE};
pub use password_reset_service::{
    LoggingResetNotifier, PasswordResetService, PasswordResetServiceImpl, ResetNotifier,
};
pub use podcast_service::{PodcastService, PodcastServiceImpl};
