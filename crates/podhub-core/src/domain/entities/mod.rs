//! Domain entities.

mod category;
mod episode;
mod password_reset;
mod podcast;
mod user;

pub use category::*;
pub use episode::*;
pub use password_reset::*;
pub use podcast::*;
pub use user::*;
