//! Value objects.

mod email;
mod slug;

pub use email::*;
pub use slug::*;
