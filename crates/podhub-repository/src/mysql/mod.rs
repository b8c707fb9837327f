//! MySQL repository implementations.

mod category_repository;
mod episode_repository;
mod password_reset_repository;
mod podcast_repository;
mod user_repository;

pub use category_repository::*;
pub use episode_repository::*;
pub use password_reset_repository::*;
pub use podcast_repository::*;
pub use user_repository::*;

/// Escapes `%`, `_` and `\` so user input matches literally inside `LIKE`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
