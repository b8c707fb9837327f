//! Validation utilities.

use crate::{FieldError, PodhubError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `PodhubError` on failure.
    fn validate_request(&self) -> Result<(), PodhubError> {
        self.validate().map_err(validation_errors_to_podhub_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors, sorted by field name.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `PodhubError`.
#[must_use]
pub fn validation_errors_to_podhub_error(errors: ValidationErrors) -> PodhubError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    PodhubError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];
    const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a slug only holds lowercase letters, digits and hyphens.
    pub fn valid_slug(slug: &str) -> Result<(), ValidationError> {
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::new("slug_format").with_message(
                "The slug may only contain lowercase letters, numbers, and hyphens.".into(),
            ));
        }
        Ok(())
    }

    /// Validates that a URL points at a supported audio file.
    pub fn audio_file(url: &str) -> Result<(), ValidationError> {
        if has_extension(url, AUDIO_EXTENSIONS) {
            Ok(())
        } else {
            Err(ValidationError::new("audio_extension").with_message(
                "The episode audio must be a valid audio file (mp3, wav, or m4a).".into(),
            ))
        }
    }

    /// Validates that a URL points at a supported image file.
    pub fn image_file(url: &str) -> Result<(), ValidationError> {
        if has_extension(url, IMAGE_EXTENSIONS) {
            Ok(())
        } else {
            Err(ValidationError::new("image_extension").with_message(
                "The podcast image must be a valid image file (jpg, jpeg, png, gif, or webp).".into(),
            ))
        }
    }

    fn has_extension(url: &str, allowed: &[&str]) -> bool {
        url.rsplit_once('.').is_some_and(|(_, ext)| {
            allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
        #[validate(range(min = 1))]
        count: i32,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_slug() {
        assert!(valid_slug("true-crime-2024").is_ok());
        assert!(valid_slug("True-Crime").is_err());
        assert!(valid_slug("with space").is_err());
        assert!(valid_slug("").is_err());
    }

    #[test]
    fn test_audio_file() {
        assert!(audio_file("https://cdn.example.com/ep1.mp3").is_ok());
        assert!(audio_file("https://cdn.example.com/ep1.M4A").is_ok());
        assert!(audio_file("https://cdn.example.com/ep1.ogg").is_err());
        assert!(audio_file("https://cdn.example.com/ep1").is_err());
    }

    #[test]
    fn test_image_file() {
        assert!(image_file("https://cdn.example.com/cover.webp").is_ok());
        assert!(image_file("https://cdn.example.com/cover.bmp").is_err());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let probe = Probe {
            name: "ab".into(),
            count: 0,
        };
        let err = probe.validate_request().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name: too short"));
        assert!(message.contains("count: range"));
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_field_errors_sorted() {
        let probe = Probe {
            name: "ab".into(),
            count: 0,
        };
        let errors = probe.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields[0].field, "count");
        assert_eq!(fields[1].field, "name");
    }
}
