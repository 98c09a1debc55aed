//! Client-side input validation. Anything rejected here never produces a
//! request; anything accepted passes through unchanged apart from trimming.

use hearsay_common::HearsayError;

/// Upper bound the API enforces on claim text; checked here first so the
/// user gets an answer without a round trip.
pub const MAX_CLAIM_CHARS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a claim to check")]
    EmptyClaim,
    #[error("Text is too long (max 5000 characters)")]
    TooLong,
    #[error("Please enter a URL")]
    EmptyUrl,
    #[error("URL must start with http:// or https://")]
    BadScheme,
}

impl From<ValidationError> for HearsayError {
    fn from(e: ValidationError) -> Self {
        HearsayError::Validation(e.to_string())
    }
}

/// Trim and bounds-check claim text. No normalization beyond the trim.
pub fn validate_claim(text: &str) -> Result<&str, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyClaim);
    }
    if trimmed.chars().count() > MAX_CLAIM_CHARS {
        return Err(ValidationError::TooLong);
    }
    Ok(trimmed)
}

/// Trim and scheme-check a URL. Anything beyond the scheme prefix is the
/// API's problem.
pub fn validate_url(url: &str) -> Result<&str, ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ValidationError::BadScheme);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_bounds() {
        assert_eq!(validate_claim("").unwrap_err(), ValidationError::EmptyClaim);
        assert_eq!(
            validate_claim("   \n\t ").unwrap_err(),
            ValidationError::EmptyClaim
        );

        assert_eq!(validate_claim("x").unwrap(), "x");
        let exactly_max = "a".repeat(MAX_CLAIM_CHARS);
        assert_eq!(validate_claim(&exactly_max).unwrap(), exactly_max);

        let one_over = "a".repeat(MAX_CLAIM_CHARS + 1);
        assert_eq!(validate_claim(&one_over).unwrap_err(), ValidationError::TooLong);
    }

    #[test]
    fn claim_is_trimmed_but_otherwise_untouched() {
        assert_eq!(
            validate_claim("  The Earth is FLAT!!  "),
            Ok("The Earth is FLAT!!")
        );
    }

    #[test]
    fn surrounding_whitespace_does_not_count_toward_length() {
        let padded = format!("  {}  ", "a".repeat(MAX_CLAIM_CHARS));
        assert!(validate_claim(&padded).is_ok());
    }

    #[test]
    fn url_scheme_prefixes() {
        assert_eq!(validate_url("").unwrap_err(), ValidationError::EmptyUrl);
        assert_eq!(validate_url("  ").unwrap_err(), ValidationError::EmptyUrl);

        assert_eq!(
            validate_url("www.bbc.com/news").unwrap_err(),
            ValidationError::BadScheme
        );
        assert_eq!(
            validate_url("ftp://example.com").unwrap_err(),
            ValidationError::BadScheme
        );
        assert_eq!(
            validate_url("HTTPS://example.com").unwrap_err(),
            ValidationError::BadScheme
        );

        assert_eq!(
            validate_url("http://example.com").unwrap(),
            "http://example.com"
        );
        assert_eq!(
            validate_url(" https://www.bbc.com/news/article "),
            Ok("https://www.bbc.com/news/article")
        );
    }

    #[test]
    fn no_further_url_wellformedness_checks() {
        // Deliberately deferred to the API.
        assert!(validate_url("https://").is_ok());
        assert!(validate_url("http://not a url at all").is_ok());
    }
}
