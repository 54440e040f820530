use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// Regex for http(s) image URLs entered by hand
    pub static ref IMAGE_URL_REGEX: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

/// Reject names made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Invoice codes belong to the backend, so any printable text is accepted.
/// Control characters never appear in a code and are rejected.
pub fn validate_invoice_code(code: &str) -> Result<(), ValidationError> {
    if code.chars().any(char::is_control) {
        return Err(ValidationError::new("invoice_code")
            .with_message("Mã hóa đơn không hợp lệ".into()));
    }
    Ok(())
}

/// First human-readable message of a failed validation, for the page banner
pub fn first_error_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Dữ liệu không hợp lệ".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Bia").is_ok());
        assert!(validate_not_blank(" \t ").is_err());
    }

    #[test]
    fn test_invoice_code_accepts_backend_codes() {
        assert!(validate_invoice_code("HD001").is_ok());
        assert!(validate_invoice_code("HD-2026-0001").is_ok());
        assert!(validate_invoice_code("HD 01").is_ok());
        assert!(validate_invoice_code("HD/01").is_ok());
        assert!(validate_invoice_code("Đơn#7").is_ok());
    }

    #[test]
    fn test_invoice_code_rejects_control_characters() {
        assert!(validate_invoice_code("HD\n01").is_err());
        assert!(validate_invoice_code("HD\u{0}").is_err());
    }

    #[test]
    fn test_first_error_message() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            validator::ValidationError::new("blank").with_message("Vui lòng nhập tên".into()),
        );
        assert_eq!(first_error_message(&errors), "Vui lòng nhập tên");

        let mut errors = ValidationErrors::new();
        errors.add("name", validator::ValidationError::new("blank"));
        assert_eq!(first_error_message(&errors), "Dữ liệu không hợp lệ");
    }

    #[test]
    fn test_image_url_regex() {
        assert!(IMAGE_URL_REGEX.is_match("https://cdn.example.com/a.png"));
        assert!(IMAGE_URL_REGEX.is_match("http://localhost/x.jpg"));
        assert!(!IMAGE_URL_REGEX.is_match("ftp://example.com/a.png"));
        assert!(!IMAGE_URL_REGEX.is_match("javascript:alert(1)"));
    }
}
