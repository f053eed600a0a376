use crate::error::AppError;

/// PH mobile numbers as entered at checkout: `09` followed by nine digits.
pub fn validate_ph_mobile(field: &str, phone: &str) -> Result<(), AppError> {
    let ok = phone.len() == 11
        && phone.starts_with("09")
        && phone.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation {
            field: field.to_string(),
            message: "Enter a valid mobile number (09XXXXXXXXX)".to_string(),
        })
    }
}

pub fn require_non_empty(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation {
            field: field.to_string(),
            message: format!("{field} is required"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_mobile_numbers() {
        assert!(validate_ph_mobile("customer_phone", "09171234567").is_ok());
    }

    #[test]
    fn rejects_malformed_numbers() {
        for bad in ["0917123456", "091712345678", "08171234567", "0917-123-4567", ""] {
            let err = validate_ph_mobile("customer_phone", bad).unwrap_err();
            match err {
                AppError::Validation { field, .. } => assert_eq!(field, "customer_phone"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn require_non_empty_trims_and_rejects_blank() {
        assert_eq!(
            require_non_empty("payment_reference", Some(" GC-123 ")).unwrap(),
            "GC-123"
        );
        assert!(require_non_empty("payment_reference", Some("   ")).is_err());
        assert!(require_non_empty("payment_reference", None).is_err());
    }
}
