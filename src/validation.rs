// 📐 Form validation
// Checks card and transaction input before anything touches a collection

use crate::entities::{Card, TransactionDraft};

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str, context: &str) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
            context: context.to_string(),
        }
    }

    /// Required field is empty
    pub fn required(field: &str, context: &str) -> Self {
        ValidationError::new(field, &format!("{} is required.", field), context)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// VALIDATORS
// ============================================================================

/// All four descriptive card fields must be non-empty. Formats are not checked.
pub fn validate_card(card: &Card) -> ValidationResult {
    let mut errors = Vec::new();

    let fields = [
        ("holderName", &card.holder_name),
        ("cardNumber", &card.card_number),
        ("securityCode", &card.security_code),
        ("expiry", &card.expiry),
    ];

    for (field, value) in fields {
        if value.is_empty() {
            errors.push(ValidationError::required(field, "Card"));
        }
    }

    finish(errors)
}

/// A transaction needs a selected card, a description and a positive value.
pub fn validate_transaction(draft: &TransactionDraft, selected_card_id: Option<&str>) -> ValidationResult {
    let mut errors = Vec::new();

    if selected_card_id.map_or(true, |id| id.is_empty()) {
        errors.push(ValidationError::new(
            "cardId",
            "Select a card before adding a transaction.",
            "Transaction",
        ));
    }

    if draft.description.is_empty() {
        errors.push(ValidationError::required("description", "Transaction"));
    }

    // NaN fails this comparison too
    if !(draft.value > 0.0 && draft.value.is_finite()) {
        errors.push(ValidationError::new(
            "value",
            &format!("value must be a positive amount, got {}.", draft.value),
            "Transaction",
        ));
    }

    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Operation;
    use chrono::{TimeZone, Utc};

    fn draft(description: &str, value: f64) -> TransactionDraft {
        TransactionDraft {
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
            description: description.to_string(),
            operation: Operation::Debit,
            value,
        }
    }

    #[test]
    fn test_complete_card_passes() {
        let card = Card::draft("Alice", "4111111111111111", "123", "12/29");
        assert!(validate_card(&card).is_ok());
    }

    #[test]
    fn test_card_reports_every_empty_field() {
        let card = Card::draft("", "4111111111111111", "", "");
        let errors = validate_card(&card).unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["holderName", "securityCode", "expiry"]);
        assert!(errors.iter().all(|e| e.context == "Card"));
    }

    #[test]
    fn test_transaction_requires_selected_card() {
        let errors = validate_transaction(&draft("Coffee", 4.5), None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cardId");

        let errors = validate_transaction(&draft("Coffee", 4.5), Some("")).unwrap_err();
        assert_eq!(errors[0].field, "cardId");
    }

    #[test]
    fn test_transaction_value_must_be_positive() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let errors = validate_transaction(&draft("Coffee", value), Some("card-1")).unwrap_err();
            assert_eq!(errors[0].field, "value", "value {} should be rejected", value);
        }
    }

    #[test]
    fn test_transaction_description_required() {
        let errors = validate_transaction(&draft("", 10.0), Some("card-1")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "description");
        assert_eq!(errors[0].to_string(), "[Transaction] description: description is required.");
    }

    #[test]
    fn test_valid_transaction_passes() {
        assert!(validate_transaction(&draft("Coffee", 4.5), Some("card-1")).is_ok());
    }
}
