//! Customer details captured by the checkout form.

use super::CountryCode;

/// Contact details typed into the checkout form.
///
/// Values are kept exactly as entered; trimming and whitespace removal happen
/// when the order message is composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone_prefix: CountryCode,
    pub phone: String,
    pub email: String,
    /// Free-text delivery or pickup instructions.
    pub comments: String,
}

impl CustomerInfo {
    /// Whether every required field has non-whitespace content.
    ///
    /// Required fields are first name, last name, phone and email.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        [&self.first_name, &self.last_name, &self.phone, &self.email]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// `"{first} {last}"` with each part trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Comments, or `None` when blank.
    #[must_use]
    pub fn comments(&self) -> Option<&str> {
        let trimmed = self.comments.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
