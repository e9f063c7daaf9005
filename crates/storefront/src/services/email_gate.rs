//! Email gate: accept or reject a customer's email before an order is sent.
//!
//! The gate asks an [`EmailClassifier`] for a verdict, applies the store's
//! override rules to it, and falls back to a local syntax check whenever the
//! classifier cannot answer. The fallback only checks shape, so an unreachable
//! classifier never blocks checkout.
//!
//! ```text
//! idle -> validating -> valid | invalid
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bazar_core::Email;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Scores below this are treated as low-reputation addresses.
pub const MIN_REPUTATION_SCORE: f64 = 30.0;

pub const MSG_DISPOSABLE: &str = "No se permiten correos temporales o desechables.";
pub const MSG_LOW_REPUTATION: &str = "El correo parece inválido o de baja reputación.";
pub const MSG_VALID: &str = "Email válido";
pub const MSG_INVALID_FORMAT: &str = "Formato de correo inválido.";
pub const MSG_BASIC_PASSED: &str = "Validación básica exitosa.";

/// Instruction sent to the classifier after the candidate address.
pub const CLASSIFIER_INSTRUCTION: &str = "\
Perform an advanced verification:
1. Check if the domain is a known disposable/temporary email provider (like mailinator, yopmail, etc.).
2. Analyze if the syntax is valid.
3. Check if the username part looks like random gibberish (high entropy) often used by bots.
4. Estimate if the domain is likely to have MX records (common domains like gmail, outlook, etc. are always fine).

Return the result in JSON format with the fields isValid, message, isDisposable and reputationScore (0 to 100).";

/// Errors a classifier can report. All of them route to the local fallback.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No classifier is configured.
    #[error("classifier unavailable")]
    Unavailable,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Raw verdict returned by a classifier, before the store's rules apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerdict {
    pub is_valid: bool,
    pub message: String,
    pub is_disposable: bool,
    /// 0 to 100.
    pub reputation_score: f64,
}

impl EmailVerdict {
    /// Reject verdicts that fall outside the documented contract.
    ///
    /// A disposable verdict is always kept: it is rejected by
    /// [`apply_policy`] whatever its score says.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Malformed` if the verdict is not disposable
    /// and the score is not a finite number between 0 and 100.
    pub fn check_contract(self) -> Result<Self, ClassifierError> {
        if self.is_disposable || score_in_range(self.reputation_score) {
            Ok(self)
        } else {
            Err(ClassifierError::Malformed(format!(
                "reputationScore out of range: {}",
                self.reputation_score
            )))
        }
    }
}

fn score_in_range(score: f64) -> bool {
    score.is_finite() && (0.0..=100.0).contains(&score)
}

/// Where a validation result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationSource {
    /// The external classifier answered.
    Classifier,
    /// The classifier failed; the local syntax check decided.
    Fallback,
}

/// Outcome of running the gate on one address.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailValidation {
    pub is_valid: bool,
    /// Human-readable reason, shown to the customer when invalid.
    pub message: String,
    /// Reputation score reported by the classifier, when it answered.
    pub score: Option<f64>,
    pub source: ValidationSource,
}

/// Capability that classifies an email address.
#[async_trait]
pub trait EmailClassifier: Send + Sync {
    /// Classify `email`.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError` on any transport or contract failure.
    async fn classify(&self, email: &str) -> Result<EmailVerdict, ClassifierError>;
}

/// Classifier used when no remote classifier is configured.
///
/// Always unavailable, so every address goes through the local fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClassifier;

#[async_trait]
impl EmailClassifier for OfflineClassifier {
    async fn classify(&self, _email: &str) -> Result<EmailVerdict, ClassifierError> {
        Err(ClassifierError::Unavailable)
    }
}

/// Classifier policy plus local fallback.
#[derive(Clone)]
pub struct EmailGate {
    classifier: Arc<dyn EmailClassifier>,
}

impl EmailGate {
    /// Create a gate backed by `classifier`.
    #[must_use]
    pub fn new(classifier: Arc<dyn EmailClassifier>) -> Self {
        Self { classifier }
    }

    /// A gate that only runs the local syntax check.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineClassifier))
    }

    /// Validate `email`.
    ///
    /// Never fails: classifier errors are logged and answered by the local
    /// fallback, which never calls the classifier again.
    #[instrument(skip(self, email), fields(email_len = email.len()))]
    pub async fn validate(&self, email: &str) -> EmailValidation {
        match self.classifier.classify(email).await {
            Ok(verdict) => {
                debug!(
                    is_valid = verdict.is_valid,
                    is_disposable = verdict.is_disposable,
                    score = verdict.reputation_score,
                    "Classifier verdict received"
                );
                apply_policy(verdict)
            }
            Err(ClassifierError::Unavailable) => {
                debug!("No classifier configured, using basic validation");
                fallback_check(email)
            }
            Err(e) => {
                warn!(error = %e, "Email classifier failed, using basic validation");
                fallback_check(email)
            }
        }
    }
}

impl std::fmt::Debug for EmailGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailGate").finish_non_exhaustive()
    }
}

/// Apply the store's override rules to a classifier verdict.
///
/// Disposable domains are always rejected, then low reputation, and only
/// then does the classifier's own `is_valid` decide.
#[must_use]
pub fn apply_policy(verdict: EmailVerdict) -> EmailValidation {
    let score = score_in_range(verdict.reputation_score).then_some(verdict.reputation_score);
    let (is_valid, message) = if verdict.is_disposable {
        (false, MSG_DISPOSABLE.to_string())
    } else if verdict.reputation_score < MIN_REPUTATION_SCORE {
        (false, MSG_LOW_REPUTATION.to_string())
    } else if verdict.is_valid {
        (true, MSG_VALID.to_string())
    } else {
        (false, verdict.message)
    };

    EmailValidation {
        is_valid,
        message,
        score,
        source: ValidationSource::Classifier,
    }
}

/// Local `local@domain.tld` shape check used when the classifier fails.
#[must_use]
pub fn fallback_check(email: &str) -> EmailValidation {
    let (is_valid, message) = match Email::parse(email) {
        Ok(_) => (true, MSG_BASIC_PASSED),
        Err(_) => (false, MSG_INVALID_FORMAT),
    };

    EmailValidation {
        is_valid,
        message: message.to_string(),
        score: None,
        source: ValidationSource::Fallback,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns a fixed verdict (or failure) and counts calls.
    struct StubClassifier {
        verdict: Option<EmailVerdict>,
        calls: AtomicUsize,
    }

    impl StubClassifier {
        fn answering(verdict: EmailVerdict) -> Arc<Self> {
            Arc::new(Self {
                verdict: Some(verdict),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                verdict: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl EmailClassifier for StubClassifier {
        async fn classify(&self, _email: &str) -> Result<EmailVerdict, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict
                .clone()
                .ok_or_else(|| ClassifierError::Malformed("stub failure".to_string()))
        }
    }

    fn verdict(is_valid: bool, is_disposable: bool, score: f64) -> EmailVerdict {
        EmailVerdict {
            is_valid,
            message: "classifier says no".to_string(),
            is_disposable,
            reputation_score: score,
        }
    }

    #[tokio::test]
    async fn test_disposable_overrides_valid_verdict() {
        let gate = EmailGate::new(StubClassifier::answering(verdict(true, true, 95.0)));
        let result = gate.validate("bot@mailinator.com").await;
        assert!(!result.is_valid);
        assert_eq!(result.message, MSG_DISPOSABLE);
        assert_eq!(result.source, ValidationSource::Classifier);
    }

    #[tokio::test]
    async fn test_low_reputation_rejected() {
        let gate = EmailGate::new(StubClassifier::answering(verdict(true, false, 29.9)));
        let result = gate.validate("x8f7q2@oddmail.io").await;
        assert!(!result.is_valid);
        assert_eq!(result.message, MSG_LOW_REPUTATION);
        assert_eq!(result.score, Some(29.9));
    }

    #[tokio::test]
    async fn test_score_at_threshold_passes() {
        let gate = EmailGate::new(StubClassifier::answering(verdict(true, false, 30.0)));
        let result = gate.validate("ana@gmail.com").await;
        assert!(result.is_valid);
        assert_eq!(result.message, MSG_VALID);
    }

    #[tokio::test]
    async fn test_invalid_verdict_keeps_classifier_message() {
        let gate = EmailGate::new(StubClassifier::answering(verdict(false, false, 80.0)));
        let result = gate.validate("ana@gmial.con").await;
        assert!(!result.is_valid);
        assert_eq!(result.message, "classifier says no");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_syntax_check() {
        let stub = StubClassifier::failing();
        let gate = EmailGate::new(stub.clone());

        let bad = gate.validate("bad-email").await;
        assert!(!bad.is_valid);
        assert_eq!(bad.message, MSG_INVALID_FORMAT);
        assert_eq!(bad.source, ValidationSource::Fallback);

        let good = gate.validate("user@example.com").await;
        assert!(good.is_valid);
        assert_eq!(good.message, MSG_BASIC_PASSED);
        assert_eq!(good.score, None);

        // One classifier call per validation, never a retry.
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fallback_treats_byte_order_mark_as_whitespace() {
        assert!(!fallback_check("user\u{feff}@example.com").is_valid);
        assert!(fallback_check("user\u{85}@example.com").is_valid);
    }

    #[tokio::test]
    async fn test_offline_gate_uses_fallback() {
        let result = EmailGate::offline().validate("user@example.com").await;
        assert!(result.is_valid);
        assert_eq!(result.source, ValidationSource::Fallback);
    }

    #[test]
    fn test_verdict_deserializes_camel_case() {
        let json = r#"{"isValid":true,"message":"ok","isDisposable":false,"reputationScore":88}"#;
        let verdict: EmailVerdict = serde_json::from_str(json).unwrap();
        assert!(verdict.is_valid);
        assert!((verdict.reputation_score - 88.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_disposable_rejected_even_with_out_of_range_score() {
        for score in [101.0, -5.0, f64::NAN] {
            let checked = verdict(true, true, score).check_contract().unwrap();
            let gate = EmailGate::new(StubClassifier::answering(checked));

            let result = gate.validate("bot@mailinator.com").await;
            assert!(!result.is_valid);
            assert_eq!(result.message, MSG_DISPOSABLE);
            assert_eq!(result.source, ValidationSource::Classifier);
            assert_eq!(result.score, None);
        }
    }

    #[test]
    fn test_check_contract_rejects_out_of_range_score() {
        assert!(verdict(true, false, 101.0).check_contract().is_err());
        assert!(verdict(true, false, -1.0).check_contract().is_err());
        assert!(verdict(true, false, f64::NAN).check_contract().is_err());
        assert!(verdict(true, false, 0.0).check_contract().is_ok());
    }
}
