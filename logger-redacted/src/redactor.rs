use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref PATTERNS: Vec<(&'static str, Regex)> = [
        ("EMAIL", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
        ("SSN", r"\b\d{3}-\d{2}-\d{4}\b"),
        ("PHONE", r"\b(?:\+1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})\b"),
    ]
    .into_iter()
    .filter_map(|(label, pattern)| Regex::new(pattern).ok().map(|regex| (label, regex)))
    .collect();
}

/// Redacts protected health information before it is written to logs
#[derive(Debug, Clone)]
pub struct PhiRedactor {
    enabled: bool,
}

impl PhiRedactor {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace a whole field (symptom list, gender, age) with a correlation hash
    pub fn redact_field(&self, value: &str) -> String {
        if !self.enabled {
            return value.to_string();
        }
        format!("REDACTED[{}]", Self::hash_value(value))
    }

    /// Mask identifiers embedded in free text
    pub fn redact(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }

        // Emails before phones so digits inside addresses stay intact
        PATTERNS.iter().fold(text.to_string(), |acc, (label, regex)| {
            regex
                .replace_all(&acc, |caps: &regex::Captures| {
                    format!("{}[{}]", label, Self::hash_value(&caps[0]))
                })
                .into_owned()
        })
    }

    fn hash_value(value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let digest = hasher.finalize();
        // First 8 bytes are enough for correlation
        general_purpose::STANDARD.encode(&digest[..8])
    }
}

impl Default for PhiRedactor {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_redaction_is_stable() {
        let redactor = PhiRedactor::new(true);

        let first = redactor.redact_field("vomiting;cramping;female");
        let second = redactor.redact_field("vomiting;cramping;female");
        let other = redactor.redact_field("fever;male");

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.starts_with("REDACTED["));
        assert!(!first.contains("vomiting"));
    }

    #[test]
    fn test_disabled_redactor_passes_through() {
        let redactor = PhiRedactor::new(false);
        assert_eq!(redactor.redact_field("fever"), "fever");
        assert_eq!(redactor.redact("mail jane@example.com"), "mail jane@example.com");
    }

    #[test]
    fn test_free_text_identifiers() {
        let redactor = PhiRedactor::default();

        let text = "contact jane.doe@example.com or (555) 123-4567, ssn 123-45-6789";
        let redacted = redactor.redact(text);

        assert!(!redacted.contains("jane.doe@example.com"));
        assert!(!redacted.contains("123-4567"));
        assert!(!redacted.contains("123-45-6789"));
        assert!(redacted.contains("EMAIL["));
        assert!(redacted.contains("SSN["));
        assert!(redacted.contains("PHONE["));
    }
}
