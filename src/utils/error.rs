// Copyright (c) 2025-2026 the lintsmith contributors
// SPDX-License-Identifier: Apache-2.0

use console::style;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

/// Compiled regex patterns for redacting sensitive data.
///
/// The patterns are literals validated by tests, so a failure here can only
/// happen on first use in development.
static REDACTION_PATTERNS: LazyLock<[(regex::Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (
            regex::Regex::new(r"(api[_-]?key[=:\s]+)[^\s]+")
                .expect("api_key redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(token[=:\s]+)[^\s]+").expect("token redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(?i)(bearer\s+)[^\s]+")
                .expect("bearer redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(sk-[a-zA-Z0-9-]{8,})")
                .expect("sk-key redaction pattern is invalid"),
            "[REDACTED]",
        ),
    ]
});

#[derive(Debug, Error)]
pub enum LintsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(#[from] git2::Error),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("LLM provider error: {provider} - {}", redact_sensitive_data(message))]
    Provider { provider: String, message: String },

    #[error("Rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("{operation} timed out after {}s", elapsed.as_secs())]
    Timeout {
        operation: String,
        elapsed: Duration,
    },

    #[error("Parse error: {message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generator output that does not have the expected structure.
    #[error("Malformed generator output: {0}")]
    Shape(String),

    #[error("Checker error: {0}")]
    Checker(String),

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },

    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Redact sensitive information from error messages.
fn redact_sensitive_data(message: &str) -> String {
    let mut result = message.to_string();
    for (pattern, replacement) in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }
    result
}

impl LintsmithError {
    pub fn invalid_provider(provider: &str) -> Self {
        LintsmithError::ValidationError {
            message: format!("Invalid or disabled provider: '{}'", provider),
            suggestion: format!(
                "Valid providers are: {} (enable others with cargo features)",
                crate::llm::providers::AVAILABLE_PROVIDERS.join(", ")
            ),
        }
    }

    pub fn missing_api_key(provider: &str) -> Self {
        let env_var = format!("{}_API_KEY", provider.to_uppercase());
        LintsmithError::ValidationError {
            message: format!("API key not configured for provider '{}'", provider),
            suggestion: format!(
                "Set the {} environment variable before running lintsmith",
                env_var
            ),
        }
    }

    /// A configured number outside `allowed`.
    pub fn invalid_limit(name: &str, value: u64, allowed: RangeInclusive<u64>) -> Self {
        let suggestion = if *allowed.end() == u64::MAX {
            format!("{} must be at least {}", name, allowed.start())
        } else {
            format!(
                "{} must be between {} and {}",
                name,
                allowed.start(),
                allowed.end()
            )
        };
        LintsmithError::ValidationError {
            message: format!("Invalid {}: {}", name, value),
            suggestion,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LintsmithError::RateLimited { .. } | LintsmithError::NetworkError { .. }
        )
    }
}

impl From<serde_json::Error> for LintsmithError {
    fn from(err: serde_json::Error) -> Self {
        LintsmithError::ParseError {
            message: "Failed to parse JSON".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::ser::Error> for LintsmithError {
    fn from(err: toml::ser::Error) -> Self {
        LintsmithError::ParseError {
            message: "Failed to render configuration as TOML".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for LintsmithError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out. Check your network connection.".to_string()
        } else if err.is_connect() {
            "Failed to connect to server. Check your network connection.".to_string()
        } else if err.is_status() {
            format!(
                "HTTP error: {}",
                err.status()
                    .map_or("unknown".to_string(), |s| s.to_string())
            )
        } else if err.is_decode() {
            "Failed to decode response body".to_string()
        } else {
            "Network request failed".to_string()
        };

        LintsmithError::NetworkError {
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// Render an error for the terminal.
///
/// Validation errors get their suggestion on a separate line. With `verbose`,
/// the source chain is appended.
pub fn format_error(error: &LintsmithError, verbose: bool) -> String {
    let mut out = String::new();
    match error {
        LintsmithError::ValidationError {
            message,
            suggestion,
        } => {
            out.push_str(&format!("\n{} {}", style("Error:").red().bold(), message));
            out.push_str(&format!("\n{} {}", style("Hint:").cyan(), suggestion));
        }
        other => {
            out.push_str(&format!("\n{} {}", style("Error:").red().bold(), other));
        }
    }

    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            out.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_data_redaction() {
        let message = "Error with api_key=sk-1234567890abcdefghij and token=secret123";
        let redacted = redact_sensitive_data(message);
        assert!(!redacted.contains("sk-1234567890abcdefghij"));
        assert!(!redacted.contains("secret123"));
        assert!(redacted.contains("[REDACTED]"));
    }

    #[test]
    fn test_openrouter_key_redaction() {
        let redacted = redact_sensitive_data("bad key sk-or-v1-abcdef0123456789");
        assert!(!redacted.contains("abcdef0123456789"));
    }

    #[test]
    fn test_bearer_redaction_variants() {
        assert!(!redact_sensitive_data("Bearer abc123token").contains("abc123token"));
        assert!(!redact_sensitive_data("BEARER xyz789secret").contains("xyz789secret"));

        let msg = "Authorization: Bearer token123 and more text";
        let redacted = redact_sensitive_data(msg);
        assert!(!redacted.contains("token123"));
        assert!(redacted.contains("more text"));
    }

    #[test]
    fn test_provider_error_redacts_api_key() {
        let err = LintsmithError::Provider {
            provider: "openrouter".to_string(),
            message: "Failed with key sk-test123456789012345678901234".to_string(),
        };
        let msg = err.to_string();
        assert!(!msg.contains("sk-test123456789012345678901234"));
        assert!(msg.contains("[REDACTED]"));
    }

    #[test]
    fn test_missing_api_key_shows_env_var() {
        let err = LintsmithError::missing_api_key("openrouter");
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_transient_errors() {
        let limited = LintsmithError::RateLimited {
            provider: "openrouter".to_string(),
            retry_after: None,
        };
        assert!(limited.is_transient());
        assert!(!LintsmithError::Shape("x".to_string()).is_transient());
        assert!(!LintsmithError::Config("x".to_string()).is_transient());
    }

    #[test]
    fn test_format_error_includes_suggestion() {
        let err = LintsmithError::invalid_limit("max_attempts", 0, 1..=5);
        let rendered = format_error(&err, false);
        assert!(rendered.contains("max_attempts"));
        assert!(rendered.contains("between 1 and 5"));

        let err = LintsmithError::invalid_limit("step_timeout_secs", 0, 1..=u64::MAX);
        assert!(format_error(&err, false).contains("at least 1"));
    }
}
