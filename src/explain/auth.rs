//! API key lookup from the process environment

use super::error::ExplainError;

/// Default environment variable holding the Anthropic API key
pub const DEFAULT_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Resolves the Claude API key
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Read the API key from the named environment variable
    pub fn from_env(var: &str) -> Result<String, ExplainError> {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    /// Read the API key through an arbitrary lookup function
    pub fn from_lookup(
        var: &str,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<String, ExplainError> {
        let key = lookup(var)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ExplainError::ApiKeyNotFound { var: var.to_string() })?;

        if !Self::validate_key_format(&key) {
            tracing::warn!("{} does not look like an Anthropic key ({})", var, Self::mask_key(&key));
        } else {
            tracing::info!("Using API key {}", Self::mask_key(&key));
        }

        Ok(key)
    }

    /// Validate API key format
    fn validate_key_format(key: &str) -> bool {
        // Anthropic API keys start with "sk-ant-"
        key.starts_with("sk-ant-") && key.len() > 20
    }

    /// Mask an API key for display (show first 8 and last 4 chars)
    pub fn mask_key(key: &str) -> String {
        if key.len() <= 12 || !key.is_ascii() {
            return "*".repeat(key.chars().count());
        }
        let prefix = &key[..8];
        let suffix = &key[key.len() - 4..];
        format!("{}...{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_format() {
        assert!(ApiKeyManager::validate_key_format("sk-ant-REDACTED"));
        assert!(!ApiKeyManager::validate_key_format("invalid-key"));
        assert!(!ApiKeyManager::validate_key_format("sk-ant-short"));
    }

    #[test]
    fn mask_key() {
        let key = "sk-ant-REDACTED";
        let masked = ApiKeyManager::mask_key(key);
        assert!(masked.starts_with("sk-ant-a"));
        assert!(masked.ends_with("wxyz"));
        assert!(masked.contains("..."));
    }

    #[test]
    fn mask_short_key() {
        assert_eq!(ApiKeyManager::mask_key("abc"), "***");
    }

    #[test]
    fn lookup_returns_trimmed_key() {
        let key = ApiKeyManager::from_lookup("KEY", |_| Some(" sk-ant-REDACTED\n".into()))
            .unwrap();
        assert_eq!(key, "sk-ant-REDACTED");
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = ApiKeyManager::from_lookup("MY_KEY", |_| None).unwrap_err();
        assert!(matches!(err, ExplainError::ApiKeyNotFound { ref var } if var == "MY_KEY"));
    }

    #[test]
    fn empty_key_is_missing() {
        let err = ApiKeyManager::from_lookup("MY_KEY", |_| Some("   ".into())).unwrap_err();
        assert!(matches!(err, ExplainError::ApiKeyNotFound { .. }));
    }

    #[test]
    fn unusual_key_is_accepted() {
        assert!(ApiKeyManager::from_lookup("K", |_| Some("proxy-token".into())).is_ok());
    }
}
