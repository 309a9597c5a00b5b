use crate::error::{Result, XsrfError};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

/// Recommended minimum key size in bytes.
pub const RECOMMENDED_KEY_LENGTH: usize = 64;

/// Shortest token length considered secure.
pub const MIN_RECOMMENDED_TOKEN_LENGTH: usize = 12;

/// Longest token length that still adds security. Longer tokens work but
/// only pad the digest region.
pub const MAX_EFFECTIVE_TOKEN_LENGTH: usize = 168;

const DEFAULT_TOKEN_LENGTH: usize = 32;
const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// Authenticator configuration
#[derive(Clone)]
pub struct AuthenticatorConfig {
    /// Secret HMAC key (approximately 64 bytes of unguessable data)
    pub key: Vec<u8>,

    /// Total token length in characters
    pub token_length: usize,

    /// Minimum validity of a token. Tokens are accepted for at least
    /// `lifetime` and less than twice `lifetime`.
    pub lifetime: Duration,
}

impl AuthenticatorConfig {
    /// Create a configuration with default token length and lifetime
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            token_length: DEFAULT_TOKEN_LENGTH,
            lifetime: Duration::from_secs(DEFAULT_LIFETIME_SECS),
        }
    }

    /// Generate a random key of the recommended size
    pub fn generate_key() -> Vec<u8> {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        (0..RECOMMENDED_KEY_LENGTH).map(|_| rng.r#gen()).collect()
    }

    /// Set token length
    pub fn with_token_length(mut self, token_length: usize) -> Self {
        self.token_length = token_length;
        self
    }

    /// Set token lifetime
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Check the configuration.
    ///
    /// Unusable values are errors. Legal values outside the recommended
    /// ranges only log a warning.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(XsrfError::InvalidConfig("key must not be empty".to_string()));
        }
        if self.token_length == 0 {
            return Err(XsrfError::InvalidConfig(
                "token length must be positive".to_string(),
            ));
        }
        if self.lifetime.is_zero() {
            return Err(XsrfError::InvalidConfig(
                "lifetime must be positive".to_string(),
            ));
        }

        if self.key.len() < RECOMMENDED_KEY_LENGTH {
            tracing::warn!(
                key_length = self.key.len(),
                recommended = RECOMMENDED_KEY_LENGTH,
                "xsrf key is shorter than recommended"
            );
        }
        if self.token_length < MIN_RECOMMENDED_TOKEN_LENGTH {
            tracing::warn!(
                token_length = self.token_length,
                "xsrf token length below {} offers weak forgery resistance",
                MIN_RECOMMENDED_TOKEN_LENGTH
            );
        } else if self.token_length > MAX_EFFECTIVE_TOKEN_LENGTH {
            tracing::warn!(
                token_length = self.token_length,
                "xsrf token length above {} adds no security",
                MAX_EFFECTIVE_TOKEN_LENGTH
            );
        }

        Ok(())
    }

    /// Load configuration from `{prefix}_KEY`, `{prefix}_TOKEN_LENGTH` and
    /// `{prefix}_LIFETIME_SECS`.
    ///
    /// The key is base64url without padding. The other two variables are
    /// optional.
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| format!("{}_{}", prefix, suffix);

        let key_var = var("KEY");
        let key = lookup(&key_var).ok_or(XsrfError::MissingVar(key_var))?;
        let mut config = Self::new(URL_SAFE_NO_PAD.decode(key.trim())?);

        if let Some(value) = lookup(&var("TOKEN_LENGTH")) {
            config.token_length = parse_var(&var("TOKEN_LENGTH"), &value)?;
        }
        if let Some(value) = lookup(&var("LIFETIME_SECS")) {
            config.lifetime = Duration::from_secs(parse_var(&var("LIFETIME_SECS"), &value)?);
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| XsrfError::InvalidConfig(format!("{}: {}", name, e)))
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self::new(Self::generate_key())
    }
}

impl fmt::Debug for AuthenticatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatorConfig")
            .field("key", &format_args!("[redacted; {} bytes]", self.key.len()))
            .field("token_length", &self.token_length)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Serializable form of [`AuthenticatorConfig`], e.g. for a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatorSettings {
    /// Base64url (unpadded) encoded key
    pub key: String,

    #[serde(default = "default_token_length")]
    pub token_length: usize,

    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: u64,
}

fn default_token_length() -> usize {
    DEFAULT_TOKEN_LENGTH
}

fn default_lifetime_secs() -> u64 {
    DEFAULT_LIFETIME_SECS
}

impl TryFrom<AuthenticatorSettings> for AuthenticatorConfig {
    type Error = XsrfError;

    fn try_from(settings: AuthenticatorSettings) -> Result<Self> {
        let key = URL_SAFE_NO_PAD.decode(settings.key.trim())?;
        Ok(Self::new(key)
            .with_token_length(settings.token_length)
            .with_lifetime(Duration::from_secs(settings.lifetime_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_creation() {
        let key = AuthenticatorConfig::generate_key();
        assert_eq!(key.len(), 64);

        let config = AuthenticatorConfig::new(key);
        assert_eq!(config.token_length, 32);
        assert_eq!(config.lifetime, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(
            AuthenticatorConfig::generate_key(),
            AuthenticatorConfig::generate_key()
        );
    }

    #[test]
    fn test_config_builder() {
        let config = AuthenticatorConfig::default()
            .with_token_length(40)
            .with_lifetime(Duration::from_secs(600));

        assert_eq!(config.token_length, 40);
        assert_eq!(config.lifetime, Duration::from_secs(600));
    }

    #[test]
    fn test_invalid_config() {
        assert!(AuthenticatorConfig::new(Vec::new()).validate().is_err());
        assert!(
            AuthenticatorConfig::default()
                .with_token_length(0)
                .validate()
                .is_err()
        );
        assert!(
            AuthenticatorConfig::default()
                .with_lifetime(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_weak_config_is_still_valid() {
        let config = AuthenticatorConfig::new(b"short".to_vec())
            .with_token_length(4)
            .with_lifetime(Duration::from_nanos(1));
        assert!(config.validate().is_ok());

        let config = AuthenticatorConfig::default().with_token_length(500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AuthenticatorConfig::new(vec![b'S'; 64]);
        let debug = format!("{:?}", config);
        assert!(debug.contains("[redacted; 64 bytes]"));
        assert!(!debug.contains("SSSS"));
    }

    #[test]
    fn test_from_lookup() {
        let key = URL_SAFE_NO_PAD.encode([7u8; 64]);
        let config = AuthenticatorConfig::from_lookup(
            "XSRF",
            lookup_from(&[
                ("XSRF_KEY", key.as_str()),
                ("XSRF_TOKEN_LENGTH", "20"),
                ("XSRF_LIFETIME_SECS", " 900 "),
            ]),
        )
        .unwrap();

        assert_eq!(config.key, vec![7u8; 64]);
        assert_eq!(config.token_length, 20);
        assert_eq!(config.lifetime, Duration::from_secs(900));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let key = URL_SAFE_NO_PAD.encode([1u8; 64]);
        let config =
            AuthenticatorConfig::from_lookup("APP", lookup_from(&[("APP_KEY", key.as_str())]))
                .unwrap();

        assert_eq!(config.token_length, 32);
        assert_eq!(config.lifetime, Duration::from_secs(3600));
    }

    #[test]
    fn test_from_lookup_errors() {
        let missing = AuthenticatorConfig::from_lookup("XSRF", lookup_from(&[]));
        assert!(matches!(missing, Err(XsrfError::MissingVar(ref name)) if name == "XSRF_KEY"));

        let bad_key = AuthenticatorConfig::from_lookup("XSRF", lookup_from(&[("XSRF_KEY", "!!")]));
        assert!(matches!(bad_key, Err(XsrfError::KeyDecode(_))));

        let key = URL_SAFE_NO_PAD.encode([1u8; 64]);
        let bad_length = AuthenticatorConfig::from_lookup(
            "XSRF",
            lookup_from(&[("XSRF_KEY", key.as_str()), ("XSRF_TOKEN_LENGTH", "twelve")]),
        );
        assert!(matches!(bad_length, Err(XsrfError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_env_missing_var() {
        let result = AuthenticatorConfig::from_env("XSRF_TEST_UNSET_67890");
        assert!(matches!(result, Err(XsrfError::MissingVar(_))));
    }

    #[test]
    fn test_settings_deserialize() {
        let key = URL_SAFE_NO_PAD.encode([9u8; 64]);
        let json = format!(r#"{{"key": "{}", "lifetime_secs": 60}}"#, key);
        let settings: AuthenticatorSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.token_length, 32);

        let config = AuthenticatorConfig::try_from(settings).unwrap();
        assert_eq!(config.key, vec![9u8; 64]);
        assert_eq!(config.lifetime, Duration::from_secs(60));
    }

    #[test]
    fn test_settings_bad_key() {
        let settings = AuthenticatorSettings {
            key: "not base64!".to_string(),
            token_length: 12,
            lifetime_secs: 60,
        };
        assert!(AuthenticatorConfig::try_from(settings).is_err());
    }
}
