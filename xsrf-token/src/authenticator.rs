use crate::alphabet::{self, BITS_PER_SYMBOL};
use crate::config::AuthenticatorConfig;
use crate::encoder::TokenEncoder;
use crate::error::{Result, XsrfError};
use crate::window;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Digest output size of HMAC-SHA-512 in bits.
const DIGEST_BITS: f64 = 512.0;

/// Issues and checks session-bound tokens.
///
/// Nothing is stored: a token is accepted iff it is the encoding of its own
/// salt for the current or the previous time window. Clones share the
/// configuration.
#[derive(Clone)]
pub struct Authenticator {
    config: Arc<AuthenticatorConfig>,
    encoder: TokenEncoder,
}

impl Authenticator {
    /// Create an authenticator from a validated configuration
    pub fn new(config: AuthenticatorConfig) -> Result<Self> {
        config.validate()?;
        let encoder = TokenEncoder::new(&config.key, config.token_length)?;

        tracing::debug!(
            token_length = config.token_length,
            lifetime_secs = config.lifetime.as_secs_f64(),
            "xsrf authenticator created"
        );

        Ok(Self {
            config: Arc::new(config),
            encoder,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    /// Token length in characters
    pub fn token_length(&self) -> usize {
        self.config.token_length
    }

    /// Length of the random salt at the end of each token
    pub fn salt_length(&self) -> usize {
        self.encoder.salt_length()
    }

    /// Forgery resistance of the digest region in bits
    pub fn security_bits(&self) -> f64 {
        (self.encoder.digest_length() as f64 * BITS_PER_SYMBOL).min(DIGEST_BITS)
    }

    /// Window counter for `now`
    pub fn counter(&self, now: DateTime<Utc>) -> i64 {
        window::counter_at(now, self.config.lifetime)
    }

    /// First instant at which a token issued at `issued_at` is rejected.
    pub fn valid_until(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let counter = self.counter(issued_at).checked_add(2)?;
        window::window_start(counter, self.config.lifetime)
    }

    /// Generate a token for `session`.
    ///
    /// `now` should be the current time and `session` should uniquely
    /// identify the user, such as a session id.
    pub fn generate_token(&self, now: DateTime<Utc>, session: impl AsRef<[u8]>) -> String {
        self.generate_token_with_rng(now, session, &mut rand::thread_rng())
    }

    /// Generate a token for `session` at the current time
    pub fn generate_token_now(&self, session: impl AsRef<[u8]>) -> String {
        self.generate_token(Utc::now(), session)
    }

    /// Generate a token drawing the salt from `rng`
    pub fn generate_token_with_rng<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        session: impl AsRef<[u8]>,
        rng: &mut R,
    ) -> String {
        let salt = alphabet::random_salt(rng, self.salt_length());
        let token = self
            .encoder
            .encode(self.counter(now), session.as_ref(), &salt);
        to_ascii_string(&token)
    }

    /// Encode a token for an explicit window counter and salt.
    ///
    /// The salt must be `salt_length()` alphabet characters.
    pub fn encode(&self, counter: i64, session: impl AsRef<[u8]>, salt: &str) -> Result<String> {
        if salt.len() != self.salt_length() {
            return Err(XsrfError::InvalidSaltLength {
                expected: self.salt_length(),
                actual: salt.len(),
            });
        }
        check_salt(salt.as_bytes())?;

        let token = self
            .encoder
            .encode(counter, session.as_ref(), salt.as_bytes());
        Ok(to_ascii_string(&token))
    }

    /// Check whether `token` is valid for `session` at `now`.
    ///
    /// Every failure yields `false`. Malformed tokens are logged.
    pub fn validate_token(
        &self,
        now: DateTime<Utc>,
        session: impl AsRef<[u8]>,
        token: &str,
    ) -> bool {
        match self.verify_token(now, session, token) {
            Ok(()) => true,
            Err(XsrfError::InvalidLength { expected, actual }) => {
                tracing::warn!(expected, actual, "xsrf token rejected: invalid length");
                false
            }
            Err(XsrfError::InvalidCharacter(character)) => {
                tracing::warn!(?character, "xsrf token rejected: invalid character");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "xsrf token rejected");
                false
            }
        }
    }

    /// Check `token` for `session` at the current time
    pub fn validate_token_now(&self, session: impl AsRef<[u8]>, token: &str) -> bool {
        self.validate_token(Utc::now(), session, token)
    }

    /// Like [`validate_token`](Self::validate_token), but reports why a
    /// token was rejected and logs nothing.
    pub fn verify_token(
        &self,
        now: DateTime<Utc>,
        session: impl AsRef<[u8]>,
        token: &str,
    ) -> Result<()> {
        let presented = token.as_bytes();
        if presented.len() != self.token_length() {
            return Err(XsrfError::InvalidLength {
                expected: self.token_length(),
                actual: presented.len(),
            });
        }

        let salt = &presented[self.encoder.digest_length()..];
        check_salt(salt)?;

        let session = session.as_ref();
        let counter = self.counter(now);
        let current = self.encoder.encode(counter, session, salt);
        let previous = self.encoder.encode(counter.wrapping_sub(1), session, salt);

        let matched = presented.ct_eq(&current) | presented.ct_eq(&previous);
        if bool::from(matched) {
            Ok(())
        } else {
            Err(XsrfError::Mismatch)
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .finish()
    }
}

fn check_salt(salt: &[u8]) -> Result<()> {
    match salt.iter().find(|&&b| !alphabet::contains(b)) {
        Some(&b) => Err(XsrfError::InvalidCharacter(char::from(b))),
        None => Ok(()),
    }
}

// Encoder output is alphabet-only, hence ASCII.
fn to_ascii_string(token: &[u8]) -> String {
    token.iter().map(|&b| char::from(b)).collect()
}
