//! # XSRF Tokens
//!
//! Stateless anti-forgery tokens bound to a session and a coarse time window.
//!
//! ## Features
//!
//! - ✅ **Stateless** - Nothing is stored; validity is recomputed
//! - ✅ **Session Binding** - A token only validates for the session it was issued to
//! - ✅ **Time Windows** - Tokens live between one and two lifetimes
//! - ✅ **URL-safe** - Fixed-length tokens over a 66-character alphabet
//! - ✅ **Constant-time Checks** - Comparison does not leak digest bytes
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use xsrf_token::{Authenticator, AuthenticatorConfig};
//!
//! let config = AuthenticatorConfig::new(AuthenticatorConfig::generate_key())
//!     .with_token_length(32)
//!     .with_lifetime(Duration::from_secs(3600));
//! let auth = Authenticator::new(config).unwrap();
//!
//! let token = auth.generate_token_now("session-id");
//! assert_eq!(token.len(), 32);
//! assert!(auth.validate_token_now("session-id", &token));
//! assert!(!auth.validate_token_now("another-session", &token));
//! ```
//!
//! ## Token Layout
//!
//! A token of length `n` is `digest || salt`. The last `n / 2` characters are
//! a random salt; the rest is HMAC-SHA-512 over the window counter, session
//! and salt, written in base 66. Each digest character carries log2(66) ≈
//! 6.04 bits, so the recommended 12 to 40 characters give 36 to 121 bits of
//! forgery resistance. Beyond 168 characters the digest is exhausted.
//!
//! ## Time Windows
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use xsrf_token::{Authenticator, AuthenticatorConfig};
//!
//! let auth = Authenticator::new(
//!     AuthenticatorConfig::new(vec![b'K'; 64]).with_token_length(12),
//! )
//! .unwrap();
//!
//! let issued = Utc.timestamp_opt(1_699_999_200, 0).unwrap();
//! let token = auth.generate_token(issued, "alice");
//!
//! assert!(auth.validate_token(issued + Duration::minutes(90), "alice", &token));
//! assert!(!auth.validate_token(issued + Duration::minutes(150), "alice", &token));
//! ```

pub mod alphabet;
pub mod authenticator;
pub mod config;
mod encoder;
pub mod error;
pub mod window;

pub use authenticator::Authenticator;
pub use config::{AuthenticatorConfig, AuthenticatorSettings};
pub use error::{Result, XsrfError};
