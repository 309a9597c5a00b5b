// xsrf - Stateless, session-bound anti-forgery tokens
//
// This library issues fixed-length, URL-safe tokens bound to a session and a
// coarse time window, and validates them without storing anything.

// Re-export optional crates
#[cfg(feature = "token")]
pub use xsrf_token;

#[cfg(feature = "token")]
pub use xsrf_token::{alphabet, window};

// Prelude for common imports
pub mod prelude {
    #[cfg(feature = "token")]
    pub use xsrf_token::{
        Authenticator, AuthenticatorConfig, AuthenticatorSettings, Result, XsrfError,
    };
}
