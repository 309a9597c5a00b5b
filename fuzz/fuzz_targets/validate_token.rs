//! Fuzz target for token validation.
//!
//! Arbitrary tokens, sessions and clock values must never panic, and a
//! freshly generated token must always validate.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{DateTime, Utc};
use libfuzzer_sys::fuzz_target;
use std::time::Duration;
use xsrf_token::{Authenticator, AuthenticatorConfig};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    token_length: u8,
    lifetime_secs: u32,
    timestamp: i64,
    session: Vec<u8>,
    token: String,
}

fuzz_target!(|data: FuzzInput| {
    let config = AuthenticatorConfig::new(vec![b'K'; 64])
        .with_token_length(usize::from(data.token_length))
        .with_lifetime(Duration::from_secs(u64::from(data.lifetime_secs)));

    // Zero length or lifetime is a configuration error
    let Ok(auth) = Authenticator::new(config) else {
        return;
    };
    let Some(now) = DateTime::<Utc>::from_timestamp(data.timestamp, 0) else {
        return;
    };

    let _ = auth.validate_token(now, &data.session, &data.token);

    let token = auth.generate_token(now, &data.session);
    assert_eq!(token.len(), auth.token_length());
    assert!(auth.validate_token(now, &data.session, &token));
});
