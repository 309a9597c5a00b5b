//! Keyed digest-to-alphabet encoder.
//!
//! A token is `digest || salt`. The digest region is HMAC-SHA-512 over
//! `counter (8 bytes, big-endian) || session || salt`, read as one big-endian
//! unsigned integer and written out in base 66, least significant digit
//! first.

use crate::alphabet::{self, RADIX};
use crate::error::{Result, XsrfError};
use hmac::{Hmac, Mac};
use num_bigint::BigUint;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Encoder keyed once at construction.
#[derive(Clone)]
pub(crate) struct TokenEncoder {
    mac: HmacSha512,
    token_length: usize,
}

impl TokenEncoder {
    pub(crate) fn new(key: &[u8], token_length: usize) -> Result<Self> {
        let mac = HmacSha512::new_from_slice(key)
            .map_err(|e| XsrfError::InvalidConfig(format!("HMAC key rejected: {}", e)))?;
        Ok(Self { mac, token_length })
    }

    /// Length of the trailing salt region.
    pub(crate) fn salt_length(&self) -> usize {
        self.token_length / 2
    }

    /// Length of the leading digest region.
    pub(crate) fn digest_length(&self) -> usize {
        self.token_length - self.salt_length()
    }

    /// Encode a token. `salt` is copied verbatim and is not checked here.
    pub(crate) fn encode(&self, counter: i64, session: &[u8], salt: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(&counter.to_be_bytes());
        mac.update(session);
        mac.update(salt);
        let digest = mac.finalize().into_bytes();

        let digest_length = self.token_length.saturating_sub(salt.len());
        let mut token = Vec::with_capacity(digest_length + salt.len());

        let mut sum = BigUint::from_bytes_be(&digest);
        let base = BigUint::from(RADIX);
        for _ in 0..digest_length {
            let remainder = &sum % &base;
            sum /= &base;
            // An exhausted dividend keeps yielding digit 0.
            let digit = remainder.to_u32_digits().first().copied().unwrap_or(0);
            token.push(alphabet::symbol(digit as usize));
        }

        token.extend_from_slice(salt);
        token
    }
}
