// Kavita Source - Kavita Content Adapter for Reader Hosts
// Copyright (C) 2025 Kavita Source contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Bearer-token payload decoding
//!
//! Kavita issues standard three-segment JWTs. The adapter never verifies
//! signatures; it trusts TLS and the server's own validation. It only
//! decodes the middle (payload) segment to read the `exp` claim and
//! self-schedule refreshes.

use crate::error::{KavitaError, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

/// Claims this adapter cares about; everything else in the payload is
/// ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Decode the payload segment of a JWT without verifying the signature.
///
/// Tolerates both base64url (`-`/`_`) and standard (`+`/`/`) alphabets and
/// any amount of `=` padding. Fails with a `Parse` error for tokens with
/// fewer than two `.` separators or an undecodable payload.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => {
            return Err(KavitaError::parse(
                "session token",
                "expected a three-segment JWT",
            ))
        }
    };

    // Normalize to the url-safe unpadded form the engine expects.
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let raw = general_purpose::URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| KavitaError::parse("session token", format!("payload is not base64: {e}")))?;

    serde_json::from_slice(&raw)
        .map_err(|e| KavitaError::parse("session token", format!("payload is not valid JSON: {e}")))
}

/// Read just the `exp` claim (seconds since epoch) from a bearer token.
pub fn decode_expiry(token: &str) -> Result<i64> {
    Ok(decode_claims(token)?.exp)
}
