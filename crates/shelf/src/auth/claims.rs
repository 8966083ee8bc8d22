// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access-token claims, decoded without signature verification.
//!
//! The result is a UI hint (e.g. whether to show admin actions), never an
//! authorization decision. Anything that fails to decode is `Malformed`, and
//! `Malformed` reads as "not admin".

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};

/// Names the admin flag goes by, checked in order.
const ADMIN_CLAIMS: [&str; 3] = ["is_admin", "isAdmin", "admin"];

/// Claims the client cares about. Unknown claims are ignored.
///
/// Each claim is read on its own: a claim with an unexpected type is treated
/// as absent and never spoils the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    pub sub: Option<Value>,
    /// Expiry as epoch seconds (fractional NumericDates are truncated).
    pub exp: Option<u64>,
    pub is_admin: bool,
}

impl Claims {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let exp = obj.get("exp").and_then(|v| {
            v.as_u64().or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        });
        let is_admin =
            ADMIN_CLAIMS.iter().find_map(|name| obj.get(*name).and_then(Value::as_bool));
        Self {
            sub: obj.get("sub").filter(|v| !v.is_null()).cloned(),
            exp,
            is_admin: is_admin.unwrap_or(false),
        }
    }
}

/// Outcome of decoding a token's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedClaims {
    Ok(Claims),
    Malformed,
}

impl DecodedClaims {
    pub fn is_admin(&self) -> bool {
        match self {
            Self::Ok(claims) => claims.is_admin,
            Self::Malformed => false,
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Ok(claims) => Some(claims),
            Self::Malformed => None,
        }
    }
}

/// Decode the payload segment of a JWT-shaped token.
pub fn decode(token: &str) -> DecodedClaims {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return DecodedClaims::Malformed;
    };

    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) else {
        return DecodedClaims::Malformed;
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(obj)) => DecodedClaims::Ok(Claims::from_object(&obj)),
        Ok(_) => {
            tracing::debug!("token claims are not an object");
            DecodedClaims::Malformed
        }
        Err(e) => {
            tracing::debug!(err = %e, "token claims did not parse");
            DecodedClaims::Malformed
        }
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
