// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP Basic credential parsing.
//!
//! The password is not checked here. It is forwarded to the repository when
//! the caller needs a session of their own.

use base64ct::{Base64, Encoding};

use super::AuthError;
use crate::engine::Credentials;

/// Authorization scheme accepted by the API.
pub const BASIC_SCHEME: &str = "Basic";

/// Decode a `Basic <base64(username:password)>` header value.
///
/// The pair is split on the first `:`, so passwords may contain colons.
/// An empty username is rejected, as it never matches an access entry.
pub fn parse_basic(header: &str) -> Result<Credentials, AuthError> {
    let (scheme, payload) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return Err(AuthError::InvalidAuthHeader);
    }

    let decoded = Base64::decode_vec(payload.trim()).map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials)?;
    if username.is_empty() {
        return Err(AuthError::MalformedCredentials);
    }

    Ok(Credentials::new(username, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine};

    fn header(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn decodes_username_and_password() {
        let creds = parse_basic(&header("alice:wonderland")).unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "wonderland");
    }

    #[test]
    fn password_may_contain_colons() {
        let creds = parse_basic(&header("alice:a:b:c")).unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "a:b:c");
    }

    #[test]
    fn empty_password_is_allowed() {
        let creds = parse_basic(&header("alice:")).unwrap();
        assert_eq!(creds.password(), "");
    }

    #[test]
    fn empty_username_is_rejected() {
        assert_eq!(
            parse_basic(&header(":pw")),
            Err(AuthError::MalformedCredentials)
        );
        assert_eq!(parse_basic(&header(":")), Err(AuthError::MalformedCredentials));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let value = format!("basic {}", STANDARD.encode("bob:pw"));
        assert_eq!(parse_basic(&value).unwrap().username(), "bob");
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert_eq!(
            parse_basic("Bearer abc.def.ghi"),
            Err(AuthError::InvalidAuthHeader)
        );
        assert_eq!(parse_basic("Basic"), Err(AuthError::InvalidAuthHeader));
    }

    #[test]
    fn undecodable_payloads_are_rejected() {
        assert_eq!(
            parse_basic("Basic !!!not-base64!!!"),
            Err(AuthError::MalformedCredentials)
        );
        assert_eq!(
            parse_basic(&header("no-colon-here")),
            Err(AuthError::MalformedCredentials)
        );
        let invalid_utf8 = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
        assert_eq!(parse_basic(&invalid_utf8), Err(AuthError::MalformedCredentials));
    }
}
