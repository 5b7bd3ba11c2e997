/// Authorization Header Parsing
///
/// Pulls `<scheme> <token>` out of the `Authorization` header. The token
/// portion is returned verbatim; it is not decoded or re-trimmed.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use std::fmt;

use crate::error::HeaderError;

/// Credential schemes this service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Bearer,
    ApiKey,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Bearer => "Bearer",
            Scheme::ApiKey => "ApiKey",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the token for `scheme` from request headers
///
/// The header value is trimmed and split on single spaces; exactly two fields
/// must come out. Scheme comparison is case-sensitive.
///
/// # Errors
/// - `MissingHeader` when there are no headers, no `Authorization` entry, or an empty value
/// - `Malformed` when the value does not split into exactly two fields
/// - `SchemeMismatch` when the first field is not `scheme`
pub fn extract(scheme: Scheme, headers: Option<&HeaderMap>) -> Result<String, HeaderError> {
    let value = headers
        .and_then(|h| h.get(AUTHORIZATION))
        .ok_or(HeaderError::MissingHeader)?;
    if value.is_empty() {
        return Err(HeaderError::MissingHeader);
    }
    let value = value.to_str().map_err(|_| HeaderError::Malformed)?;

    let fields: Vec<&str> = value.trim().split(' ').collect();
    if fields.len() != 2 {
        return Err(HeaderError::Malformed);
    }
    if fields[0] != scheme.as_str() {
        return Err(HeaderError::SchemeMismatch {
            expected: scheme.as_str(),
        });
    }

    Ok(fields[1].to_string())
}

/// `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<String, HeaderError> {
    extract(Scheme::Bearer, Some(headers))
}

/// `Authorization: ApiKey <key>`
pub fn api_key(headers: &HeaderMap) -> Result<String, HeaderError> {
    extract(Scheme::ApiKey, Some(headers))
}
