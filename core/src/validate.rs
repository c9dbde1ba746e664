//! Request validation.
//!
//! Structural checks on incoming [`WebsiteRequest`] bodies before any
//! PowerShell command is assembled from them. Business rules such as port
//! conflict detection are not handled here; the host layer probes the live
//! configuration for those.

use thiserror::Error;

use crate::WebsiteRequest;

/// Characters that must never reach a double-quoted PowerShell string.
///
/// Site names and host headers are interpolated into `-Command` scripts, so
/// anything that could terminate the quote or trigger expansion is refused
/// outright rather than escaped.
const FORBIDDEN_SCRIPT_CHARS: &[char] = &['"', '`', '$', ';', '&', '|', '<', '>', '\n', '\r'];

/// Request validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Website name is empty or whitespace-only.
    #[error("website name cannot be empty")]
    EmptyName,
    /// Website name contains a character that cannot be quoted safely.
    #[error("website name contains forbidden character {0:?}")]
    UnsafeName(char),
    /// Host header contains a character that cannot be quoted safely.
    #[error("host contains forbidden character {0:?}")]
    UnsafeHost(char),
    /// Port 0 can never be bound.
    #[error("port cannot be zero")]
    ZeroPort,
}

/// Returns the first character of `value` that is unsafe to interpolate
/// into a PowerShell script, if any.
pub fn unsafe_script_char(value: &str) -> Option<char> {
    value
        .chars()
        .find(|ch| FORBIDDEN_SCRIPT_CHARS.contains(ch))
}

/// Validates a create/update request.
///
/// Returns every problem found rather than stopping at the first, so the
/// API can report them all in one response.
///
/// # Examples
///
/// ```
/// use iisman_core::{Protocol, WebsiteRequest, validate_request};
///
/// let request = WebsiteRequest {
///     name: "blog".to_string(),
///     protocol: Protocol::Http,
///     host_or_domain: "blog.corp.local".to_string(),
///     port: 8080,
/// };
/// assert!(validate_request(&request).is_empty());
/// ```
pub fn validate_request(request: &WebsiteRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    } else if let Some(ch) = unsafe_script_char(&request.name) {
        errors.push(ValidationError::UnsafeName(ch));
    }

    if let Some(ch) = unsafe_script_char(&request.host_or_domain) {
        errors.push(ValidationError::UnsafeHost(ch));
    }

    if request.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    errors
}
