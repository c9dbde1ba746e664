//! Binding descriptor mini-grammar.
//!
//! One column of the site listing packs the whole binding into a short
//! string: `protocol *:port[:host][ sslFlags=N]`. Downstream consumers
//! depend on the exact decoding rules, so the grammar is bit-for-bit the
//! one the original service used: the host may be absent (normalized to
//! `localhost`) and the SSL flag is true only for the literal value `1`.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use iisman_core::{Binding, Protocol};

static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?|tcp|udp)\s+\*:(\d+)(?::([\w\.-]*))?(?:\s+sslFlags=(\d+))?$")
        .expect("static regex must compile")
});

/// Binding text that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid binding: {0}")]
pub struct BindingError(pub String);

/// Decodes one binding descriptor string.
///
/// # Examples
///
/// ```
/// use iisman_host::listing::parse_binding;
/// use iisman_core::Protocol;
///
/// let binding = parse_binding("http *:80").unwrap();
/// assert_eq!(binding.protocol, Protocol::Http);
/// assert_eq!(binding.host, "localhost");
/// assert!(!binding.ssl);
/// ```
pub fn parse_binding(text: &str) -> Result<Binding, BindingError> {
    let captures = BINDING_RE
        .captures(text)
        .ok_or_else(|| BindingError(text.to_string()))?;

    // The alternation admits only the four supported schemes, so this
    // parse cannot fail; the port can, on absurdly long digit strings.
    let protocol = captures[1]
        .parse::<Protocol>()
        .map_err(|_| BindingError(text.to_string()))?;
    let port = captures[2]
        .parse::<u32>()
        .map_err(|_| BindingError(text.to_string()))?;

    let host = match captures.get(3) {
        Some(capture) if !capture.as_str().is_empty() => capture.as_str().to_string(),
        _ => "localhost".to_string(),
    };
    let ssl = captures.get(4).is_some_and(|flag| flag.as_str() == "1");

    Ok(Binding {
        protocol,
        port,
        host,
        ssl,
    })
}
