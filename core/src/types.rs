//! Wire-contract type definitions for the IIS host API.
//!
//! Field names and casing here are part of the HTTP contract consumed by the
//! admin frontend, so every rename is deliberate. The most notable quirk is
//! inherited from the original service: a [`Website`] carries exactly one
//! [`Binding`], but it serializes under the plural `bindings` key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol of a site binding.
///
/// Only the four schemes the listing parser accepts. Serialized lowercase
/// (`"http"`, `"https"`, `"tcp"`, `"udp"`).
///
/// # Examples
///
/// ```
/// use iisman_core::Protocol;
///
/// assert_eq!("https".parse::<Protocol>().unwrap(), Protocol::Https);
/// assert!("ftp".parse::<Protocol>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown protocol scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported protocol: {0}")]
pub struct ParseProtocolError(pub String);

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(ParseProtocolError(other.to_string())),
        }
    }
}

/// Lifecycle action on a website.
///
/// The route tokens are capitalized exactly as the original API expects
/// (`Start`, `Stop`, `Restart`); parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebsiteAction {
    Start,
    Stop,
    Restart,
}

impl WebsiteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WebsiteAction::Start => "Start",
            WebsiteAction::Stop => "Stop",
            WebsiteAction::Restart => "Restart",
        }
    }
}

impl fmt::Display for WebsiteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown lifecycle action token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for WebsiteAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Start" => Ok(WebsiteAction::Start),
            "Stop" => Ok(WebsiteAction::Stop),
            "Restart" => Ok(WebsiteAction::Restart),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// A decoded binding descriptor.
///
/// `host` is never empty: an absent host segment in the console listing is
/// normalized to the literal `"localhost"` by the listing parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub protocol: Protocol,
    pub port: u32,
    pub host: String,
    pub ssl: bool,
}

/// One website as reported by the host listing.
///
/// Value type, rebuilt from scratch on every listing request; there is no
/// persistence or identity beyond the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub name: String,
    pub id: i64,
    pub state: String,
    #[serde(rename = "physicalPath")]
    pub physical_path: String,
    // Legacy wire name: the frontend expects the singular binding object
    // under a plural key.
    #[serde(rename = "bindings")]
    pub binding: Binding,
}

/// Create/update request body for a website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRequest {
    pub name: String,
    pub protocol: Protocol,
    pub host_or_domain: String,
    pub port: u32,
}

/// Snapshot of the machine the host runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineState {
    pub os: String,
    pub platform: String,
    pub platform_family: String,
    pub platform_version: String,
    pub kernel_version: String,
    pub kernel_arch: String,
    pub hostname: String,
    pub cpus: usize,
    pub uptime: String,
    pub total_memory: u64,
    pub available_memory: u64,
    pub used_memory: u64,
    pub memory_usage: f64,
}

/// One entry of a site directory listing.
///
/// Serializes camelCase for the API; the `alias` attributes accept the
/// PascalCase keys PowerShell's `ConvertTo-Json` emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirEntry {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Size", default)]
    pub size: u64,
    #[serde(alias = "IsDir", default)]
    pub is_dir: bool,
    #[serde(alias = "ModTime", default)]
    pub mod_time: String,
    #[serde(alias = "Permission", default)]
    pub permission: String,
}
