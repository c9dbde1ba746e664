//! Core wire-contract types for the IIS host management API.
//!
//! This crate defines the value types exchanged between the REST surface,
//! the PowerShell-backed host layer, and the admin frontend:
//!
//! - [`Website`] / [`Binding`] — one site as reported by the host listing,
//!   with its decoded binding descriptor.
//! - [`WebsiteRequest`] — create/update request body.
//! - [`WebsiteAction`] — Start/Stop/Restart lifecycle tokens.
//! - [`MachineState`] / [`DirEntry`] — telemetry and directory listing
//!   shapes.
//!
//! Request validation ([`validate_request`]) catches structural problems
//! (empty names, characters that cannot be quoted into a PowerShell
//! script, port zero) before any command is assembled.
//!
//! # Example
//!
//! ```
//! use iisman_core::*;
//!
//! let request = WebsiteRequest {
//!     name: "blog".to_string(),
//!     protocol: Protocol::Https,
//!     host_or_domain: "blog.corp.local".to_string(),
//!     port: 443,
//! };
//! assert!(validate_request(&request).is_empty());
//! assert_eq!(request.protocol.as_str(), "https");
//! ```

mod types;
mod validate;

pub use types::*;
pub use validate::{ValidationError, unsafe_script_char, validate_request};
