//! PowerShell-backed IIS host control.
//!
//! This crate is the bridge between the REST surface and the Windows host
//! tool. It has two halves:
//!
//! - [`listing`] — the console listing parser: fixed-width column
//!   detection over the dash separator row, plus the binding descriptor
//!   mini-grammar. Pure, synchronous, no I/O.
//! - [`powershell`] / [`actions`] / [`machine`] — the impure half:
//!   spawning `powershell.exe` with a bounded wait, assembling
//!   WebAdministration scripts for site CRUD/lifecycle/log/directory
//!   operations, and snapshotting machine telemetry.
//!
//! # Example
//!
//! ```
//! use iisman_host::listing::parse_listing;
//!
//! let raw = "\
//! Name  ID  State    Physical Path       Bindings
//! ----  --  -----    -------------       --------
//! blog  1   Started  C:\\inetpub\\blog     http *:80:
//! ";
//! let listing = parse_listing(raw).unwrap();
//! assert_eq!(listing.sites[0].name, "blog");
//! assert_eq!(listing.sites[0].binding.host, "localhost");
//! ```

pub mod actions;
pub mod error;
pub mod listing;
pub mod machine;
pub mod powershell;

pub use actions::HostController;
pub use error::HostError;
pub use powershell::{DEFAULT_COMMAND_TIMEOUT, PowerShell};
