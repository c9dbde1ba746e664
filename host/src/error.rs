//! Host-layer error taxonomy.

use std::time::Duration;

use thiserror::Error;

use iisman_core::Protocol;

use crate::listing::ListingError;

/// Errors from invoking the host tool or interpreting its output.
#[derive(Debug, Error)]
pub enum HostError {
    /// The shell executable could not be launched at all.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Waiting on the child process failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The command did not finish within the configured timeout.
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    /// The command ran but exited non-zero.
    #[error("command failed with exit code {code:?}: {output}")]
    CommandFailed { code: Option<i32>, output: String },
    /// The site listing could not be parsed at all.
    #[error(transparent)]
    Listing(#[from] ListingError),
    /// No site with the requested name exists.
    #[error("website not found: {0}")]
    SiteNotFound(String),
    /// A binding with the same protocol, host, and port already exists.
    #[error("binding already exists for {protocol}://{host}:{port}")]
    BindingExists {
        protocol: Protocol,
        host: String,
        port: u32,
    },
    /// An argument would break out of its quoted PowerShell string.
    #[error("unsafe script argument {argument:?}: contains {forbidden:?}")]
    UnsafeArgument { argument: String, forbidden: char },
    /// A directory request tried to escape the site root.
    #[error("directory path escapes the site root: {0}")]
    PathTraversal(String),
    /// The directory listing JSON could not be decoded.
    #[error("failed to decode directory listing: {0}")]
    DirectoryDecode(#[from] serde_json::Error),
}
