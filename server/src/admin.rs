//! Startup privilege gate.
//!
//! Site management needs an elevated token; refusing to start beats
//! failing on the first `New-Website` call with an opaque access error.

use iisman_host::{HostError, PowerShell};

const ELEVATION_PROBE: &str = "([Security.Principal.WindowsPrincipal][Security.Principal.WindowsIdentity]::GetCurrent()).IsInRole([Security.Principal.WindowsBuiltInRole]::Administrator)";

/// Checks whether the current process holds administrator rights.
///
/// Only meaningful on Windows; elsewhere the service runs in development
/// against a substitute shell and the gate is a no-op.
pub fn is_elevated(shell: &PowerShell) -> Result<bool, HostError> {
    if !cfg!(windows) {
        return Ok(true);
    }
    let output = shell.run_checked(ELEVATION_PROBE)?;
    Ok(output.stdout.trim().eq_ignore_ascii_case("true"))
}
