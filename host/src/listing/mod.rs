//! Console listing parser.
//!
//! Turns the fixed-width `Get-Website` console table into structured
//! [`Website`] records. The pipeline has two stages: column boundaries are
//! detected once on the dash separator row ([`columns`]), then every data
//! row is sliced into five fields and its binding column is decoded through
//! the mini-grammar in [`binding`].
//!
//! Failure policy: a malformed binding drops only its own row (with a
//! diagnostic), an unparsable numeric id keeps the row with id 0 (also with
//! a diagnostic), while a listing missing its header or separator row fails
//! the whole parse.

pub mod binding;
pub mod columns;

use thiserror::Error;
use tracing::warn;

use iisman_core::Website;

pub use binding::{BindingError, parse_binding};
pub use columns::{column_boundaries, extract_columns, normalize_lines};

/// The separator row is the second non-blank line; everything after it is
/// data. Line 0 is the column-name header and is ignored content-wise.
const SEPARATOR_INDEX: usize = 1;

/// Name, id, state, physical path, binding descriptor.
const EXPECTED_COLUMNS: usize = 5;

/// Structural listing failures that abort the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    /// Fewer than two non-blank lines: the dash separator row (and with it
    /// the column layout) is missing.
    #[error("listing has no column separator row")]
    MissingSeparator,
    /// The separator row does not describe the five expected columns.
    #[error("expected {expected} columns in the separator row, found {found}")]
    ColumnCount { expected: usize, found: usize },
}

/// Result of one listing parse: the records that survived plus the
/// diagnostics collected for rows that were skipped or repaired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedListing {
    pub sites: Vec<Website>,
    pub warnings: Vec<String>,
}

/// Parses a raw console listing into ordered [`Website`] records.
///
/// Empty input (no non-blank lines) is a valid empty listing. A single
/// non-blank line means the separator row is missing and the parse fails
/// instead of indexing past the end of the input.
pub fn parse_listing(raw: &str) -> Result<ParsedListing, ListingError> {
    let lines = normalize_lines(raw);
    if lines.is_empty() {
        return Ok(ParsedListing::default());
    }
    let Some(separator) = lines.get(SEPARATOR_INDEX) else {
        return Err(ListingError::MissingSeparator);
    };

    let boundaries = column_boundaries(separator);
    if boundaries.len() != EXPECTED_COLUMNS {
        return Err(ListingError::ColumnCount {
            expected: EXPECTED_COLUMNS,
            found: boundaries.len(),
        });
    }

    let mut listing = ParsedListing::default();
    for (row, line) in lines.iter().enumerate().skip(SEPARATOR_INDEX + 1) {
        let fields = extract_columns(line, &boundaries);

        // Legacy behavior, surfaced: an unparsable id keeps the row with
        // id 0 instead of dropping data.
        let id = match fields[1].parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                listing.warnings.push(format!(
                    "row {row}: unparsable site id {:?}, defaulting to 0",
                    fields[1]
                ));
                warn!(row, id = fields[1], "Unparsable site id, defaulting to 0");
                0
            }
        };

        let binding = match parse_binding(fields[4]) {
            Ok(binding) => binding,
            Err(error) => {
                listing
                    .warnings
                    .push(format!("row {row}: {error}, row skipped"));
                warn!(row, %error, "Skipping listing row with malformed binding");
                continue;
            }
        };

        listing.sites.push(Website {
            name: fields[0].to_string(),
            id,
            state: fields[2].to_string(),
            physical_path: fields[3].to_string(),
            binding,
        });
    }

    Ok(listing)
}
