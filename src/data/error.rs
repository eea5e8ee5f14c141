//! Error types raised by record repositories.

use thiserror::Error;

/// Faults surfaced by record repository implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("sub-row {index} is past the end of group {group} in sheet {sheet}")]
    SubrowOutOfRange {
        sheet: &'static str,
        group: u32,
        index: u32,
    },
}
