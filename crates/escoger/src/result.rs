//! Result and error types for Escoger.

use crate::driver::DriverError;
use thiserror::Error;

/// Result type for select-list operations
pub type EscogerResult<T> = Result<T, EscogerError>;

/// Errors that can occur while operating on a select list
#[derive(Debug, Error)]
pub enum EscogerError {
    /// Locator did not resolve to any select element
    #[error("Select list with locator '{locator}' not found")]
    LocatorNotFound {
        /// Locator that failed to resolve
        locator: String,
    },

    /// A multi-select-only operation was invoked on a single-select list
    #[error("Keyword '{operation}' works only for multiselect lists")]
    NotMultiselect {
        /// Name of the offending operation
        operation: String,
    },

    /// An operation requiring at least one token received none
    #[error("No {what} given")]
    NoInput {
        /// Kind of input that was missing ("index", "value" or "label")
        what: &'static str,
    },

    /// A single requested option could not be resolved
    #[error("Option '{token}' not in list '{locator}'")]
    OptionNotFound {
        /// The token that failed to resolve
        token: String,
        /// Locator of the select list
        locator: String,
    },

    /// Several requested options could not be resolved
    #[error("Options '{}' not in list '{}'", .tokens.join(", "), .locator)]
    OptionsNotFound {
        /// All tokens that failed to resolve, in input order
        tokens: Vec<String>,
        /// Locator of the select list
        locator: String,
    },

    /// Selection verification failed
    #[error(
        "List '{}' should have had selection [ {} ] but it was [ {} ]",
        .locator,
        .expected.join(" | "),
        .actual.join(" | ")
    )]
    SelectionMismatch {
        /// Locator of the select list
        locator: String,
        /// Expected tokens
        expected: Vec<String>,
        /// Actual selected labels
        actual: Vec<String>,
    },

    /// A list expected to have no selection had one
    #[error(
        "List '{}' should have had no selection (selection was [ {} ])",
        .locator,
        .selected.join(" | ")
    )]
    UnexpectedSelection {
        /// Locator of the select list
        locator: String,
        /// Labels of the selected options
        selected: Vec<String>,
    },

    /// A read operation found no selected options
    #[error("Select list with locator '{locator}' does not have any selected values")]
    NoSelection {
        /// Locator of the select list
        locator: String,
    },

    /// An index token did not parse as a non-negative integer
    #[error("Cannot parse index '{raw}' as a non-negative integer")]
    InvalidIndex {
        /// The raw index token
        raw: String,
    },

    /// A keyword name could not be resolved to an operation
    #[error("No keyword with name '{name}' found")]
    UnknownKeyword {
        /// The unresolved keyword name
        name: String,
    },

    /// Browser driver round-trip failed
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}
