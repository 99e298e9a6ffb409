//! Driver facade over the live browser session.
//!
//! Every operation in this crate reaches the browser through the abstract
//! [`Driver`] trait, one synchronous round-trip per call:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Driver (abstract trait)                                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐  ┌──────────────────┐                 │
//! │  │  WebDriver HTTP  │  │  MockDriver      │                 │
//! │  │  client (host)   │  │  (in-process)    │                 │
//! │  └──────────────────┘  └──────────────────┘                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The trait is object-safe and blocking. The browser session behind it is a
//! single-writer resource; callers serialize access. Element handles are never
//! cached across operations because page DOM state may change between calls.

use crate::matcher::OptionQuery;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Capability flag advertised by sessions that cannot script native
/// multi-value selection (geckodriver).
pub const MARIONETTE_FLAG: &str = "marionette=true";

/// Result type for driver round-trips
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors surfaced by the browser driver
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// Element query failed
    #[error("Element query failed: {message}")]
    Query {
        /// Error message from the driver
        message: String,
    },

    /// Script execution failed
    #[error("Script execution failed: {message}")]
    Script {
        /// Error message from the driver
        message: String,
    },

    /// The element reference is no longer attached to the DOM
    #[error("Stale element reference: {id}")]
    StaleElement {
        /// Handle id of the stale element
        id: String,
    },

    /// Session-level failure
    #[error("Session error: {message}")]
    Session {
        /// Error message from the driver
        message: String,
    },
}

/// Handle to a live DOM element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned identifier for the element
    pub id: String,
    /// Element tag name, lowercase
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }

    /// Whether the handle points at a `<select>` element
    #[must_use]
    pub fn is_select(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("select")
    }
}

/// Argument passed to an injected script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScriptArg {
    /// A DOM element reference
    Element(ElementHandle),
    /// A plain string value
    Text(String),
}

impl ScriptArg {
    /// Wrap an element handle
    #[must_use]
    pub fn element(handle: &ElementHandle) -> Self {
        Self::Element(handle.clone())
    }

    /// Wrap a string value
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Capability flags of the current browser session.
///
/// Only consulted once per session, to pick the selection strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCapabilities {
    flags: BTreeSet<String>,
}

impl SessionCapabilities {
    /// Build from an iterator of capability flag strings
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// Capabilities of a standard session with native selection support
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Capabilities of a marionette (Firefox) session
    #[must_use]
    pub fn marionette() -> Self {
        Self::new([MARIONETTE_FLAG])
    }

    /// Check whether a capability flag is present
    #[must_use]
    pub fn has(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Whether the session supports the native selection primitive
    #[must_use]
    pub fn native_selection(&self) -> bool {
        !self.has(MARIONETTE_FLAG)
    }
}

/// Abstract browser driver.
///
/// One implementation speaks to a real WebDriver session; [`crate::mock`]
/// provides an in-process double. All calls block until the browser round-trip
/// completes.
pub trait Driver {
    /// Find all elements matching a locator. An empty result is not an error.
    fn find_elements(&self, locator: &str) -> DriverResult<Vec<ElementHandle>>;

    /// Find `<option>` descendants of `scope` matching a query, in DOM order.
    ///
    /// WebDriver-backed implementations evaluate
    /// [`OptionQuery::to_xpath`] relative to `scope`.
    fn find_options(
        &self,
        scope: &ElementHandle,
        query: &OptionQuery,
    ) -> DriverResult<Vec<ElementHandle>>;

    /// Execute a script in the page, with element and string arguments bound
    /// to `arguments[n]`.
    fn execute_script(&self, code: &str, args: &[ScriptArg]) -> DriverResult<serde_json::Value>;

    /// Visible text of an element
    fn element_text(&self, element: &ElementHandle) -> DriverResult<String>;

    /// Attribute value of an element, `None` when the attribute is absent
    fn element_attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> DriverResult<Option<String>>;

    /// Whether an option element is currently selected
    fn element_is_selected(&self, element: &ElementHandle) -> DriverResult<bool>;

    /// Click an element, firing the browser's native events
    fn click(&self, element: &ElementHandle) -> DriverResult<()>;

    /// Capability flags of the session
    fn capabilities(&self) -> SessionCapabilities;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod capability_tests {
        use super::*;

        #[test]
        fn test_standard_session_has_native_selection() {
            let caps = SessionCapabilities::standard();
            assert!(caps.native_selection());
        }

        #[test]
        fn test_marionette_session_lacks_native_selection() {
            let caps = SessionCapabilities::marionette();
            assert!(!caps.native_selection());
            assert!(caps.has(MARIONETTE_FLAG));
        }

        #[test]
        fn test_flags_from_iterator() {
            let caps = SessionCapabilities::new(["acceptInsecureCerts=true", MARIONETTE_FLAG]);
            assert!(caps.has("acceptInsecureCerts=true"));
            assert!(!caps.native_selection());
        }

        #[test]
        fn test_unrelated_flags_keep_native_selection() {
            let caps = SessionCapabilities::new(["marionette=false"]);
            assert!(caps.native_selection());
        }
    }

    mod handle_tests {
        use super::*;

        #[test]
        fn test_is_select() {
            assert!(ElementHandle::new("e1", "select").is_select());
            assert!(ElementHandle::new("e1", "SELECT").is_select());
            assert!(!ElementHandle::new("e2", "option").is_select());
        }

        #[test]
        fn test_handle_serde_round_trip() {
            let handle = ElementHandle::new("e7", "option");
            let json = serde_json::to_string(&handle).unwrap();
            let back: ElementHandle = serde_json::from_str(&json).unwrap();
            assert_eq!(handle, back);
        }
    }
}
