//! Escoger: select-list keyword engine for WebDriver-style automation.
//!
//! Escoger (Spanish: "to choose") resolves user-supplied option tokens
//! against live `<select>` elements through an abstract browser driver and
//! exposes the resulting operations as host-dispatchable keywords.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     ESCOGER Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌─────────────┐   ┌───────────────────────┐    │
//! │  │ Keyword    │   │ Controller  │   │ Matcher + Strategy    │    │
//! │  │ dispatch   │──►│ / View      │──►│ (resolve + apply)     │    │
//! │  └────────────┘   └─────────────┘   └───────────┬───────────┘    │
//! │                                                 ▼                │
//! │                                     ┌───────────────────────┐    │
//! │                                     │ Driver (trait)        │    │
//! │                                     │ WebDriver session /   │    │
//! │                                     │ MockDriver            │    │
//! │                                     └───────────────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tokens resolve value-first, visible-text second, with a substring fallback
//! for backends that fail exact-text queries. Selection is applied natively
//! (clicks) or through injected scripts, chosen once per session from the
//! capability flags. Single-select lists tolerate mid-list misses with a
//! warning; multi-select lists fail on any miss.
//!
//! Every operation is a fresh, blocking round-trip sequence against a
//! single-writer browser session. Nothing is cached between keywords.

#![warn(missing_docs)]

mod controller;
mod matcher;
mod result;
mod select_list;
mod strategy;
mod view;

/// Driver facade consumed by the engine
pub mod driver;

/// Host-facing keyword surface
pub mod keywords;

/// In-process driver double for tests
pub mod mock;

pub use controller::SelectionController;
pub use driver::{
    Driver, DriverError, DriverResult, ElementHandle, ScriptArg, SessionCapabilities,
    MARIONETTE_FLAG,
};
pub use keywords::{Keyword, KeywordReturn, SelectLibrary};
pub use matcher::{
    longest_word, normalize_space, xpath_literal, MatchStrategy, OptionMatcher, OptionQuery,
    ResolutionOutcome,
};
pub use result::{EscogerError, EscogerResult};
pub use select_list::SelectList;
pub use strategy::{
    session_strategy, NativeSelection, ScriptedSelection, SelectionStrategy,
    FIRE_ONCHANGE_SCRIPT, SET_ATTRIBUTE_SCRIPT,
};
pub use view::SelectListView;
