//! Option resolution: one user token to zero or more `<option>` elements.
//!
//! Tokens are ambiguous between an option's `value` attribute and its visible
//! text. Value matching is a single exact query. Text matching is two-phase:
//! an exact normalized-text query first, then, for tokens containing a space,
//! a substring query narrowed by the longest whitespace-delimited word and
//! re-filtered by exact normalized-text equality. The second phase exists
//! because some backends fail exact-match queries for strings with certain
//! characters but answer substring queries correctly; the post-filter keeps
//! the substring narrowing from producing false positives.
//!
//! An empty match is not an error at this layer. Callers decide escalation.

use crate::driver::{Driver, ElementHandle};
use crate::result::EscogerResult;
use crate::select_list::SelectList;

/// Which resolution strategy produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Exact `value` attribute equality
    Value,
    /// Exact normalized visible-text equality
    Text,
    /// Substring narrowing with exact-text post-filter
    TextSubstring,
}

/// Per-token resolution record, produced in input order
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    /// The token as supplied
    pub token: String,
    /// Whether any option matched
    pub matched: bool,
    /// Strategy that produced the match, `None` when unmatched
    pub strategy: Option<MatchStrategy>,
}

/// Descendant `<option>` query, evaluated relative to a `<select>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionQuery {
    /// Options whose `value` attribute equals the string exactly
    ByValue(String),
    /// Options whose whitespace-normalized text equals the string exactly
    ByExactText(String),
    /// Options whose text contains the string
    TextContains(String),
    /// Every option under the scope
    All,
}

impl OptionQuery {
    /// Render the query as an XPath expression relative to the scope element.
    ///
    /// String operands go through [`xpath_literal`], so tokens containing
    /// quotes cannot break out of the expression.
    #[must_use]
    pub fn to_xpath(&self) -> String {
        match self {
            Self::ByValue(value) => {
                format!(".//option[@value = {}]", xpath_literal(value))
            }
            Self::ByExactText(text) => {
                format!(".//option[normalize-space(.) = {}]", xpath_literal(text))
            }
            Self::TextContains(text) => {
                format!(".//option[contains(., {})]", xpath_literal(text))
            }
            Self::All => ".//option".to_string(),
        }
    }
}

/// Encode a string as an XPath literal.
///
/// Strings without single quotes use single-quoted form, strings without
/// double quotes use double-quoted form, and strings containing both are
/// assembled with `concat()`.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let mut parts = Vec::new();
    for (i, piece) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !piece.is_empty() {
            parts.push(format!("'{piece}'"));
        }
    }
    format!("concat({})", parts.join(", "))
}

/// Collapse runs of whitespace to single spaces and trim, the way XPath
/// `normalize-space()` and rendered-text comparison do.
#[must_use]
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Longest whitespace-delimited word in `text`, ties broken by first
/// occurrence. Empty when `text` is empty or all whitespace.
#[must_use]
pub fn longest_word(text: &str) -> &str {
    text.split_whitespace()
        .fold("", |best, word| if word.len() > best.len() { word } else { best })
}

/// Resolves tokens against the options of one select list.
pub struct OptionMatcher<'a> {
    driver: &'a dyn Driver,
}

impl std::fmt::Debug for OptionMatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionMatcher").finish_non_exhaustive()
    }
}

impl<'a> OptionMatcher<'a> {
    /// Create a matcher over the given driver
    #[must_use]
    pub fn new(driver: &'a dyn Driver) -> Self {
        Self { driver }
    }

    /// Options whose `value` attribute equals `token`
    pub fn by_value(
        &self,
        list: &SelectList,
        token: &str,
    ) -> EscogerResult<Vec<ElementHandle>> {
        let query = OptionQuery::ByValue(token.to_string());
        Ok(self.driver.find_options(list.element(), &query)?)
    }

    /// Options whose visible text matches `token`, with the substring
    /// fallback for whitespace-containing tokens.
    pub fn by_text(
        &self,
        list: &SelectList,
        token: &str,
    ) -> EscogerResult<(Vec<ElementHandle>, MatchStrategy)> {
        let exact = self
            .driver
            .find_options(list.element(), &OptionQuery::ByExactText(token.to_string()))?;
        if !exact.is_empty() || !token.contains(' ') {
            return Ok((exact, MatchStrategy::Text));
        }

        let word = longest_word(token);
        let candidate_query = if word.is_empty() {
            // Token is all whitespace; no word to narrow by.
            OptionQuery::All
        } else {
            OptionQuery::TextContains(word.to_string())
        };
        let candidates = self.driver.find_options(list.element(), &candidate_query)?;

        let mut matched = Vec::new();
        for option in candidates {
            if normalize_space(&self.driver.element_text(&option)?) == token {
                matched.push(option);
            }
        }
        Ok((matched, MatchStrategy::TextSubstring))
    }

    /// Resolve a token value-first, text-second.
    pub fn resolve(
        &self,
        list: &SelectList,
        token: &str,
    ) -> EscogerResult<(Vec<ElementHandle>, MatchStrategy)> {
        let by_value = self.by_value(list, token)?;
        if !by_value.is_empty() {
            return Ok((by_value, MatchStrategy::Value));
        }
        self.by_text(list, token)
    }
}
