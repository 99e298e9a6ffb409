//! Selection orchestration and escalation policy.
//!
//! The controller resolves the target list fresh for every operation, runs
//! per-token resolution through [`OptionMatcher`], applies matches through the
//! session's [`SelectionStrategy`], and escalates misses according to the list
//! mode: any miss is fatal on a multi-select list, while a single-select list
//! warns about misses and fails only when the last token went unmatched.
//! Selections applied before a later token fails stay applied.

use crate::driver::{Driver, ElementHandle};
use crate::matcher::{OptionMatcher, ResolutionOutcome};
use crate::result::{EscogerError, EscogerResult};
use crate::select_list::SelectList;
use crate::strategy::SelectionStrategy;
use tracing::{debug, info, warn};

fn describe_items(tokens: &[String]) -> String {
    if tokens.is_empty() {
        "all options".to_string()
    } else {
        format!("option(s) [ {} ]", tokens.join(" | "))
    }
}

/// Applies select and unselect operations against one driver session.
pub struct SelectionController<'a> {
    driver: &'a dyn Driver,
    strategy: &'a dyn SelectionStrategy,
}

impl std::fmt::Debug for SelectionController<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

impl<'a> SelectionController<'a> {
    /// Create a controller over a driver and the session's strategy
    #[must_use]
    pub fn new(driver: &'a dyn Driver, strategy: &'a dyn SelectionStrategy) -> Self {
        Self { driver, strategy }
    }

    /// Select every option of a multi-select list.
    ///
    /// # Errors
    ///
    /// [`EscogerError::NotMultiselect`] on a single-select list.
    pub fn select_all(&self, locator: &str) -> EscogerResult<()> {
        info!("Selecting all options from list '{locator}'.");
        let list = SelectList::resolve(self.driver, locator)?;
        if !list.is_multiple() {
            return Err(EscogerError::NotMultiselect {
                operation: "Select All From List".to_string(),
            });
        }
        self.apply_to_every_option(&list, true)
    }

    /// Select the given tokens, resolving each by value first, visible text
    /// second. An empty token list selects every option regardless of mode.
    pub fn select(&self, locator: &str, tokens: &[String]) -> EscogerResult<()> {
        info!(
            "Selecting {} from list '{locator}'.",
            describe_items(tokens)
        );
        let list = SelectList::resolve(self.driver, locator)?;
        if tokens.is_empty() {
            return self.apply_to_every_option(&list, true);
        }

        let outcomes = self.resolve_and_apply(&list, tokens)?;
        let misses: Vec<String> = outcomes
            .iter()
            .filter(|outcome| !outcome.matched)
            .map(|outcome| outcome.token.clone())
            .collect();
        if misses.is_empty() {
            return Ok(());
        }

        if list.is_multiple() {
            return Err(EscogerError::OptionsNotFound {
                tokens: misses,
                locator: locator.to_string(),
            });
        }

        warn!(
            "Option{} '{}' not found within list '{locator}'.",
            if misses.len() == 1 { "" } else { "s" },
            misses.join(", ")
        );
        match outcomes.last() {
            Some(last) if !last.matched => Err(EscogerError::OptionNotFound {
                token: last.token.clone(),
                locator: locator.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Select options by position. Indexes are parsed before any selection is
    /// attempted; an out-of-range index is fatal.
    pub fn select_by_index(&self, locator: &str, indexes: &[String]) -> EscogerResult<()> {
        if indexes.is_empty() {
            return Err(EscogerError::NoInput { what: "index" });
        }
        let parsed = parse_indexes(indexes)?;
        info!(
            "Selecting index(es) '{}' from list '{locator}'.",
            indexes.join(", ")
        );
        let list = SelectList::resolve(self.driver, locator)?;
        let options = list.options(self.driver)?;
        for index in parsed {
            let option = options.get(index).ok_or_else(|| EscogerError::OptionNotFound {
                token: index.to_string(),
                locator: locator.to_string(),
            })?;
            self.strategy.apply(self.driver, option, true)?;
        }
        Ok(())
    }

    /// Select options by exact `value` attribute. Any miss is fatal.
    pub fn select_by_value(&self, locator: &str, values: &[String]) -> EscogerResult<()> {
        if values.is_empty() {
            return Err(EscogerError::NoInput { what: "value" });
        }
        info!(
            "Selecting value(s) '{}' from list '{locator}'.",
            values.join(", ")
        );
        let list = SelectList::resolve(self.driver, locator)?;
        let matcher = OptionMatcher::new(self.driver);
        for value in values {
            let matched = matcher.by_value(&list, value)?;
            if matched.is_empty() {
                return Err(EscogerError::OptionNotFound {
                    token: value.clone(),
                    locator: locator.to_string(),
                });
            }
            self.apply_to_matches(&list, &matched, true)?;
        }
        Ok(())
    }

    /// Select options by visible text. Any miss is fatal.
    pub fn select_by_label(&self, locator: &str, labels: &[String]) -> EscogerResult<()> {
        if labels.is_empty() {
            return Err(EscogerError::NoInput { what: "label" });
        }
        info!(
            "Selecting label(s) '{}' from list '{locator}'.",
            labels.join(", ")
        );
        let list = SelectList::resolve(self.driver, locator)?;
        let matcher = OptionMatcher::new(self.driver);
        for label in labels {
            let (matched, _) = matcher.by_text(&list, label)?;
            if matched.is_empty() {
                return Err(EscogerError::OptionNotFound {
                    token: label.clone(),
                    locator: locator.to_string(),
                });
            }
            self.apply_to_matches(&list, &matched, true)?;
        }
        Ok(())
    }

    /// Deselect the given tokens by value then by visible text. An empty
    /// token list deselects everything. Misses are silently ignored;
    /// deselection is advisory.
    ///
    /// # Errors
    ///
    /// [`EscogerError::NotMultiselect`] on a single-select list.
    pub fn unselect(&self, locator: &str, tokens: &[String]) -> EscogerResult<()> {
        info!(
            "Unselecting {} from list '{locator}'.",
            describe_items(tokens)
        );
        let list = self.multiselect_list(locator, "Unselect From List")?;
        if tokens.is_empty() {
            return self.apply_to_every_option(&list, false);
        }
        let matcher = OptionMatcher::new(self.driver);
        for token in tokens {
            let by_value = matcher.by_value(&list, token)?;
            self.apply_to_matches(&list, &by_value, false)?;
            let (by_text, _) = matcher.by_text(&list, token)?;
            self.apply_to_matches(&list, &by_text, false)?;
        }
        Ok(())
    }

    /// Deselect options by position. Out-of-range indexes are ignored.
    pub fn unselect_by_index(&self, locator: &str, indexes: &[String]) -> EscogerResult<()> {
        if indexes.is_empty() {
            return Err(EscogerError::NoInput { what: "index" });
        }
        let parsed = parse_indexes(indexes)?;
        info!(
            "Unselecting index(es) '{}' from list '{locator}'.",
            indexes.join(", ")
        );
        let list = self.multiselect_list(locator, "Unselect From List By Index")?;
        let options = list.options(self.driver)?;
        for index in parsed {
            if let Some(option) = options.get(index) {
                self.strategy.apply(self.driver, option, false)?;
            }
        }
        Ok(())
    }

    /// Deselect options by exact `value` attribute. Misses are ignored.
    pub fn unselect_by_value(&self, locator: &str, values: &[String]) -> EscogerResult<()> {
        if values.is_empty() {
            return Err(EscogerError::NoInput { what: "value" });
        }
        info!(
            "Unselecting value(s) '{}' from list '{locator}'.",
            values.join(", ")
        );
        let list = self.multiselect_list(locator, "Unselect From List By Value")?;
        let matcher = OptionMatcher::new(self.driver);
        for value in values {
            let matched = matcher.by_value(&list, value)?;
            self.apply_to_matches(&list, &matched, false)?;
        }
        Ok(())
    }

    /// Deselect options by visible text. Misses are ignored.
    pub fn unselect_by_label(&self, locator: &str, labels: &[String]) -> EscogerResult<()> {
        if labels.is_empty() {
            return Err(EscogerError::NoInput { what: "label" });
        }
        info!(
            "Unselecting label(s) '{}' from list '{locator}'.",
            labels.join(", ")
        );
        let list = self.multiselect_list(locator, "Unselect From List By Label")?;
        let matcher = OptionMatcher::new(self.driver);
        for label in labels {
            let (matched, _) = matcher.by_text(&list, label)?;
            self.apply_to_matches(&list, &matched, false)?;
        }
        Ok(())
    }

    fn multiselect_list(&self, locator: &str, operation: &str) -> EscogerResult<SelectList> {
        let list = SelectList::resolve(self.driver, locator)?;
        if !list.is_multiple() {
            return Err(EscogerError::NotMultiselect {
                operation: operation.to_string(),
            });
        }
        Ok(list)
    }

    /// Resolve every token in order and apply each match, recording exactly
    /// one outcome per token.
    fn resolve_and_apply(
        &self,
        list: &SelectList,
        tokens: &[String],
    ) -> EscogerResult<Vec<ResolutionOutcome>> {
        let matcher = OptionMatcher::new(self.driver);
        let mut outcomes = Vec::with_capacity(tokens.len());
        for token in tokens {
            let (matched, strategy) = matcher.resolve(list, token)?;
            let found = !matched.is_empty();
            self.apply_to_matches(list, &matched, true)?;
            debug!(token = %token, matched = found, strategy = ?strategy, "resolved token");
            outcomes.push(ResolutionOutcome {
                token: token.clone(),
                matched: found,
                strategy: found.then_some(strategy),
            });
        }
        Ok(outcomes)
    }

    /// Apply a state to matched options. A single-select list takes the first
    /// match only; native single-select semantics forbid more.
    fn apply_to_matches(
        &self,
        list: &SelectList,
        options: &[ElementHandle],
        selected: bool,
    ) -> EscogerResult<()> {
        for option in options {
            self.strategy.apply(self.driver, option, selected)?;
            if !list.is_multiple() {
                break;
            }
        }
        Ok(())
    }

    fn apply_to_every_option(&self, list: &SelectList, selected: bool) -> EscogerResult<()> {
        for option in list.options(self.driver)? {
            self.strategy.apply(self.driver, &option, selected)?;
        }
        Ok(())
    }
}

fn parse_indexes(indexes: &[String]) -> EscogerResult<Vec<usize>> {
    indexes
        .iter()
        .map(|raw| {
            raw.parse::<usize>().map_err(|_| EscogerError::InvalidIndex {
                raw: raw.clone(),
            })
        })
        .collect()
}
