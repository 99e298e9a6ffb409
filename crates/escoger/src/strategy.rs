//! Selection application strategies.
//!
//! Standard sessions flip an option's state by clicking it, which makes the
//! browser fire the same events a user interaction would. Marionette sessions
//! do not support that primitive for multi-value selection, so selection is
//! applied by mutating the `selected` attribute through an injected script and
//! then invoking the parent `<select>`'s `onchange` handler. The strategy is
//! picked once per session from the capability flags, never per call.

use crate::driver::{Driver, ElementHandle, ScriptArg, SessionCapabilities};
use crate::result::EscogerResult;

/// Script that writes an attribute on `arguments[0]`
pub const SET_ATTRIBUTE_SCRIPT: &str =
    "arguments[0].setAttribute(arguments[1], arguments[2]);";

/// Script that invokes the change handler of `arguments[0]`'s parent
pub const FIRE_ONCHANGE_SCRIPT: &str = "arguments[0].parentNode.onchange();";

/// Applies or clears the selected state of a single option.
pub trait SelectionStrategy {
    /// Strategy name for diagnostics
    fn name(&self) -> &'static str;

    /// Bring `option` to the requested selected state. Re-applying the
    /// current state is a no-op in effect.
    fn apply(
        &self,
        driver: &dyn Driver,
        option: &ElementHandle,
        selected: bool,
    ) -> EscogerResult<()>;
}

/// Click-based selection through the driver's native primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSelection;

impl SelectionStrategy for NativeSelection {
    fn name(&self) -> &'static str {
        "native"
    }

    fn apply(
        &self,
        driver: &dyn Driver,
        option: &ElementHandle,
        selected: bool,
    ) -> EscogerResult<()> {
        if driver.element_is_selected(option)? != selected {
            driver.click(option)?;
        }
        Ok(())
    }
}

/// Script-injected attribute mutation for marionette sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedSelection;

impl SelectionStrategy for ScriptedSelection {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn apply(
        &self,
        driver: &dyn Driver,
        option: &ElementHandle,
        selected: bool,
    ) -> EscogerResult<()> {
        driver.execute_script(
            SET_ATTRIBUTE_SCRIPT,
            &[
                ScriptArg::element(option),
                ScriptArg::text("selected"),
                ScriptArg::text(selected.to_string()),
            ],
        )?;
        // Best-effort: a page with no registered onchange handler makes this
        // script throw, and that outcome is defined as always-ignored.
        if let Err(err) = driver.execute_script(FIRE_ONCHANGE_SCRIPT, &[ScriptArg::element(option)])
        {
            tracing::debug!(error = %err, "no onchange handler, ignored");
        }
        Ok(())
    }
}

/// Pick the selection strategy for a session, once, from its capabilities.
#[must_use]
pub fn session_strategy(capabilities: &SessionCapabilities) -> Box<dyn SelectionStrategy> {
    if capabilities.native_selection() {
        Box::new(NativeSelection)
    } else {
        Box::new(ScriptedSelection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockSelect};
    use crate::select_list::SelectList;

    fn option(driver: &MockDriver, locator: &str, index: usize) -> ElementHandle {
        let list = SelectList::resolve(driver, locator).unwrap();
        list.options(driver).unwrap().remove(index)
    }

    mod native_tests {
        use super::*;

        #[test]
        fn test_native_selects_by_clicking() {
            let driver = MockDriver::new()
                .select(MockSelect::multiple("id=l").option("a", "A").option("b", "B"));
            let target = option(&driver, "id=l", 1);

            NativeSelection.apply(&driver, &target, true).unwrap();
            assert_eq!(driver.click_count(), 1);
            assert_eq!(driver.selected_texts("id=l"), ["B"]);
        }

        #[test]
        fn test_native_is_idempotent() {
            let driver =
                MockDriver::new().select(MockSelect::multiple("id=l").option_selected("a", "A"));
            let target = option(&driver, "id=l", 0);

            // Already in the target state, so no click is issued.
            NativeSelection.apply(&driver, &target, true).unwrap();
            assert_eq!(driver.click_count(), 0);
            assert_eq!(driver.selected_texts("id=l"), ["A"]);
        }

        #[test]
        fn test_native_deselects_by_clicking() {
            let driver =
                MockDriver::new().select(MockSelect::multiple("id=l").option_selected("a", "A"));
            let target = option(&driver, "id=l", 0);

            NativeSelection.apply(&driver, &target, false).unwrap();
            assert_eq!(driver.click_count(), 1);
            assert!(driver.selected_texts("id=l").is_empty());
        }
    }

    mod scripted_tests {
        use super::*;

        #[test]
        fn test_scripted_sets_attribute_and_fires_change() {
            let driver = MockDriver::new().select(
                MockSelect::single("id=l")
                    .option("a", "A")
                    .with_change_handler(),
            );
            let target = option(&driver, "id=l", 0);

            ScriptedSelection.apply(&driver, &target, true).unwrap();
            assert_eq!(driver.selected_texts("id=l"), ["A"]);
            assert_eq!(driver.change_event_count("id=l"), 1);
            assert_eq!(driver.click_count(), 0);
        }

        #[test]
        fn test_scripted_swallows_missing_change_handler() {
            let driver = MockDriver::new().select(MockSelect::single("id=l").option("a", "A"));
            let target = option(&driver, "id=l", 0);

            // No handler registered; the dispatch failure must not surface.
            ScriptedSelection.apply(&driver, &target, true).unwrap();
            assert_eq!(driver.selected_texts("id=l"), ["A"]);
            assert_eq!(driver.change_event_count("id=l"), 0);
        }

        #[test]
        fn test_scripted_deselects() {
            let driver = MockDriver::new().select(
                MockSelect::multiple("id=l")
                    .option_selected("a", "A")
                    .option_selected("b", "B"),
            );
            let target = option(&driver, "id=l", 0);

            ScriptedSelection.apply(&driver, &target, false).unwrap();
            assert_eq!(driver.selected_texts("id=l"), ["B"]);
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_standard_session_gets_native() {
            let strategy = session_strategy(&SessionCapabilities::standard());
            assert_eq!(strategy.name(), "native");
        }

        #[test]
        fn test_marionette_session_gets_scripted() {
            let strategy = session_strategy(&SessionCapabilities::marionette());
            assert_eq!(strategy.name(), "scripted");
        }
    }
}
