//! Host-facing keyword surface.
//!
//! The host automation framework addresses operations by keyword name.
//! Instead of reflection-discovered methods, the surface here is explicit: a
//! [`Keyword`] enum that parses the host's names (matching is case-,
//! space- and underscore-insensitive, as keyword-driven hosts resolve names),
//! and a [`SelectLibrary`] with one method per keyword plus a single
//! [`SelectLibrary::run`] dispatch entry point. Every failure is a typed
//! error; no operation reports failure through a return value.

use crate::controller::SelectionController;
use crate::driver::Driver;
use crate::result::{EscogerError, EscogerResult};
use crate::strategy::{session_strategy, SelectionStrategy};
use crate::view::SelectListView;

/// One host-dispatchable operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Labels of every option
    GetListItems,
    /// Label of the first selected option
    GetSelectedListLabel,
    /// Labels of all selected options
    GetSelectedListLabels,
    /// Value of the first selected option
    GetSelectedListValue,
    /// Values of all selected options
    GetSelectedListValues,
    /// Verify the selection is exactly the given items
    ListSelectionShouldBe,
    /// Verify nothing is selected
    ListShouldHaveNoSelections,
    /// Select every option of a multi-select list
    SelectAllFromList,
    /// Select items by value or visible text
    SelectFromList,
    /// Select items by position
    SelectFromListByIndex,
    /// Select items by value attribute
    SelectFromListByValue,
    /// Select items by visible text
    SelectFromListByLabel,
    /// Deselect items by value or visible text
    UnselectFromList,
    /// Deselect items by position
    UnselectFromListByIndex,
    /// Deselect items by value attribute
    UnselectFromListByValue,
    /// Deselect items by visible text
    UnselectFromListByLabel,
}

impl Keyword {
    /// Every keyword, in documentation order
    pub const ALL: [Self; 16] = [
        Self::GetListItems,
        Self::GetSelectedListLabel,
        Self::GetSelectedListLabels,
        Self::GetSelectedListValue,
        Self::GetSelectedListValues,
        Self::ListSelectionShouldBe,
        Self::ListShouldHaveNoSelections,
        Self::SelectAllFromList,
        Self::SelectFromList,
        Self::SelectFromListByIndex,
        Self::SelectFromListByValue,
        Self::SelectFromListByLabel,
        Self::UnselectFromList,
        Self::UnselectFromListByIndex,
        Self::UnselectFromListByValue,
        Self::UnselectFromListByLabel,
    ];

    /// Canonical host-facing name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetListItems => "Get List Items",
            Self::GetSelectedListLabel => "Get Selected List Label",
            Self::GetSelectedListLabels => "Get Selected List Labels",
            Self::GetSelectedListValue => "Get Selected List Value",
            Self::GetSelectedListValues => "Get Selected List Values",
            Self::ListSelectionShouldBe => "List Selection Should Be",
            Self::ListShouldHaveNoSelections => "List Should Have No Selections",
            Self::SelectAllFromList => "Select All From List",
            Self::SelectFromList => "Select From List",
            Self::SelectFromListByIndex => "Select From List By Index",
            Self::SelectFromListByValue => "Select From List By Value",
            Self::SelectFromListByLabel => "Select From List By Label",
            Self::UnselectFromList => "Unselect From List",
            Self::UnselectFromListByIndex => "Unselect From List By Index",
            Self::UnselectFromListByValue => "Unselect From List By Value",
            Self::UnselectFromListByLabel => "Unselect From List By Label",
        }
    }

    /// Resolve a host keyword name, ignoring case, spaces and underscores.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = normalize_keyword_name(name);
        Self::ALL
            .into_iter()
            .find(|keyword| normalize_keyword_name(keyword.name()) == wanted)
    }
}

fn normalize_keyword_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Value handed back to the host from a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordReturn {
    /// The keyword returns nothing
    None,
    /// A single string
    Value(String),
    /// A list of strings
    List(Vec<String>),
}

/// The select-list keyword library.
///
/// Owns the driver session and the selection strategy, which is chosen once
/// from the session capabilities at construction.
pub struct SelectLibrary<D: Driver> {
    driver: D,
    strategy: Box<dyn SelectionStrategy>,
}

impl<D: Driver> std::fmt::Debug for SelectLibrary<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectLibrary")
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

impl<D: Driver> SelectLibrary<D> {
    /// Build a library over a driver session
    #[must_use]
    pub fn new(driver: D) -> Self {
        let strategy = session_strategy(&driver.capabilities());
        Self { driver, strategy }
    }

    /// Name of the active selection strategy
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Borrow the underlying driver session
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    fn controller(&self) -> SelectionController<'_> {
        SelectionController::new(&self.driver, self.strategy.as_ref())
    }

    fn view(&self) -> SelectListView<'_> {
        SelectListView::new(&self.driver)
    }

    /// Labels of every option in the list
    pub fn get_list_items(&self, locator: &str) -> EscogerResult<Vec<String>> {
        self.view().list_items(locator)
    }

    /// Label of the first selected option
    pub fn get_selected_list_label(&self, locator: &str) -> EscogerResult<String> {
        self.view().selected_label(locator)
    }

    /// Labels of all selected options; fails when nothing is selected
    pub fn get_selected_list_labels(&self, locator: &str) -> EscogerResult<Vec<String>> {
        self.view().selected_labels(locator)
    }

    /// Value of the first selected option
    pub fn get_selected_list_value(&self, locator: &str) -> EscogerResult<String> {
        self.view().selected_value(locator)
    }

    /// Values of all selected options; fails when nothing is selected
    pub fn get_selected_list_values(&self, locator: &str) -> EscogerResult<Vec<String>> {
        self.view().selected_values(locator)
    }

    /// Verify the selection is exactly `items`
    pub fn list_selection_should_be(&self, locator: &str, items: &[String]) -> EscogerResult<()> {
        self.view().selection_should_be(locator, items)
    }

    /// Verify the list has no selection
    pub fn list_should_have_no_selections(&self, locator: &str) -> EscogerResult<()> {
        self.view().selection_should_be_empty(locator)
    }

    /// Select every option of a multi-select list
    pub fn select_all_from_list(&self, locator: &str) -> EscogerResult<()> {
        self.controller().select_all(locator)
    }

    /// Select items by value or visible text
    pub fn select_from_list(&self, locator: &str, items: &[String]) -> EscogerResult<()> {
        self.controller().select(locator, items)
    }

    /// Select items by position
    pub fn select_from_list_by_index(
        &self,
        locator: &str,
        indexes: &[String],
    ) -> EscogerResult<()> {
        self.controller().select_by_index(locator, indexes)
    }

    /// Select items by value attribute
    pub fn select_from_list_by_value(
        &self,
        locator: &str,
        values: &[String],
    ) -> EscogerResult<()> {
        self.controller().select_by_value(locator, values)
    }

    /// Select items by visible text
    pub fn select_from_list_by_label(
        &self,
        locator: &str,
        labels: &[String],
    ) -> EscogerResult<()> {
        self.controller().select_by_label(locator, labels)
    }

    /// Deselect items by value or visible text
    pub fn unselect_from_list(&self, locator: &str, items: &[String]) -> EscogerResult<()> {
        self.controller().unselect(locator, items)
    }

    /// Deselect items by position
    pub fn unselect_from_list_by_index(
        &self,
        locator: &str,
        indexes: &[String],
    ) -> EscogerResult<()> {
        self.controller().unselect_by_index(locator, indexes)
    }

    /// Deselect items by value attribute
    pub fn unselect_from_list_by_value(
        &self,
        locator: &str,
        values: &[String],
    ) -> EscogerResult<()> {
        self.controller().unselect_by_value(locator, values)
    }

    /// Deselect items by visible text
    pub fn unselect_from_list_by_label(
        &self,
        locator: &str,
        labels: &[String],
    ) -> EscogerResult<()> {
        self.controller().unselect_by_label(locator, labels)
    }

    /// Dispatch one keyword against a locator and argument list.
    pub fn run(
        &self,
        keyword: Keyword,
        locator: &str,
        args: &[String],
    ) -> EscogerResult<KeywordReturn> {
        match keyword {
            Keyword::GetListItems => self.get_list_items(locator).map(KeywordReturn::List),
            Keyword::GetSelectedListLabel => {
                self.get_selected_list_label(locator).map(KeywordReturn::Value)
            }
            Keyword::GetSelectedListLabels => {
                self.get_selected_list_labels(locator).map(KeywordReturn::List)
            }
            Keyword::GetSelectedListValue => {
                self.get_selected_list_value(locator).map(KeywordReturn::Value)
            }
            Keyword::GetSelectedListValues => {
                self.get_selected_list_values(locator).map(KeywordReturn::List)
            }
            Keyword::ListSelectionShouldBe => self
                .list_selection_should_be(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::ListShouldHaveNoSelections => self
                .list_should_have_no_selections(locator)
                .map(|()| KeywordReturn::None),
            Keyword::SelectAllFromList => {
                self.select_all_from_list(locator).map(|()| KeywordReturn::None)
            }
            Keyword::SelectFromList => self
                .select_from_list(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::SelectFromListByIndex => self
                .select_from_list_by_index(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::SelectFromListByValue => self
                .select_from_list_by_value(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::SelectFromListByLabel => self
                .select_from_list_by_label(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::UnselectFromList => self
                .unselect_from_list(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::UnselectFromListByIndex => self
                .unselect_from_list_by_index(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::UnselectFromListByValue => self
                .unselect_from_list_by_value(locator, args)
                .map(|()| KeywordReturn::None),
            Keyword::UnselectFromListByLabel => self
                .unselect_from_list_by_label(locator, args)
                .map(|()| KeywordReturn::None),
        }
    }

    /// Dispatch by host keyword name.
    ///
    /// # Errors
    ///
    /// [`EscogerError::UnknownKeyword`] when the name resolves to nothing.
    pub fn run_keyword(
        &self,
        name: &str,
        locator: &str,
        args: &[String],
    ) -> EscogerResult<KeywordReturn> {
        let keyword = Keyword::parse(name).ok_or_else(|| EscogerError::UnknownKeyword {
            name: name.to_string(),
        })?;
        self.run(keyword, locator, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::SessionCapabilities;
    use crate::mock::{MockDriver, MockSelect};

    fn library() -> SelectLibrary<MockDriver> {
        SelectLibrary::new(
            MockDriver::new().select(
                MockSelect::multiple("id=fruits")
                    .option("ap", "Apple")
                    .option_selected("ba", "Banana"),
            ),
        )
    }

    mod name_tests {
        use super::*;

        #[test]
        fn test_every_keyword_name_round_trips() {
            for keyword in Keyword::ALL {
                assert_eq!(Keyword::parse(keyword.name()), Some(keyword));
            }
        }

        #[test]
        fn test_parse_is_case_and_separator_insensitive() {
            assert_eq!(
                Keyword::parse("select_from_list_by_value"),
                Some(Keyword::SelectFromListByValue)
            );
            assert_eq!(
                Keyword::parse("SELECT FROM LIST"),
                Some(Keyword::SelectFromList)
            );
        }

        #[test]
        fn test_parse_unknown_name() {
            assert_eq!(Keyword::parse("Click Button"), None);
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_run_returns_list() {
            let lib = library();
            let result = lib.run(Keyword::GetListItems, "id=fruits", &[]).unwrap();
            assert_eq!(
                result,
                KeywordReturn::List(vec!["Apple".to_string(), "Banana".to_string()])
            );
        }

        #[test]
        fn test_run_returns_value() {
            let lib = library();
            let result = lib
                .run(Keyword::GetSelectedListValue, "id=fruits", &[])
                .unwrap();
            assert_eq!(result, KeywordReturn::Value("ba".to_string()));
        }

        #[test]
        fn test_run_mutating_keyword_returns_none() {
            let lib = library();
            let result = lib
                .run(
                    Keyword::SelectFromListByValue,
                    "id=fruits",
                    &["ap".to_string()],
                )
                .unwrap();
            assert_eq!(result, KeywordReturn::None);
            let selected = lib.get_selected_list_labels("id=fruits").unwrap();
            assert_eq!(selected, ["Apple", "Banana"]);
        }

        #[test]
        fn test_run_keyword_by_name_matches_direct_call() {
            let lib = library();
            let by_name = lib
                .run_keyword("Get List Items", "id=fruits", &[])
                .unwrap();
            let direct = lib.get_list_items("id=fruits").unwrap();
            assert_eq!(by_name, KeywordReturn::List(direct));
        }

        #[test]
        fn test_run_keyword_unknown_name_is_typed_error() {
            let lib = library();
            let err = lib.run_keyword("Press Button", "id=fruits", &[]).unwrap_err();
            assert!(matches!(err, EscogerError::UnknownKeyword { name } if name == "Press Button"));
        }

        #[test]
        fn test_errors_propagate_through_dispatch() {
            let lib = library();
            let err = lib
                .run(Keyword::SelectFromListByIndex, "id=fruits", &[])
                .unwrap_err();
            assert!(matches!(err, EscogerError::NoInput { what: "index" }));
        }
    }

    mod strategy_choice_tests {
        use super::*;

        #[test]
        fn test_standard_session_uses_native_strategy() {
            let lib = library();
            assert_eq!(lib.strategy_name(), "native");
        }

        #[test]
        fn test_marionette_session_uses_scripted_strategy() {
            let driver = MockDriver::new()
                .with_capabilities(SessionCapabilities::marionette())
                .select(MockSelect::single("id=l").option("a", "A"));
            let lib = SelectLibrary::new(driver);
            assert_eq!(lib.strategy_name(), "scripted");
        }

        #[test]
        fn test_marionette_selection_goes_through_scripts() {
            let driver = MockDriver::new()
                .with_capabilities(SessionCapabilities::marionette())
                .select(
                    MockSelect::single("id=country")
                        .option("us", "United States")
                        .with_change_handler(),
                );
            let lib = SelectLibrary::new(driver);
            lib.select_from_list("id=country", &["us".to_string()])
                .unwrap();
            assert_eq!(
                lib.get_selected_list_label("id=country").unwrap(),
                "United States"
            );
            // The scripted path never clicks; it mutates and fires onchange.
            assert_eq!(lib.driver().click_count(), 0);
            assert_eq!(lib.driver().change_event_count("id=country"), 1);
        }
    }
}
