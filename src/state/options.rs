//! Option lists for select fields
//!
//! `DependentOptions` tracks a list whose contents depend on a parent value.
//! Every parent change issues a new generation; fetched results are applied
//! only when they carry the latest generation, so a slow response for an old
//! parent can never overwrite the list of the current one.

use super::family::{City, State};

/// A normalized `{ value, label }` pair for a selection control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: i64,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

impl From<&State> for SelectOption {
    fn from(state: &State) -> Self {
        Self::new(state.id, state.name.clone())
    }
}

impl From<&City> for SelectOption {
    fn from(city: &City) -> Self {
        Self::new(city.id, city.name.clone())
    }
}

/// Load state of an option list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionList {
    /// Nothing requested (e.g. no parent selected)
    #[default]
    Idle,
    Loading,
    Loaded(Vec<SelectOption>),
    Failed(String),
}

impl OptionList {
    /// The options currently available, empty unless loaded
    pub fn options(&self) -> &[SelectOption] {
        match self {
            OptionList::Loaded(options) => options,
            _ => &[],
        }
    }

    /// Resolve a field value to its option. A value missing from the list
    /// (stale selection, list not loaded yet) resolves to `None`.
    pub fn find(&self, value: Option<i64>) -> Option<&SelectOption> {
        let value = value?;
        self.options().iter().find(|o| o.value == value)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, OptionList::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OptionList::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Build a list from a fetch result
    pub fn from_result(result: Result<Vec<SelectOption>, String>) -> Self {
        match result {
            Ok(options) => OptionList::Loaded(options),
            Err(message) => OptionList::Failed(message),
        }
    }
}

/// Identifies one fetch of a dependent list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub parent: i64,
    pub generation: u64,
}

/// An option list conditioned on a parent value
#[derive(Debug, Clone, Default)]
pub struct DependentOptions {
    parent: Option<i64>,
    generation: u64,
    list: OptionList,
}

impl DependentOptions {
    pub fn parent(&self) -> Option<i64> {
        self.parent
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn list(&self) -> &OptionList {
        &self.list
    }

    /// Point the list at a new parent value.
    ///
    /// The current list is cleared immediately. Returns the ticket for the
    /// fetch the caller must issue, or `None` when the parent is absent, in
    /// which case the list stays empty and nothing is fetched.
    pub fn set_parent(&mut self, parent: Option<i64>) -> Option<FetchTicket> {
        self.parent = parent;
        self.generation += 1;
        match parent {
            Some(parent) => {
                self.list = OptionList::Loading;
                Some(FetchTicket {
                    parent,
                    generation: self.generation,
                })
            }
            None => {
                self.list = OptionList::Idle;
                None
            }
        }
    }

    /// Re-issue the fetch for the current parent
    pub fn retry(&mut self) -> Option<FetchTicket> {
        self.set_parent(self.parent)
    }

    /// Apply a fetch result. Returns `false` (and leaves the list alone) when
    /// the ticket has been superseded by a newer parent value.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<SelectOption>, String>) -> bool {
        if ticket.generation != self.generation || Some(ticket.parent) != self.parent {
            return false;
        }
        self.list = OptionList::from_result(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities(names: &[(i64, &str)]) -> Vec<SelectOption> {
        names
            .iter()
            .map(|(id, name)| SelectOption::new(*id, *name))
            .collect()
    }

    #[test]
    fn test_absent_parent_issues_no_fetch() {
        let mut list = DependentOptions::default();
        assert!(list.set_parent(None).is_none());
        assert_eq!(list.list(), &OptionList::Idle);
        assert!(list.list().options().is_empty());
    }

    #[test]
    fn test_parent_change_clears_list_before_fetch_resolves() {
        let mut list = DependentOptions::default();
        let first = list.set_parent(Some(1)).unwrap();
        assert!(list.apply(first, Ok(cities(&[(10, "Medan")]))));
        assert_eq!(list.list().options().len(), 1);

        list.set_parent(Some(2));
        assert!(list.list().is_loading());
        assert!(list.list().options().is_empty());
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let mut list = DependentOptions::default();
        let old = list.set_parent(Some(1)).unwrap();
        let new = list.set_parent(Some(2)).unwrap();

        assert!(list.apply(new, Ok(cities(&[(20, "Bandung")]))));
        assert!(!list.apply(old, Ok(cities(&[(10, "Medan")]))));
        assert_eq!(list.list().options(), cities(&[(20, "Bandung")]).as_slice());
    }

    #[test]
    fn test_superseded_result_arriving_first_is_discarded() {
        let mut list = DependentOptions::default();
        let old = list.set_parent(Some(1)).unwrap();
        let new = list.set_parent(Some(2)).unwrap();

        assert!(!list.apply(old, Ok(cities(&[(10, "Medan")]))));
        assert!(list.list().is_loading());
        assert!(list.apply(new, Ok(cities(&[(20, "Bandung")]))));
        assert_eq!(list.list().find(Some(20)).unwrap().label, "Bandung");
    }

    #[test]
    fn test_reselecting_same_parent_still_supersedes_older_fetch() {
        let mut list = DependentOptions::default();
        let first = list.set_parent(Some(1)).unwrap();
        let second = list.set_parent(Some(1)).unwrap();
        assert_ne!(first.generation, second.generation);
        assert!(!list.apply(first, Ok(vec![])));
        assert!(list.apply(second, Ok(vec![])));
    }

    #[test]
    fn test_clearing_parent_discards_in_flight_result() {
        let mut list = DependentOptions::default();
        let ticket = list.set_parent(Some(1)).unwrap();
        list.set_parent(None);
        assert!(!list.apply(ticket, Ok(cities(&[(10, "Medan")]))));
        assert_eq!(list.list(), &OptionList::Idle);
    }

    #[test]
    fn test_failed_fetch_then_retry() {
        let mut list = DependentOptions::default();
        let ticket = list.set_parent(Some(3)).unwrap();
        list.apply(ticket, Err("connection refused".to_string()));
        assert_eq!(list.list().error(), Some("connection refused"));

        let retry = list.retry().unwrap();
        assert_eq!(retry.parent, 3);
        assert!(list.list().is_loading());
    }

    #[test]
    fn test_find_unknown_value_is_unselected() {
        let list = OptionList::Loaded(cities(&[(10, "Medan")]));
        assert!(list.find(Some(99)).is_none());
        assert!(list.find(None).is_none());
        assert!(OptionList::Loading.find(Some(10)).is_none());
    }

    #[test]
    fn test_option_from_state() {
        let state = State {
            id: 12,
            name: "Sumatera Utara".to_string(),
        };
        assert_eq!(SelectOption::from(&state), SelectOption::new(12, "Sumatera Utara"));
    }
}
