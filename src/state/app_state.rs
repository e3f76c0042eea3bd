//! Application state definitions

use super::family::{Family, FamilyPage};
use super::picker::OptionPicker;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    FamilyList,
    FamilyEdit,
}

impl View {
    pub fn is_form_view(&self) -> bool {
        matches!(self, View::FamilyEdit)
    }
}

/// View parameters for navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub family_id: Option<String>,
}

impl ViewParams {
    pub fn family(id: impl Into<String>) -> Self {
        Self {
            family_id: Some(id.into()),
        }
    }
}

/// Load state of the family list
#[derive(Debug, Clone, Default)]
pub enum ListLoad {
    #[default]
    Idle,
    Loading,
    Loaded(FamilyPage),
    Failed(String),
}

/// Paged list of families
#[derive(Debug, Clone)]
pub struct FamilyListState {
    /// 1-based page number
    pub page: u32,
    pub load: ListLoad,
    pub selected_index: usize,
}

impl Default for FamilyListState {
    fn default() -> Self {
        Self {
            page: 1,
            load: ListLoad::Idle,
            selected_index: 0,
        }
    }
}

impl FamilyListState {
    pub fn families(&self) -> &[Family] {
        match &self.load {
            ListLoad::Loaded(page) => &page.families,
            _ => &[],
        }
    }

    pub fn selected_family(&self) -> Option<&Family> {
        self.families().get(self.selected_index)
    }

    pub fn page_count(&self) -> u32 {
        match &self.load {
            ListLoad::Loaded(page) => page.meta.page_count(),
            _ => self.page,
        }
    }

    /// Mark a page as requested
    pub fn start_loading(&mut self, page: u32) {
        self.page = page.max(1);
        self.load = ListLoad::Loading;
    }

    /// Apply a page result. Results for a page other than the one last
    /// requested are ignored.
    pub fn apply(&mut self, page: u32, result: Result<FamilyPage, String>) -> bool {
        if page != self.page || !matches!(self.load, ListLoad::Loading) {
            return false;
        }
        self.load = match result {
            Ok(families) => ListLoad::Loaded(families),
            Err(message) => ListLoad::Failed(message),
        };
        let len = self.families().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
        true
    }

    /// Next page to request, if any
    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.page_count()).then_some(self.page + 1)
    }

    /// Previous page to request, if any
    pub fn prev_page(&self) -> Option<u32> {
        (self.page > 1).then_some(self.page - 1)
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        let max = self.families().len();
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_params: ViewParams,
    pub view_history: Vec<(View, ViewParams)>,

    // Data
    pub family_list: FamilyListState,

    // Select field popup on the edit form
    pub picker: Option<OptionPicker>,
}
