//! Application state and core logic

use crate::api::{ApiError, FamilyApi};
use crate::config::TuiConfig;
use crate::controller::{FamilyFormController, Fetch, SubmitOutcome};
use crate::state::{
    AppState, City, Family, FamilyPage, FetchTicket, FieldId, Form, ListLoad, OptionList,
    OptionPicker, State, ToastQueue, View, ViewParams,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Result of a background fetch, delivered to the event loop
#[derive(Debug)]
pub enum ApiEvent {
    Record {
        id: String,
        result: Result<Family, ApiError>,
    },
    States(Result<Vec<State>, ApiError>),
    Cities {
        ticket: FetchTicket,
        result: Result<Vec<City>, ApiError>,
    },
    FamilyPage {
        page: u32,
        result: Result<FamilyPage, ApiError>,
    },
    Saved {
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Family edit form
    pub controller: FamilyFormController,
    /// Transient notifications
    pub toasts: ToastQueue,
    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
    /// Address of the API, for display
    pub api_address: String,
    api: Arc<dyn FamilyApi>,
    config: TuiConfig,
    events_tx: UnboundedSender<ApiEvent>,
    events_rx: UnboundedReceiver<ApiEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(api: Arc<dyn FamilyApi>, config: TuiConfig, api_address: String) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            controller: FamilyFormController::new(config.country_id()),
            toasts: ToastQueue::new(config.toast_duration()),
            status_message: None,
            api_address,
            api,
            config,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Open the first view: the given family's edit form, or the list
    pub fn start(&mut self, family_id: Option<String>) {
        match family_id {
            Some(id) => self.open_family(id),
            None => self.load_family_page(1),
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Per-frame housekeeping: expire toasts and apply finished fetches
    pub fn tick(&mut self) {
        if !self.toasts.is_empty() {
            self.toasts.prune();
        }
        self.drain_events();
    }

    /// Apply every fetch result that has arrived. Returns how many were handled.
    pub fn drain_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    fn handle_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Record { id, result } => {
                let fetches = self.controller.apply_record(&id, result);
                self.dispatch_all(fetches);
            }
            ApiEvent::States(result) => self.controller.apply_states(result),
            ApiEvent::Cities { ticket, result } => {
                self.controller.apply_cities(ticket, result);
            }
            ApiEvent::FamilyPage { page, result } => {
                let result = result.map_err(|e| {
                    tracing::warn!("Failed to load families page {page}: {e}");
                    e.to_string()
                });
                self.state.family_list.apply(page, result);
            }
            ApiEvent::Saved { id, result } => {
                match self.controller.finish_submit(&id, result, &mut self.toasts) {
                    Some(outcome) => self.handle_submit_outcome(outcome),
                    None => tracing::debug!("Save result for {id} arrived after the form closed"),
                }
            }
        }
    }

    fn dispatch_all(&self, fetches: Vec<Fetch>) {
        for fetch in fetches {
            self.dispatch(fetch);
        }
    }

    /// Run a fetch in the background; its result comes back as an `ApiEvent`
    fn dispatch(&self, fetch: Fetch) {
        tracing::debug!("Dispatching {fetch:?}");
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match fetch {
                Fetch::Record(id) => {
                    let result = api.get_family(&id).await;
                    ApiEvent::Record { id, result }
                }
                Fetch::States(country_id) => ApiEvent::States(api.list_states(country_id).await),
                Fetch::Cities(ticket) => ApiEvent::Cities {
                    ticket,
                    result: api.list_cities(ticket.parent).await,
                },
            };
            // Receiver is gone only when the app is shutting down
            let _ = tx.send(event);
        });
    }

    /// Request a page of the family list
    fn load_family_page(&mut self, page: u32) {
        self.state.family_list.start_loading(page);
        let page = self.state.family_list.page;
        let limit = self.config.page_size();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_families(page, limit).await;
            let _ = tx.send(ApiEvent::FamilyPage { page, result });
        });
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View, params: ViewParams) {
        tracing::info!("Navigating to {view:?} {params:?}");
        self.state.picker = None;
        // Save current view to history
        self.state.view_history.push((
            self.state.current_view.clone(),
            self.state.view_params.clone(),
        ));
        self.state.current_view = view;
        self.state.view_params = params;
    }

    /// Go back to previous view
    pub fn go_back(&mut self) {
        self.state.picker = None;
        // Skip form views in history to go back to the last non-form view
        while let Some((view, params)) = self.state.view_history.pop() {
            if view.is_form_view() {
                continue;
            }
            self.state.current_view = view;
            self.state.view_params = params;
            self.ensure_list_loaded();
            return;
        }
        // Started directly on a form: fall back to the list
        self.state.current_view = View::FamilyList;
        self.state.view_params = ViewParams::default();
        self.ensure_list_loaded();
    }

    fn ensure_list_loaded(&mut self) {
        if self.state.current_view == View::FamilyList
            && matches!(self.state.family_list.load, ListLoad::Idle)
        {
            self.load_family_page(1);
        }
    }

    /// Open the edit form for a family
    fn open_family(&mut self, id: String) {
        self.navigate(View::FamilyEdit, ViewParams::family(id.clone()));
        let fetches = self.controller.mount(Some(id));
        self.dispatch_all(fetches);
    }

    /// Drop the current draft
    fn discard_draft(&mut self) {
        self.controller = FamilyFormController::new(self.config.country_id());
        self.state.picker = None;
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Clear any status messages on key press
        self.status_message = None;

        match self.state.current_view {
            View::FamilyList => self.handle_list_key(key),
            View::FamilyEdit => {
                if self.state.picker.is_some() {
                    self.handle_picker_key(key);
                } else {
                    self.handle_edit_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle keys in the family list
    fn handle_list_key(&mut self, key: KeyEvent) {
        let list = &mut self.state.family_list;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('j') | KeyCode::Down => list.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => list.move_selection_up(),
            KeyCode::Char('n') | KeyCode::Right => {
                if let Some(page) = list.next_page() {
                    list.selected_index = 0;
                    self.load_family_page(page);
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if let Some(page) = list.prev_page() {
                    list.selected_index = 0;
                    self.load_family_page(page);
                }
            }
            KeyCode::Char('r') => {
                let page = list.page;
                self.load_family_page(page);
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = list.selected_family().map(|f| f.id.clone()) {
                    self.open_family(id);
                }
            }
            _ => {}
        }
    }

    /// Handle keys in the family edit form
    fn handle_edit_key(&mut self, key: KeyEvent) {
        // The draft stays as sent until the save finishes
        if self.controller.is_submitting() {
            self.status_message = Some("Still saving...".to_string());
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.controller.form_mut().next_field(),
            KeyCode::BackTab | KeyCode::Up => self.controller.form_mut().prev_field(),
            // Save (Ctrl+S or Cmd+W / Ctrl+W)
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_family_edit();
            }
            KeyCode::Char('w') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.save_family_edit();
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let fetches = self.controller.retry();
                if fetches.is_empty() {
                    self.status_message = Some("Nothing to reload".to_string());
                }
                self.dispatch_all(fetches);
            }
            KeyCode::Esc => {
                self.discard_draft();
                self.go_back();
            }
            KeyCode::Enter => self.handle_edit_enter(),
            KeyCode::Char(c) => self.controller.input_char(c),
            KeyCode::Backspace => self.controller.backspace(),
            _ => {}
        }
    }

    fn handle_edit_enter(&mut self) {
        let form = self.controller.form();
        if form.is_submit_row_active() {
            self.save_family_edit();
            return;
        }
        let Some(field) = form.active_field_id() else {
            return;
        };

        if form.field(field).is_select() {
            self.open_picker(field);
        } else if form.field(field).is_multiline {
            self.controller.input_char('\n');
        } else {
            self.controller.form_mut().next_field();
        }
    }

    fn open_picker(&mut self, field: FieldId) {
        match self.controller.options_for(field) {
            OptionList::Loaded(options) => {
                let selected = self.controller.form().field(field).as_selected();
                self.state.picker = Some(OptionPicker::with_selection(field, options, selected));
            }
            OptionList::Loading => {
                self.status_message = Some("Still loading options...".to_string());
            }
            OptionList::Idle => {
                self.status_message = Some("Choose a Provinsi first".to_string());
            }
            OptionList::Failed(_) => {
                self.status_message = Some("Options failed to load, Ctrl+R to retry".to_string());
            }
        }
    }

    /// Handle keys while the option picker is open
    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.state.picker.as_mut() else {
            return;
        };
        let options = self.controller.options_for(picker.field).options();

        match key.code {
            KeyCode::Esc => self.state.picker = None,
            KeyCode::Down => picker.move_down(picker.filtered(options).len()),
            KeyCode::Up => picker.move_up(),
            KeyCode::Backspace => picker.pop_char(),
            KeyCode::Char(c) => picker.push_char(c),
            KeyCode::Enter => {
                let field = picker.field;
                if let Some(value) = picker.chosen(options) {
                    self.state.picker = None;
                    if let Some(fetch) = self.controller.select(field, Some(value)) {
                        self.dispatch(fetch);
                    }
                }
            }
            _ => {}
        }
    }

    /// Submit the edit form; the update runs in the background
    fn save_family_edit(&mut self) {
        let pending = match self.controller.begin_submit() {
            Ok(pending) => pending,
            Err(outcome) => {
                self.handle_submit_outcome(outcome);
                return;
            }
        };

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.update_family(&pending.id, &pending.update).await;
            let _ = tx.send(ApiEvent::Saved {
                id: pending.id,
                result,
            });
        });
    }

    fn handle_submit_outcome(&mut self, outcome: SubmitOutcome) {
        match outcome {
            SubmitOutcome::Saved => {
                self.discard_draft();
                self.navigate(View::FamilyList, ViewParams::default());
                let page = self.state.family_list.page;
                self.load_family_page(page);
            }
            SubmitOutcome::Rejected => {
                // Focus the first invalid field
                if let Some(field) = self.controller.errors().keys().next().copied() {
                    self.controller.form_mut().set_active_field(field.index());
                }
                let count = self.controller.errors().len();
                self.status_message = Some(format!("Please fix the {count} highlighted field(s)"));
            }
            SubmitOutcome::NotReady => {
                self.status_message = Some("Family is not loaded yet".to_string());
            }
            SubmitOutcome::Busy => {
                self.status_message = Some("Still saving...".to_string());
            }
            SubmitOutcome::Failed(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFamilyApi;
    use crate::state::{PageMeta, ToastKind};

    fn create_test_family() -> Family {
        Family {
            id: "fam-1".to_string(),
            name: "Keluarga Siregar".to_string(),
            state_id: Some(12),
            city_id: Some(1271),
            address: "Jl. Pemuda 3".to_string(),
            district: "Medan Maimun".to_string(),
            postal_code: "20151".to_string(),
            family_phone_number: "0819000111".to_string(),
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Mock that serves the test family and its locality lists
    fn family_api() -> MockFamilyApi {
        let mut api = MockFamilyApi::new();
        api.expect_get_family()
            .returning(|_| Ok(create_test_family()));
        api.expect_list_states().returning(|_| {
            Ok(vec![
                State {
                    id: 12,
                    name: "Sumatera Utara".to_string(),
                },
                State {
                    id: 32,
                    name: "Jawa Barat".to_string(),
                },
            ])
        });
        api.expect_list_cities().returning(|state_id| {
            Ok(match state_id {
                12 => vec![City {
                    id: 1271,
                    name: "Kota Medan".to_string(),
                }],
                _ => vec![City {
                    id: 3273,
                    name: "Kota Bandung".to_string(),
                }],
            })
        });
        api
    }

    fn app_with(api: MockFamilyApi) -> App {
        App::new(
            Arc::new(api),
            TuiConfig::default(),
            "http://test".to_string(),
        )
    }

    /// Wait for and apply `n` background results
    async fn settle(app: &mut App, n: usize) {
        for _ in 0..n {
            let event = app.events_rx.recv().await.expect("event channel closed");
            app.handle_event(event);
        }
    }

    #[tokio::test]
    async fn test_start_with_id_opens_loaded_form() {
        let mut app = app_with(family_api());
        app.start(Some("fam-1".to_string()));
        assert_eq!(app.state.current_view, View::FamilyEdit);

        // states + record, then the cities requested by the record
        settle(&mut app, 3).await;
        assert_eq!(app.controller.form().name.as_text(), "Keluarga Siregar");
        assert_eq!(
            app.controller
                .selected_option(FieldId::City)
                .map(|o| o.label.as_str()),
            Some("Kota Medan")
        );
    }

    #[tokio::test]
    async fn test_successful_save_navigates_once_with_one_toast() {
        let mut api = family_api();
        api.expect_update_family()
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_list_families().times(1).returning(|page, limit| {
            Ok(FamilyPage {
                families: vec![create_test_family()],
                meta: PageMeta {
                    page,
                    limit,
                    total: 1,
                },
            })
        });

        let mut app = app_with(api);
        app.start(Some("fam-1".to_string()));
        settle(&mut app, 3).await;
        let history_before = app.state.view_history.len();

        app.handle_key(ctrl('s')).await.unwrap();
        assert!(app.controller.is_submitting());
        assert_eq!(app.state.current_view, View::FamilyEdit);

        settle(&mut app, 1).await;
        assert_eq!(app.state.current_view, View::FamilyList);
        assert_eq!(app.state.view_history.len(), history_before + 1);
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts.current().unwrap().kind, ToastKind::Success);
        assert_eq!(app.controller.family_id(), None);

        settle(&mut app, 1).await;
        assert_eq!(app.state.family_list.families().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_stays_on_form() {
        let mut api = family_api();
        api.expect_update_family().times(1).returning(|_, _| {
            Err(ApiError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            })
        });

        let mut app = app_with(api);
        app.start(Some("fam-1".to_string()));
        settle(&mut app, 3).await;
        let before = app.controller.form().clone();

        app.handle_key(ctrl('s')).await.unwrap();
        settle(&mut app, 1).await;

        assert_eq!(app.state.current_view, View::FamilyEdit);
        assert_eq!(app.controller.form(), &before);
        let toast = app.toasts.current().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "Gagal Menambahkan Data");
        assert!(!app.controller.is_submitting());
    }

    #[tokio::test]
    async fn test_keys_during_save_do_not_touch_draft() {
        let mut api = family_api();
        api.expect_update_family()
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_list_families()
            .returning(|_, _| Ok(FamilyPage::default()));

        let mut app = app_with(api);
        app.start(Some("fam-1".to_string()));
        settle(&mut app, 3).await;
        let before = app.controller.form().clone();

        app.handle_key(ctrl('s')).await.unwrap();
        app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.controller.form(), &before);
        assert_eq!(app.status_message.as_deref(), Some("Still saving..."));

        settle(&mut app, 1).await;
        assert_eq!(app.state.current_view, View::FamilyList);
        assert_eq!(app.toasts.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let mut api = family_api();
        api.expect_update_family().times(0);

        let mut app = app_with(api);
        app.start(Some("fam-1".to_string()));
        settle(&mut app, 3).await;

        // Clear the name
        for _ in 0.."Keluarga Siregar".len() {
            app.handle_key(key(KeyCode::Backspace)).await.unwrap();
        }
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::FamilyEdit);
        assert!(app.toasts.is_empty());
        assert_eq!(
            app.controller.visible_error(FieldId::Name),
            Some("Name is required")
        );
        assert!(app.status_message.is_some());
        assert_eq!(app.controller.form().active_field_id(), Some(FieldId::Name));
    }

    #[tokio::test]
    async fn test_picking_province_reloads_cities() {
        let mut app = app_with(family_api());
        app.start(Some("fam-1".to_string()));
        settle(&mut app, 3).await;

        app.controller.form_mut().set_active_field(FieldId::State.index());
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.state.picker.is_some());

        for c in "jawa".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).await.unwrap();

        assert!(app.state.picker.is_none());
        assert_eq!(app.controller.form().state.as_selected(), Some(32));
        assert_eq!(app.controller.form().city.as_selected(), None);
        assert!(app.controller.cities().is_loading());

        settle(&mut app, 1).await;
        assert_eq!(app.controller.cities().options()[0].label, "Kota Bandung");
    }

    #[tokio::test]
    async fn test_city_picker_requires_province() {
        let mut api = MockFamilyApi::new();
        api.expect_get_family().returning(|_| {
            Ok(Family {
                id: "fam-2".to_string(),
                ..Default::default()
            })
        });
        api.expect_list_states().returning(|_| Ok(vec![]));
        api.expect_list_cities().times(0);

        let mut app = app_with(api);
        app.start(Some("fam-2".to_string()));
        settle(&mut app, 2).await;

        app.controller.form_mut().set_active_field(FieldId::City.index());
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.state.picker.is_none());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Choose a Provinsi first")
        );
    }

    #[tokio::test]
    async fn test_escape_discards_draft_and_returns_to_list() {
        let mut api = family_api();
        api.expect_list_families()
            .returning(|_, _| Ok(FamilyPage::default()));

        let mut app = app_with(api);
        app.start(Some("fam-1".to_string()));
        settle(&mut app, 3).await;

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state.current_view, View::FamilyList);
        assert_eq!(app.controller.family_id(), None);
        assert!(matches!(app.state.family_list.load, ListLoad::Loading));
    }

    #[tokio::test]
    async fn test_list_enter_opens_selected_family() {
        let mut api = family_api();
        api.expect_list_families().returning(|_, _| {
            Ok(FamilyPage {
                families: vec![create_test_family()],
                meta: PageMeta::default(),
            })
        });

        let mut app = app_with(api);
        app.start(None);
        settle(&mut app, 1).await;

        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.state.current_view, View::FamilyEdit);
        assert_eq!(app.state.view_params.family_id.as_deref(), Some("fam-1"));
        assert_eq!(app.controller.family_id(), Some("fam-1"));
    }

    #[tokio::test]
    async fn test_failed_list_can_be_reloaded() {
        let mut api = MockFamilyApi::new();
        let mut calls = 0;
        api.expect_list_families().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(ApiError::NotFound)
            } else {
                Ok(FamilyPage::default())
            }
        });

        let mut app = app_with(api);
        app.start(None);
        settle(&mut app, 1).await;
        assert!(matches!(app.state.family_list.load, ListLoad::Failed(_)));

        app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
        settle(&mut app, 1).await;
        assert!(matches!(app.state.family_list.load, ListLoad::Loaded(_)));
    }

    #[tokio::test]
    async fn test_quit_from_list() {
        let mut api = MockFamilyApi::new();
        api.expect_list_families()
            .returning(|_, _| Ok(FamilyPage::default()));
        let mut app = app_with(api);
        app.start(None);
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_navigate_saves_history_and_go_back_skips_forms() {
        let mut api = MockFamilyApi::new();
        api.expect_list_families()
            .returning(|_, _| Ok(FamilyPage::default()));
        let mut app = app_with(api);

        app.navigate(View::FamilyEdit, ViewParams::family("fam-1"));
        assert_eq!(app.state.view_history.len(), 1);
        app.navigate(View::FamilyEdit, ViewParams::family("fam-2"));
        app.go_back();
        assert_eq!(app.state.current_view, View::FamilyList);
        assert!(app.state.view_history.is_empty());
    }
}
