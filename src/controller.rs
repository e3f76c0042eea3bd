//! Family edit form controller
//!
//! Owns the draft of a family record, its validation errors and the two
//! locality option lists (provinces, and cities of the selected province).
//! The controller never performs I/O for fetches itself: operations that
//! need data return [`Fetch`] requests, the caller runs them and hands the
//! results back through the `apply_*` methods. Saving works the same way:
//! `begin_submit` hands out the update to send and `finish_submit` applies
//! its result.

use crate::api::ApiError;
use crate::state::{
    City, DependentOptions, ErrorMap, Family, FamilyForm, FamilyUpdate, FetchTicket, FieldId,
    Notifier, OptionList, Schema, SelectOption, State,
};
use std::collections::BTreeSet;

/// Shown after a successful save
pub const SAVE_SUCCESS_MESSAGE: &str = "Success Mengupdate Data";
/// Shown after a failed save
pub const SAVE_ERROR_MESSAGE: &str = "Gagal Menambahkan Data";

/// A request the caller must run and feed back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Record(String),
    States(i64),
    Cities(FetchTicket),
}

/// Load state of the record being edited
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecordState {
    #[default]
    Idle,
    Loading,
    Loaded(Family),
    NotFound,
    Failed(String),
}

/// A validated update waiting to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub id: String,
    pub update: FamilyUpdate,
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Validation failed; nothing was sent
    Rejected,
    /// The record has not been loaded; nothing was sent
    NotReady,
    /// Another submit is still outstanding
    Busy,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FamilyFormController {
    family_id: Option<String>,
    record: RecordState,
    form: FamilyForm,
    schema: Schema,
    errors: ErrorMap,
    touched: BTreeSet<FieldId>,
    submit_attempted: bool,
    submitting: bool,
    country_id: i64,
    states: OptionList,
    cities: DependentOptions,
}

impl FamilyFormController {
    pub fn new(country_id: i64) -> Self {
        let form = FamilyForm::new();
        let schema = Schema::family();
        let errors = schema.validate(&form);
        Self {
            family_id: None,
            record: RecordState::Idle,
            form,
            schema,
            errors,
            touched: BTreeSet::new(),
            submit_attempted: false,
            submitting: false,
            country_id,
            states: OptionList::Idle,
            cities: DependentOptions::default(),
        }
    }

    /// Start editing the given family.
    ///
    /// The province list is requested once per controller. The record is
    /// requested only when an identifier is present and differs from the one
    /// already being edited.
    pub fn mount(&mut self, family_id: Option<String>) -> Vec<Fetch> {
        let mut fetches = Vec::new();
        if matches!(self.states, OptionList::Idle | OptionList::Failed(_)) {
            self.states = OptionList::Loading;
            fetches.push(Fetch::States(self.country_id));
        }

        let Some(id) = family_id else {
            return fetches;
        };
        if self.family_id.as_deref() == Some(id.as_str()) {
            return fetches;
        }

        tracing::debug!("Loading family {id}");
        self.reset_draft();
        self.family_id = Some(id.clone());
        self.record = RecordState::Loading;
        fetches.push(Fetch::Record(id));
        fetches
    }

    fn reset_draft(&mut self) {
        self.form = FamilyForm::new();
        self.touched.clear();
        self.submit_attempted = false;
        self.cities.set_parent(None);
        self.validate();
    }

    /// Apply a fetched record. Responses for another identifier, or for a
    /// record already synced, are ignored.
    pub fn apply_record(&mut self, id: &str, result: Result<Family, ApiError>) -> Vec<Fetch> {
        if self.family_id.as_deref() != Some(id) || self.record != RecordState::Loading {
            tracing::debug!("Ignoring record response for {id}");
            return Vec::new();
        }

        match result {
            Ok(family) => {
                self.form = FamilyForm::from_family(&family);
                self.record = RecordState::Loaded(family);
                self.validate();
                self.cities
                    .set_parent(self.form.state.as_selected())
                    .map(Fetch::Cities)
                    .into_iter()
                    .collect()
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("Family {id} not found");
                self.record = RecordState::NotFound;
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to load family {id}: {e}");
                self.record = RecordState::Failed(e.to_string());
                Vec::new()
            }
        }
    }

    pub fn apply_states(&mut self, result: Result<Vec<State>, ApiError>) {
        self.states = match result {
            Ok(states) => OptionList::Loaded(states.iter().map(SelectOption::from).collect()),
            Err(e) => {
                tracing::warn!("Failed to load provinces: {e}");
                OptionList::Failed(e.to_string())
            }
        };
    }

    /// Apply a fetched city list. Returns `false` when the result belongs to
    /// a province that is no longer selected.
    pub fn apply_cities(&mut self, ticket: FetchTicket, result: Result<Vec<City>, ApiError>) -> bool {
        let result = result
            .map(|cities| cities.iter().map(SelectOption::from).collect())
            .map_err(|e| e.to_string());
        let applied = self.cities.apply(ticket, result);
        if !applied {
            tracing::debug!(
                "Discarding stale cities for province {} (generation {}), current is {:?} (generation {})",
                ticket.parent,
                ticket.generation,
                self.cities.parent(),
                self.cities.generation()
            );
        }
        applied
    }

    /// Re-issue every fetch that ended in failure
    pub fn retry(&mut self) -> Vec<Fetch> {
        let mut fetches = Vec::new();
        if matches!(self.states, OptionList::Failed(_)) {
            self.states = OptionList::Loading;
            fetches.push(Fetch::States(self.country_id));
        }
        if let (RecordState::Failed(_), Some(id)) = (&self.record, &self.family_id) {
            self.record = RecordState::Loading;
            fetches.push(Fetch::Record(id.clone()));
        }
        if matches!(self.cities.list(), OptionList::Failed(_)) {
            fetches.extend(self.cities.retry().map(Fetch::Cities));
        }
        fetches
    }

    /// Re-run the schema over the whole draft
    pub fn validate(&mut self) {
        self.errors = self.schema.validate(&self.form);
    }

    /// Type into the focused text field
    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.form.active_field_id() {
            self.form.field_mut(field).push_char(c);
            self.touched.insert(field);
            self.validate();
        }
    }

    /// Delete from the focused text field
    pub fn backspace(&mut self) {
        if let Some(field) = self.form.active_field_id() {
            self.form.field_mut(field).pop_char();
            self.touched.insert(field);
            self.validate();
        }
    }

    /// Choose a value for a select field.
    ///
    /// Changing the province clears the chosen city and points the city list
    /// at the new province; the returned fetch must be issued by the caller.
    pub fn select(&mut self, field: FieldId, value: Option<i64>) -> Option<Fetch> {
        if !self.form.field(field).is_select() {
            return None;
        }
        let previous = self.form.field(field).as_selected();
        self.form.field_mut(field).set_selected(value);
        self.touched.insert(field);

        let fetch = if field == FieldId::State && previous != value {
            self.form.city.set_selected(None);
            self.touched.insert(FieldId::City);
            self.cities.set_parent(value).map(Fetch::Cities)
        } else {
            None
        };

        self.validate();
        fetch
    }

    /// Validate the draft and, when it may be sent, mark a save as in flight.
    ///
    /// The returned update must be sent by the caller and its result fed to
    /// [`finish_submit`](Self::finish_submit). Until then further attempts
    /// return `Busy`.
    pub fn begin_submit(&mut self) -> Result<PendingSave, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }
        self.submit_attempted = true;
        self.validate();

        let id = match (&self.record, &self.family_id) {
            (RecordState::Loaded(_), Some(id)) => id.clone(),
            _ => return Err(SubmitOutcome::NotReady),
        };
        if !self.errors.is_empty() {
            tracing::debug!("Submit blocked by {} invalid field(s)", self.errors.len());
            return Err(SubmitOutcome::Rejected);
        }
        let Some(update) = self.form.to_update() else {
            return Err(SubmitOutcome::Rejected);
        };

        self.submitting = true;
        Ok(PendingSave { id, update })
    }

    /// Apply the result of a save started by `begin_submit`.
    ///
    /// Failures are reported through `notifier` and leave the draft as it was.
    /// Returns `None` for a result that does not belong to the save in flight.
    pub fn finish_submit(
        &mut self,
        id: &str,
        result: Result<(), ApiError>,
        notifier: &mut dyn Notifier,
    ) -> Option<SubmitOutcome> {
        if !self.submitting || self.family_id.as_deref() != Some(id) {
            tracing::debug!("Ignoring save result for {id}");
            return None;
        }
        self.submitting = false;

        let outcome = match result {
            Ok(()) => {
                tracing::info!("Updated family {id}");
                notifier.notify_success(SAVE_SUCCESS_MESSAGE);
                SubmitOutcome::Saved
            }
            Err(e) => {
                tracing::warn!("Failed to update family {id}: {e}");
                notifier.notify_error(SAVE_ERROR_MESSAGE);
                SubmitOutcome::Failed(e.to_string())
            }
        };
        Some(outcome)
    }

    pub fn family_id(&self) -> Option<&str> {
        self.family_id.as_deref()
    }

    pub fn record(&self) -> &RecordState {
        &self.record
    }

    pub fn form(&self) -> &FamilyForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FamilyForm {
        &mut self.form
    }

    /// Every current validation error
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// The error to show next to a field: only once the field was edited or
    /// a submit was attempted
    pub fn visible_error(&self, field: FieldId) -> Option<&str> {
        if self.submit_attempted || self.touched.contains(&field) {
            self.errors.get(&field).map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_required(&self, field: FieldId) -> bool {
        self.schema.is_constrained(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn states(&self) -> &OptionList {
        &self.states
    }

    pub fn cities(&self) -> &OptionList {
        self.cities.list()
    }

    /// Option list backing a select field
    pub fn options_for(&self, field: FieldId) -> &OptionList {
        match field {
            FieldId::City => self.cities(),
            _ => self.states(),
        }
    }

    /// The option matching a select field's value, if the list has it
    pub fn selected_option(&self, field: FieldId) -> Option<&SelectOption> {
        self.options_for(field)
            .find(self.form.field(field).as_selected())
    }
}
