//! Aggregate root for the profile form.

use std::collections::HashSet;

use profile_form_core::aggregate::AggregateRoot;
use profile_form_core::clock::Clock;
use profile_form_core::error::DomainError;
use profile_form_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    FieldChanged, FieldTouched, FormEvent, FormEventKind, FormMounted, FormReset, FormUnmounted,
    GenderSelected, SubmissionBlocked, SubmissionFailed, SubmissionStarted, SubmissionSucceeded,
    TechStackEntryAdded, TechStackEntryChanged, TechStackEntryRemoved,
};
use super::summary::Summary;
use super::validation::{FieldError, validate_all};
use super::values::{FieldKey, FormValues, Gender, TextField};

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Editable; nothing in flight.
    Idle,
    /// Waiting for the submit gateway. Edits and resubmits are rejected.
    Submitting {
        /// The in-flight submission.
        submission_id: Uuid,
    },
    /// The gateway accepted the values. The form is read-only until reset.
    Succeeded {
        /// The completed submission.
        submission_id: Uuid,
        /// The submitted values.
        values: FormValues,
    },
}

impl SubmissionStatus {
    /// Short lowercase name of the state.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting { .. } => "submitting",
            Self::Succeeded { .. } => "succeeded",
        }
    }
}

/// Result of asking a form to start submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStart {
    /// Every field was valid; these values go to the gateway.
    Started(FormValues),
    /// Submission was blocked by these field errors.
    Blocked(Vec<FieldError>),
}

/// Result of delivering a gateway completion to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The form moved to `succeeded`.
    Succeeded(Summary),
    /// The form returned to `idle` with the gateway's error recorded.
    Failed(String),
    /// The completion no longer matches the form (unmounted, reset or
    /// superseded) and was ignored.
    Discarded,
}

/// The aggregate root for one mounted profile form.
#[derive(Debug)]
pub struct ProfileForm {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    mounted: bool,
    values: FormValues,
    touched: HashSet<FieldKey>,
    submit_attempted: bool,
    status: SubmissionStatus,
    last_failure: Option<String>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<FormEvent>,
}

impl ProfileForm {
    /// Creates an empty, not yet mounted form.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            mounted: false,
            values: FormValues::default(),
            touched: HashSet::new(),
            submit_attempted: false,
            status: SubmissionStatus::Idle,
            last_failure: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Whether the form is currently mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Current field values.
    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current submission state.
    #[must_use]
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Error reported by the last failed submission, cleared on the next
    /// attempt.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Field errors currently visible: only for fields that were interacted
    /// with, or for every field once a submit has been attempted.
    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        validate_all(&self.values)
            .into_iter()
            .filter(|error| self.submit_attempted || self.touched.contains(&error.field))
            .collect()
    }

    /// Whether the remove affordance is offered for the entry at `position`.
    #[must_use]
    pub fn is_removable(&self, position: usize) -> bool {
        position > 0 && position < self.values.tech_stack.len()
    }

    /// The summary of submitted values, once the form has succeeded.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        match &self.status {
            SubmissionStatus::Succeeded { values, .. } => Some(Summary::of(values)),
            _ => None,
        }
    }

    /// Mounts the form with blank values and one tech stack entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the form has any history.
    pub fn mount(
        &mut self,
        initial_entry_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if !self.is_new() {
            return Err(DomainError::InvalidState(format!(
                "form {} already exists",
                self.id
            )));
        }
        self.record(
            FormEventKind::FormMounted(FormMounted {
                form_id: self.id,
                initial_entry_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Changes a text field.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the form is not mounted and
    /// `DomainError::InvalidState` if it is submitting or submitted.
    pub fn change_field(
        &mut self,
        field: TextField,
        value: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.record(
            FormEventKind::FieldChanged(FieldChanged {
                form_id: self.id,
                field,
                value,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Sets or clears the gender selection.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileForm::change_field`].
    pub fn select_gender(
        &mut self,
        gender: Option<Gender>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.record(
            FormEventKind::GenderSelected(GenderSelected {
                form_id: self.id,
                gender,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Marks a field as interacted with, without changing it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an unknown tech stack entry, plus
    /// the errors of [`ProfileForm::change_field`].
    pub fn touch_field(
        &mut self,
        field: FieldKey,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        if let FieldKey::TechStackEntry(entry_id) = field {
            self.ensure_entry(entry_id)?;
        }
        self.record(
            FormEventKind::FieldTouched(FieldTouched {
                form_id: self.id,
                field,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Inserts a blank tech stack entry at position 0.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `entry_id` is already in use, plus
    /// the errors of [`ProfileForm::change_field`].
    pub fn add_tech_stack_entry(
        &mut self,
        entry_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        if self.values.entry(entry_id).is_some() {
            return Err(DomainError::Validation(format!(
                "tech stack entry {entry_id} already exists"
            )));
        }
        self.record(
            FormEventKind::TechStackEntryAdded(TechStackEntryAdded {
                form_id: self.id,
                entry_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Changes the value of the tech stack entry with identity `entry_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an unknown entry, plus the errors
    /// of [`ProfileForm::change_field`].
    pub fn change_tech_stack_entry(
        &mut self,
        entry_id: Uuid,
        value: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        self.ensure_entry(entry_id)?;
        self.record(
            FormEventKind::TechStackEntryChanged(TechStackEntryChanged {
                form_id: self.id,
                entry_id,
                value,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Removes the tech stack entry at `position`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `position` is 0 or past the end of
    /// the list, plus the errors of [`ProfileForm::change_field`].
    pub fn remove_tech_stack_entry(
        &mut self,
        position: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        if position == 0 {
            return Err(DomainError::Validation(
                "the first tech stack entry cannot be removed".into(),
            ));
        }
        let Some(entry) = self.values.tech_stack.get(position) else {
            return Err(DomainError::Validation(format!(
                "no tech stack entry at position {position}"
            )));
        };
        let entry_id = entry.id;
        self.record(
            FormEventKind::TechStackEntryRemoved(TechStackEntryRemoved {
                form_id: self.id,
                entry_id,
                position,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Validates every field and, if all pass, moves `idle → submitting`.
    /// A blocked attempt is still recorded so that every field shows its
    /// error from then on.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the form is not mounted and
    /// `DomainError::InvalidState` if it is not idle.
    pub fn begin_submission(
        &mut self,
        submission_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<SubmissionStart, DomainError> {
        self.ensure_mounted()?;
        match self.status {
            SubmissionStatus::Idle => {}
            SubmissionStatus::Submitting { .. } => {
                return Err(DomainError::InvalidState(
                    "a submission is already in progress".into(),
                ));
            }
            SubmissionStatus::Succeeded { .. } => {
                return Err(DomainError::InvalidState(
                    "form has already been submitted".into(),
                ));
            }
        }

        let errors = validate_all(&self.values);
        if !errors.is_empty() {
            self.record(
                FormEventKind::SubmissionBlocked(SubmissionBlocked {
                    form_id: self.id,
                    invalid_fields: errors.iter().map(|e| e.path.clone()).collect(),
                }),
                correlation_id,
                clock,
            );
            return Ok(SubmissionStart::Blocked(errors));
        }

        let values = self.values.clone();
        self.record(
            FormEventKind::SubmissionStarted(SubmissionStarted {
                form_id: self.id,
                submission_id,
                values: values.clone(),
            }),
            correlation_id,
            clock,
        );
        Ok(SubmissionStart::Started(values))
    }

    /// Delivers the gateway's result for `submission_id`. Completions for a
    /// form that is unmounted or no longer waiting on that submission are
    /// discarded without recording anything.
    pub fn complete_submission(
        &mut self,
        submission_id: Uuid,
        result: Result<FormValues, String>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> CompletionOutcome {
        let pending = matches!(
            self.status,
            SubmissionStatus::Submitting { submission_id: id } if id == submission_id
        );
        if !self.mounted || !pending {
            return CompletionOutcome::Discarded;
        }

        match result {
            Ok(values) => {
                let summary = Summary::of(&values);
                self.record(
                    FormEventKind::SubmissionSucceeded(SubmissionSucceeded {
                        form_id: self.id,
                        submission_id,
                        values,
                    }),
                    correlation_id,
                    clock,
                );
                CompletionOutcome::Succeeded(summary)
            }
            Err(reason) => {
                self.record(
                    FormEventKind::SubmissionFailed(SubmissionFailed {
                        form_id: self.id,
                        submission_id,
                        reason: reason.clone(),
                    }),
                    correlation_id,
                    clock,
                );
                CompletionOutcome::Failed(reason)
            }
        }
    }

    /// Returns the form to its freshly mounted state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the form is not mounted and
    /// `DomainError::InvalidState` while a submission is in flight.
    pub fn reset(
        &mut self,
        initial_entry_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_mounted()?;
        if matches!(self.status, SubmissionStatus::Submitting { .. }) {
            return Err(DomainError::InvalidState(
                "cannot reset while a submission is in progress".into(),
            ));
        }
        self.record(
            FormEventKind::FormReset(FormReset {
                form_id: self.id,
                initial_entry_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Unmounts the form. Any in-flight submission is abandoned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the form is not mounted.
    pub fn unmount(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.ensure_mounted()?;
        self.record(
            FormEventKind::FormUnmounted(FormUnmounted { form_id: self.id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    fn ensure_mounted(&self) -> Result<(), DomainError> {
        if self.mounted {
            Ok(())
        } else {
            Err(DomainError::AggregateNotFound(self.id))
        }
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        self.ensure_mounted()?;
        match self.status {
            SubmissionStatus::Idle => Ok(()),
            SubmissionStatus::Submitting { .. } => {
                Err(DomainError::InvalidState("form is submitting".into()))
            }
            SubmissionStatus::Succeeded { .. } => Err(DomainError::InvalidState(
                "form has been submitted; reset it to edit again".into(),
            )),
        }
    }

    fn ensure_entry(&self, entry_id: Uuid) -> Result<(), DomainError> {
        if self.values.entry(entry_id).is_some() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "tech stack entry {entry_id} not found"
            )))
        }
    }

    /// Stamps `kind` into an event, applies it to in-memory state and queues
    /// it for persistence. `version` only moves on reconstitution.
    fn record(&mut self, kind: FormEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = FormEvent {
            metadata: EventMetadata::stamp(
                kind.event_type(),
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock,
            ),
            kind,
        };
        self.mutate(&event.kind);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &FormEventKind) {
        match kind {
            FormEventKind::FormMounted(FormMounted {
                initial_entry_id, ..
            })
            | FormEventKind::FormReset(FormReset {
                initial_entry_id, ..
            }) => {
                self.mounted = true;
                self.values = FormValues::initial(*initial_entry_id);
                self.touched.clear();
                self.submit_attempted = false;
                self.status = SubmissionStatus::Idle;
                self.last_failure = None;
            }
            FormEventKind::FieldChanged(payload) => {
                self.values.set_text(payload.field, payload.value.clone());
                self.touched.insert(FieldKey::Text(payload.field));
            }
            FormEventKind::GenderSelected(payload) => {
                self.values.gender = payload.gender;
                self.touched.insert(FieldKey::Gender);
            }
            FormEventKind::FieldTouched(payload) => {
                self.touched.insert(payload.field);
            }
            FormEventKind::TechStackEntryAdded(payload) => {
                self.values.prepend_entry(payload.entry_id);
            }
            FormEventKind::TechStackEntryChanged(payload) => {
                if let Some(entry) = self
                    .values
                    .tech_stack
                    .iter_mut()
                    .find(|entry| entry.id == payload.entry_id)
                {
                    entry.value.clone_from(&payload.value);
                }
                self.touched.insert(FieldKey::TechStackEntry(payload.entry_id));
            }
            FormEventKind::TechStackEntryRemoved(payload) => {
                if let Some(position) = self.values.position_of(payload.entry_id) {
                    self.values.remove_entry(position);
                }
                self.touched
                    .remove(&FieldKey::TechStackEntry(payload.entry_id));
            }
            FormEventKind::SubmissionBlocked(_) => {
                self.submit_attempted = true;
            }
            FormEventKind::SubmissionStarted(payload) => {
                self.submit_attempted = true;
                self.last_failure = None;
                self.status = SubmissionStatus::Submitting {
                    submission_id: payload.submission_id,
                };
            }
            FormEventKind::SubmissionSucceeded(payload) => {
                self.status = SubmissionStatus::Succeeded {
                    submission_id: payload.submission_id,
                    values: payload.values.clone(),
                };
            }
            FormEventKind::SubmissionFailed(payload) => {
                self.status = SubmissionStatus::Idle;
                self.last_failure = Some(payload.reason.clone());
            }
            FormEventKind::FormUnmounted(_) => {
                self.mounted = false;
            }
        }
    }
}

impl AggregateRoot for ProfileForm {
    type Event = FormEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
