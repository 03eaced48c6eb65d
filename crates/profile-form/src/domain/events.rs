//! Domain events for the profile form.

use profile_form_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::values::{FieldKey, FormValues, Gender, TextField};

/// Emitted when a form is mounted with one blank tech stack entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMounted {
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the initial tech stack entry.
    pub initial_entry_id: Uuid,
}

/// Emitted when a text field changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChanged {
    /// The form identifier.
    pub form_id: Uuid,
    /// The changed field.
    pub field: TextField,
    /// The new value.
    pub value: String,
}

/// Emitted when the gender selection changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderSelected {
    /// The form identifier.
    pub form_id: Uuid,
    /// The new selection; `None` clears it.
    pub gender: Option<Gender>,
}

/// Emitted when the user leaves a field without changing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTouched {
    /// The form identifier.
    pub form_id: Uuid,
    /// The touched field.
    pub field: FieldKey,
}

/// Emitted when a blank entry is inserted at the front of the tech stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechStackEntryAdded {
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the new entry.
    pub entry_id: Uuid,
}

/// Emitted when a tech stack entry's value changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechStackEntryChanged {
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the entry.
    pub entry_id: Uuid,
    /// The new value.
    pub value: String,
}

/// Emitted when a tech stack entry is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechStackEntryRemoved {
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the removed entry.
    pub entry_id: Uuid,
    /// Position the entry held when removed.
    pub position: usize,
}

/// Emitted when a submit is attempted while fields are invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionBlocked {
    /// The form identifier.
    pub form_id: Uuid,
    /// Paths of the fields that failed validation.
    pub invalid_fields: Vec<String>,
}

/// Emitted when a valid form starts submitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionStarted {
    /// The form identifier.
    pub form_id: Uuid,
    /// Identifies this submission attempt.
    pub submission_id: Uuid,
    /// Values handed to the submit gateway.
    pub values: FormValues,
}

/// Emitted when the submit gateway accepts the submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSucceeded {
    /// The form identifier.
    pub form_id: Uuid,
    /// The completed submission attempt.
    pub submission_id: Uuid,
    /// Values returned by the gateway.
    pub values: FormValues,
}

/// Emitted when the submit gateway reports an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionFailed {
    /// The form identifier.
    pub form_id: Uuid,
    /// The failed submission attempt.
    pub submission_id: Uuid,
    /// Error reported by the gateway.
    pub reason: String,
}

/// Emitted when a form is returned to its freshly mounted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormReset {
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the new initial tech stack entry.
    pub initial_entry_id: Uuid,
}

/// Emitted when a form is unmounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormUnmounted {
    /// The form identifier.
    pub form_id: Uuid,
}

/// Event type identifier for [`FormMounted`].
pub const FORM_MOUNTED_EVENT_TYPE: &str = "profile_form.form_mounted";

/// Event type identifier for [`FieldChanged`].
pub const FIELD_CHANGED_EVENT_TYPE: &str = "profile_form.field_changed";

/// Event type identifier for [`GenderSelected`].
pub const GENDER_SELECTED_EVENT_TYPE: &str = "profile_form.gender_selected";

/// Event type identifier for [`FieldTouched`].
pub const FIELD_TOUCHED_EVENT_TYPE: &str = "profile_form.field_touched";

/// Event type identifier for [`TechStackEntryAdded`].
pub const TECH_STACK_ENTRY_ADDED_EVENT_TYPE: &str = "profile_form.tech_stack_entry_added";

/// Event type identifier for [`TechStackEntryChanged`].
pub const TECH_STACK_ENTRY_CHANGED_EVENT_TYPE: &str = "profile_form.tech_stack_entry_changed";

/// Event type identifier for [`TechStackEntryRemoved`].
pub const TECH_STACK_ENTRY_REMOVED_EVENT_TYPE: &str = "profile_form.tech_stack_entry_removed";

/// Event type identifier for [`SubmissionBlocked`].
pub const SUBMISSION_BLOCKED_EVENT_TYPE: &str = "profile_form.submission_blocked";

/// Event type identifier for [`SubmissionStarted`].
pub const SUBMISSION_STARTED_EVENT_TYPE: &str = "profile_form.submission_started";

/// Event type identifier for [`SubmissionSucceeded`].
pub const SUBMISSION_SUCCEEDED_EVENT_TYPE: &str = "profile_form.submission_succeeded";

/// Event type identifier for [`SubmissionFailed`].
pub const SUBMISSION_FAILED_EVENT_TYPE: &str = "profile_form.submission_failed";

/// Event type identifier for [`FormReset`].
pub const FORM_RESET_EVENT_TYPE: &str = "profile_form.form_reset";

/// Event type identifier for [`FormUnmounted`].
pub const FORM_UNMOUNTED_EVENT_TYPE: &str = "profile_form.form_unmounted";

/// Event payload variants for the profile form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FormEventKind {
    /// The form has been mounted.
    FormMounted(FormMounted),
    /// A text field has changed.
    FieldChanged(FieldChanged),
    /// The gender selection has changed.
    GenderSelected(GenderSelected),
    /// A field has been touched.
    FieldTouched(FieldTouched),
    /// A tech stack entry has been added.
    TechStackEntryAdded(TechStackEntryAdded),
    /// A tech stack entry has changed.
    TechStackEntryChanged(TechStackEntryChanged),
    /// A tech stack entry has been removed.
    TechStackEntryRemoved(TechStackEntryRemoved),
    /// A submit was blocked by field errors.
    SubmissionBlocked(SubmissionBlocked),
    /// A submission has started.
    SubmissionStarted(SubmissionStarted),
    /// A submission has succeeded.
    SubmissionSucceeded(SubmissionSucceeded),
    /// A submission has failed.
    SubmissionFailed(SubmissionFailed),
    /// The form has been reset.
    FormReset(FormReset),
    /// The form has been unmounted.
    FormUnmounted(FormUnmounted),
}

impl FormEventKind {
    /// The event type identifier for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FormMounted(_) => FORM_MOUNTED_EVENT_TYPE,
            Self::FieldChanged(_) => FIELD_CHANGED_EVENT_TYPE,
            Self::GenderSelected(_) => GENDER_SELECTED_EVENT_TYPE,
            Self::FieldTouched(_) => FIELD_TOUCHED_EVENT_TYPE,
            Self::TechStackEntryAdded(_) => TECH_STACK_ENTRY_ADDED_EVENT_TYPE,
            Self::TechStackEntryChanged(_) => TECH_STACK_ENTRY_CHANGED_EVENT_TYPE,
            Self::TechStackEntryRemoved(_) => TECH_STACK_ENTRY_REMOVED_EVENT_TYPE,
            Self::SubmissionBlocked(_) => SUBMISSION_BLOCKED_EVENT_TYPE,
            Self::SubmissionStarted(_) => SUBMISSION_STARTED_EVENT_TYPE,
            Self::SubmissionSucceeded(_) => SUBMISSION_SUCCEEDED_EVENT_TYPE,
            Self::SubmissionFailed(_) => SUBMISSION_FAILED_EVENT_TYPE,
            Self::FormReset(_) => FORM_RESET_EVENT_TYPE,
            Self::FormUnmounted(_) => FORM_UNMOUNTED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the profile form.
#[derive(Debug, Clone)]
pub struct FormEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: FormEventKind,
}

impl DomainEvent for FormEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("FormEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
