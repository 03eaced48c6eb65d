//! Query handlers for the profile form.
//!
//! This module reconstitutes forms from stored events and returns the
//! read-only view the page renders from.

use profile_form_core::error::{DomainError, FieldViolation};
use profile_form_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::{ProfileForm, SubmissionStatus};
use crate::domain::summary::Summary;
use crate::domain::values::{FormValues, Gender};

/// One tech stack entry as displayed.
#[derive(Debug, Clone, Serialize)]
pub struct TechStackEntryView {
    /// Stable identity of the entry.
    pub entry_id: Uuid,
    /// Current position.
    pub position: usize,
    /// Entered value.
    pub value: String,
    /// Whether the remove affordance is offered.
    pub removable: bool,
    /// Error shown under the entry, if any.
    pub error: Option<String>,
}

/// Read-only view of a mounted profile form.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    /// The form identifier.
    pub form_id: Uuid,
    /// Current version (event count).
    pub version: i64,
    /// `idle`, `submitting` or `succeeded`.
    pub status: &'static str,
    /// Whether the submit control is disabled and shows its loading state.
    pub submitting: bool,
    /// Current field values.
    pub values: FormValues,
    /// Tech stack entries in display order.
    pub tech_stack: Vec<TechStackEntryView>,
    /// Visible field errors.
    pub errors: Vec<FieldViolation>,
    /// Error reported by the last failed submission.
    pub last_failure: Option<String>,
    /// Summary of submitted values, present once the form has succeeded.
    pub summary: Option<Summary>,
}

impl FormView {
    /// Error shown for the field at `path`, if any.
    #[must_use]
    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|violation| violation.field == path)
            .map(|violation| violation.message.as_str())
    }

    /// The selected gender option.
    #[must_use]
    pub fn gender(&self) -> Option<Gender> {
        self.values.gender
    }
}

fn view_of(form: &ProfileForm) -> FormView {
    let errors: Vec<FieldViolation> = form.errors().iter().map(|e| e.to_violation()).collect();

    let tech_stack = form
        .values()
        .tech_stack
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let path = format!("techStack.{position}.value");
            TechStackEntryView {
                entry_id: entry.id,
                position,
                value: entry.value.clone(),
                removable: form.is_removable(position),
                error: errors
                    .iter()
                    .find(|violation| violation.field == path)
                    .map(|violation| violation.message.clone()),
            }
        })
        .collect();

    FormView {
        form_id: form.id,
        version: form.version,
        status: form.status().name(),
        submitting: matches!(form.status(), SubmissionStatus::Submitting { .. }),
        values: form.values().clone(),
        tech_stack,
        errors,
        last_failure: form.last_failure().map(str::to_owned),
        summary: form.summary(),
    }
}

/// Retrieves a mounted form by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID or
/// the form has been unmounted.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_form_by_id(
    form_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<FormView, DomainError> {
    let form = command_handlers::load_form(form_id, repo).await?;
    if !form.is_mounted() {
        return Err(DomainError::AggregateNotFound(form_id));
    }
    Ok(view_of(&form))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use profile_form_core::aggregate::AggregateRoot;
    use profile_form_core::error::DomainError;
    use profile_form_core::repository::StoredEvent;
    use uuid::Uuid;

    use crate::application::query_handlers::get_form_by_id;
    use crate::domain::aggregates::ProfileForm;
    use crate::domain::values::TextField;
    use profile_form_test_support::{EmptyEventRepository, FixedClock, RecordingEventRepository};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn stored(form: &ProfileForm) -> Vec<StoredEvent> {
        form.uncommitted_events()
            .iter()
            .map(StoredEvent::from_event)
            .collect()
    }

    #[tokio::test]
    async fn test_get_form_by_id_returns_view() {
        // Arrange
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let added = Uuid::new_v4();
        let mut form = ProfileForm::new(form_id);
        form.mount(first_entry, Uuid::new_v4(), &clock()).unwrap();
        form.add_tech_stack_entry(added, Uuid::new_v4(), &clock())
            .unwrap();
        form.change_field(
            TextField::FirstName,
            "Jon".to_owned(),
            Uuid::new_v4(),
            &clock(),
        )
        .unwrap();
        let repo = RecordingEventRepository::new(stored(&form));

        // Act
        let view = get_form_by_id(form_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.form_id, form_id);
        assert_eq!(view.version, 3);
        assert_eq!(view.status, "idle");
        assert!(!view.submitting);
        assert_eq!(view.tech_stack.len(), 2);
        assert_eq!(view.tech_stack[0].entry_id, added);
        assert!(!view.tech_stack[0].removable);
        assert!(view.tech_stack[1].removable);
        assert_eq!(view.error_for("firstName"), Some("Minimum length should be 4"));
        assert_eq!(view.errors.len(), 1);
        assert!(view.summary.is_none());
    }

    #[tokio::test]
    async fn test_get_form_by_id_returns_not_found_for_empty_stream() {
        let form_id = Uuid::new_v4();

        let result = get_form_by_id(form_id, &EmptyEventRepository).await;

        match result {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, form_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_form_by_id_returns_not_found_after_unmount() {
        let form_id = Uuid::new_v4();
        let mut form = ProfileForm::new(form_id);
        form.mount(Uuid::new_v4(), Uuid::new_v4(), &clock()).unwrap();
        form.unmount(Uuid::new_v4(), &clock()).unwrap();
        let repo = RecordingEventRepository::new(stored(&form));

        let result = get_form_by_id(form_id, &repo).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
