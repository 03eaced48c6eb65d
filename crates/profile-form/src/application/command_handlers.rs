//! Command handlers for the profile form.
//!
//! Each handler loads the form from its event stream, runs one domain
//! method, and appends the resulting events. Submission is split in two so
//! callers can return to the user while the gateway call is in flight:
//! [`handle_begin_submission`] validates and moves the form to
//! `submitting`, [`handle_complete_submission`] awaits the gateway and
//! applies its result.

use profile_form_core::aggregate::AggregateRoot;
use profile_form_core::clock::Clock;
use profile_form_core::command::Command;
use profile_form_core::error::DomainError;
use profile_form_core::gateway::SubmitGateway;
use profile_form_core::repository::{EventRepository, StoredEvent};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::aggregates::{CompletionOutcome, ProfileForm, SubmissionStart};
use crate::domain::commands::{
    AddTechStackEntry, ChangeField, ChangeTechStackEntry, MountForm, RemoveTechStackEntry,
    ResetForm, SelectGender, SubmitForm, TouchField, UnmountForm,
};
use crate::domain::events::{FormEvent, FormEventKind};
use crate::domain::values::FormValues;

/// How many times a completion reloads the form after losing an append race.
const COMPLETION_ATTEMPTS: usize = 3;

/// A submission that passed validation and is waiting on the gateway.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    /// The submitting form.
    pub form_id: Uuid,
    /// Identifies this submission attempt.
    pub submission_id: Uuid,
    /// Correlation ID of the submit command.
    pub correlation_id: Uuid,
    /// Values to hand to the gateway.
    pub values: FormValues,
    /// Events persisted when the submission started.
    pub events: Vec<StoredEvent>,
}

/// What happened when a gateway completion was delivered.
#[derive(Debug, Clone)]
pub struct SubmissionReport {
    /// Outcome applied to the form.
    pub outcome: CompletionOutcome,
    /// Events persisted; empty when the completion was discarded.
    pub events: Vec<StoredEvent>,
}

/// Reconstitutes a `ProfileForm` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    form_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<ProfileForm, DomainError> {
    let mut form = ProfileForm::new(form_id);
    for stored in existing_events {
        let kind: FormEventKind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })?;
        let event = FormEvent {
            metadata: stored.metadata(),
            kind,
        };
        form.apply(&event);
    }
    Ok(form)
}

/// Loads a form that has at least one event.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an empty stream, plus any
/// repository or deserialization error.
pub(crate) async fn load_form(
    form_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<ProfileForm, DomainError> {
    let existing_events = repo.load_events(form_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(form_id));
    }
    reconstitute(form_id, &existing_events)
}

async fn persist(
    form: &mut ProfileForm,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = form
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_event)
        .collect();

    if !stored_events.is_empty() {
        repo.append_events(form.id, form.version(), &stored_events)
            .await?;
    }
    form.clear_uncommitted_events();

    Ok(stored_events)
}

/// Loads the command's form, runs `operation` on it and persists the result.
async fn execute<C, F>(
    command: &C,
    repo: &dyn EventRepository,
    operation: F,
) -> Result<Vec<StoredEvent>, DomainError>
where
    C: Command,
    F: FnOnce(&mut ProfileForm) -> Result<(), DomainError> + Send,
{
    debug!(
        command_type = command.command_type(),
        form_id = %command.form_id(),
        correlation_id = %command.correlation_id(),
        "executing command"
    );
    let mut form = load_form(command.form_id(), repo).await?;
    operation(&mut form)?;
    persist(&mut form, repo).await
}

/// Handles the `MountForm` command: creates a fresh form with one blank tech
/// stack entry.
///
/// # Errors
///
/// Returns `DomainError::ConcurrencyConflict` if the form id is already in
/// use, or any repository error.
pub async fn handle_mount_form(
    command: &MountForm,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut form = ProfileForm::new(command.form_id);
    form.mount(command.initial_entry_id, command.correlation_id, clock)?;
    persist(&mut form, repo).await
}

/// Handles the `ChangeField` command.
///
/// # Errors
///
/// Returns `DomainError` if the form is missing or locked, or the repository
/// fails.
pub async fn handle_change_field(
    command: &ChangeField,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.change_field(
            command.field,
            command.value.clone(),
            command.correlation_id,
            clock,
        )
    })
    .await
}

/// Handles the `SelectGender` command.
///
/// # Errors
///
/// Returns `DomainError` if the form is missing or locked, or the repository
/// fails.
pub async fn handle_select_gender(
    command: &SelectGender,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.select_gender(command.gender, command.correlation_id, clock)
    })
    .await
}

/// Handles the `TouchField` command.
///
/// # Errors
///
/// Returns `DomainError` if the form is missing or locked, the entry is
/// unknown, or the repository fails.
pub async fn handle_touch_field(
    command: &TouchField,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.touch_field(command.field, command.correlation_id, clock)
    })
    .await
}

/// Handles the `AddTechStackEntry` command.
///
/// # Errors
///
/// Returns `DomainError` if the form is missing or locked, the entry id is
/// taken, or the repository fails.
pub async fn handle_add_tech_stack_entry(
    command: &AddTechStackEntry,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.add_tech_stack_entry(command.entry_id, command.correlation_id, clock)
    })
    .await
}

/// Handles the `ChangeTechStackEntry` command.
///
/// # Errors
///
/// Returns `DomainError` if the form is missing or locked, the entry is
/// unknown, or the repository fails.
pub async fn handle_change_tech_stack_entry(
    command: &ChangeTechStackEntry,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.change_tech_stack_entry(
            command.entry_id,
            command.value.clone(),
            command.correlation_id,
            clock,
        )
    })
    .await
}

/// Handles the `RemoveTechStackEntry` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for position 0 or a position past the
/// end, plus the errors of the other field handlers.
pub async fn handle_remove_tech_stack_entry(
    command: &RemoveTechStackEntry,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.remove_tech_stack_entry(command.position, command.correlation_id, clock)
    })
    .await
}

/// Handles the `ResetForm` command.
///
/// # Errors
///
/// Returns `DomainError` if the form is missing or submitting, or the
/// repository fails.
pub async fn handle_reset_form(
    command: &ResetForm,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    execute(command, repo, |form| {
        form.reset(command.initial_entry_id, command.correlation_id, clock)
    })
    .await
}

/// Handles the `UnmountForm` command: records the unmount, then deletes the
/// form's stream so none of its values outlive it.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the form is not mounted,
/// `DomainError::ConcurrencyConflict` if another command lands between the
/// append and the delete, or any repository error.
pub async fn handle_unmount_form(
    command: &UnmountForm,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events = execute(command, repo, |form| {
        form.unmount(command.correlation_id, clock)
    })
    .await?;

    if let Some(last) = stored_events.last() {
        repo.delete_stream(command.form_id, last.sequence_number)
            .await?;
        info!(form_id = %command.form_id, "form stream deleted");
    }

    Ok(stored_events)
}

/// Handles the first half of `SubmitForm`: validates every field and moves
/// the form to `submitting`.
///
/// # Errors
///
/// Returns `DomainError::InvalidFields` when validation blocks the submit
/// (the blocked attempt is still persisted), `DomainError::InvalidState` if
/// the form is not idle, or any repository error.
pub async fn handle_begin_submission(
    command: &SubmitForm,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<PendingSubmission, DomainError> {
    let mut form = load_form(command.form_id, repo).await?;
    let start = form.begin_submission(command.submission_id, command.correlation_id, clock)?;
    let events = persist(&mut form, repo).await?;

    match start {
        SubmissionStart::Started(values) => Ok(PendingSubmission {
            form_id: command.form_id,
            submission_id: command.submission_id,
            correlation_id: command.correlation_id,
            values,
            events,
        }),
        SubmissionStart::Blocked(errors) => Err(DomainError::InvalidFields(
            errors.iter().map(|e| e.to_violation()).collect(),
        )),
    }
}

/// Handles the second half of `SubmitForm`: awaits the gateway, then applies
/// its result to the form. A completion for a form that was unmounted, reset
/// or resubmitted in the meantime is discarded.
///
/// # Errors
///
/// Returns `DomainError` if reloading or appending fails. Gateway errors are
/// not returned; they are recorded on the form as a failed submission.
pub async fn handle_complete_submission(
    pending: PendingSubmission,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    gateway: &dyn SubmitGateway<FormValues>,
) -> Result<SubmissionReport, DomainError> {
    let PendingSubmission {
        form_id,
        submission_id,
        correlation_id,
        values,
        ..
    } = pending;

    let result = gateway.submit(values).await.map_err(|e| e.to_string());

    let mut attempt = 1;
    loop {
        let existing_events = repo.load_events(form_id).await?;
        if existing_events.is_empty() {
            warn!(%form_id, %submission_id, "discarding completion for unknown form");
            return Ok(SubmissionReport {
                outcome: CompletionOutcome::Discarded,
                events: Vec::new(),
            });
        }
        let mut form = reconstitute(form_id, &existing_events)?;
        let outcome =
            form.complete_submission(submission_id, result.clone(), correlation_id, clock);

        match persist(&mut form, repo).await {
            Ok(events) => {
                match &outcome {
                    CompletionOutcome::Succeeded(_) => {
                        info!(%form_id, %submission_id, "submission succeeded");
                    }
                    CompletionOutcome::Failed(reason) => {
                        warn!(%form_id, %submission_id, %reason, "submission failed");
                    }
                    CompletionOutcome::Discarded => {
                        warn!(%form_id, %submission_id, "discarding stale submission completion");
                    }
                }
                return Ok(SubmissionReport { outcome, events });
            }
            Err(DomainError::ConcurrencyConflict { .. }) if attempt < COMPLETION_ATTEMPTS => {
                debug!(%form_id, attempt, "completion lost an append race; reloading");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Handles `SubmitForm` end to end: begins the submission and waits for the
/// gateway to complete it.
///
/// # Errors
///
/// Returns the errors of [`handle_begin_submission`] and
/// [`handle_complete_submission`].
pub async fn handle_submit_form(
    command: &SubmitForm,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    gateway: &dyn SubmitGateway<FormValues>,
) -> Result<SubmissionReport, DomainError> {
    let pending = handle_begin_submission(command, clock, repo).await?;
    handle_complete_submission(pending, clock, repo, gateway).await
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::values::{Gender, TextField};
    use profile_form_test_support::{
        EmptyEventRepository, FailingEventRepository, FailingSubmitGateway, FixedClock,
        RecordingEventRepository, RecordingSubmitGateway,
    };

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    /// Builds the stored history of a form by running `arrange` on a freshly
    /// mounted aggregate.
    fn history(
        form_id: Uuid,
        first_entry: Uuid,
        arrange: impl FnOnce(&mut ProfileForm),
    ) -> Vec<StoredEvent> {
        let mut form = ProfileForm::new(form_id);
        form.mount(first_entry, Uuid::new_v4(), &clock()).unwrap();
        arrange(&mut form);
        form.uncommitted_events().iter().map(StoredEvent::from_event).collect()
    }

    fn fill_valid(form: &mut ProfileForm, first_entry: Uuid) {
        let clock = clock();
        let cid = Uuid::new_v4();
        form.change_field(TextField::FirstName, "Johnathan".into(), cid, &clock)
            .unwrap();
        form.change_field(TextField::LastName, "Doe".into(), cid, &clock)
            .unwrap();
        form.change_field(TextField::Email, "a@b.com".into(), cid, &clock)
            .unwrap();
        form.change_field(TextField::PhoneNumber, "9876543210".into(), cid, &clock)
            .unwrap();
        form.change_field(TextField::DateOfBirth, "2000-01-01".into(), cid, &clock)
            .unwrap();
        form.select_gender(Some(Gender::Male), cid, &clock).unwrap();
        form.change_tech_stack_entry(first_entry, "Go".into(), cid, &clock)
            .unwrap();
    }

    #[tokio::test]
    async fn test_handle_mount_form_persists_form_mounted_event() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let form_id = Uuid::new_v4();
        let clock = clock();
        let repo = RecordingEventRepository::new(Vec::new());
        let command = MountForm {
            correlation_id,
            form_id,
            initial_entry_id: Uuid::new_v4(),
        };

        // Act
        let result = handle_mount_form(&command, &clock, &repo).await;

        // Assert
        assert!(result.is_ok());

        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);

        let (agg_id, expected_version, events) = &appended[0];
        assert_eq!(*agg_id, form_id);
        assert_eq!(*expected_version, 0);
        assert_eq!(events.len(), 1);

        let stored = &events[0];
        assert_eq!(stored.event_type, "profile_form.form_mounted");
        assert_eq!(stored.sequence_number, 1);
        assert_eq!(stored.correlation_id, correlation_id);
        assert_eq!(stored.causation_id, correlation_id);
        assert_eq!(stored.occurred_at, clock.0);
    }

    #[tokio::test]
    async fn test_handle_change_field_appends_after_existing_history() {
        // Arrange
        let form_id = Uuid::new_v4();
        let existing = history(form_id, Uuid::new_v4(), |_| {});
        let repo = RecordingEventRepository::new(existing);
        let command = ChangeField {
            correlation_id: Uuid::new_v4(),
            form_id,
            field: TextField::LastName,
            value: "Doe".to_owned(),
        };

        // Act
        let events = handle_change_field(&command, &clock(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "profile_form.field_changed");
        assert_eq!(events[0].sequence_number, 2);

        let (_, expected_version, _) = &repo.appended_events()[0];
        assert_eq!(*expected_version, 1);
    }

    #[tokio::test]
    async fn test_handle_change_field_on_missing_form_returns_not_found() {
        let form_id = Uuid::new_v4();
        let command = ChangeField {
            correlation_id: Uuid::new_v4(),
            form_id,
            field: TextField::Email,
            value: "a@b.com".to_owned(),
        };

        let result = handle_change_field(&command, &clock(), &EmptyEventRepository).await;

        match result {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, form_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_select_gender_propagates_repository_failure() {
        let command = SelectGender {
            correlation_id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            gender: Some(Gender::Other),
        };

        let result = handle_select_gender(&command, &clock(), &FailingEventRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_add_tech_stack_entry_persists_entry_added_event() {
        let form_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(history(form_id, Uuid::new_v4(), |_| {}));
        let entry_id = Uuid::new_v4();
        let command = AddTechStackEntry {
            correlation_id: Uuid::new_v4(),
            form_id,
            entry_id,
        };

        let events = handle_add_tech_stack_entry(&command, &clock(), &repo)
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "profile_form.tech_stack_entry_added");
        assert_eq!(events[0].payload["TechStackEntryAdded"]["entry_id"], entry_id.to_string());
    }

    #[tokio::test]
    async fn test_handle_remove_tech_stack_entry_rejects_position_zero() {
        // Arrange
        let form_id = Uuid::new_v4();
        let existing = history(form_id, Uuid::new_v4(), |form| {
            form.add_tech_stack_entry(Uuid::new_v4(), Uuid::new_v4(), &clock())
                .unwrap();
        });
        let repo = RecordingEventRepository::new(existing);
        let command = RemoveTechStackEntry {
            correlation_id: Uuid::new_v4(),
            form_id,
            position: 0,
        };

        // Act
        let result = handle_remove_tech_stack_entry(&command, &clock(), &repo).await;

        // Assert
        match result {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "the first tech stack entry cannot be removed");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_unmount_form_deletes_stream_after_recording_unmount() {
        // Arrange
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let repo = RecordingEventRepository::new(history(form_id, first_entry, |form| {
            fill_valid(form, first_entry);
        }));
        let command = UnmountForm {
            correlation_id: Uuid::new_v4(),
            form_id,
        };

        // Act
        let events = handle_unmount_form(&command, &clock(), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "profile_form.form_unmounted");
        assert_eq!(events[0].sequence_number, 9);
        assert_eq!(repo.deleted_streams(), vec![(form_id, 9)]);
    }

    #[tokio::test]
    async fn test_handle_unmount_form_on_missing_form_deletes_nothing() {
        let repo = RecordingEventRepository::new(Vec::new());
        let command = UnmountForm {
            correlation_id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
        };

        let result = handle_unmount_form(&command, &clock(), &repo).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
        assert!(repo.appended_events().is_empty());
        assert!(repo.deleted_streams().is_empty());
    }

    #[tokio::test]
    async fn test_handle_begin_submission_blocks_and_reports_the_empty_field() {
        // Arrange
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let existing = history(form_id, first_entry, |form| {
            fill_valid(form, first_entry);
            form.change_field(TextField::Email, String::new(), Uuid::new_v4(), &clock())
                .unwrap();
        });
        let repo = RecordingEventRepository::new(existing);
        let command = SubmitForm {
            correlation_id: Uuid::new_v4(),
            form_id,
            submission_id: Uuid::new_v4(),
        };

        // Act
        let result = handle_begin_submission(&command, &clock(), &repo).await;

        // Assert
        match result {
            Err(DomainError::InvalidFields(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "email");
                assert_eq!(violations[0].code, "required");
            }
            other => panic!("expected InvalidFields, got {other:?}"),
        }
        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].2[0].event_type, "profile_form.submission_blocked");
    }

    #[tokio::test]
    async fn test_handle_begin_submission_starts_valid_form() {
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let repo =
            RecordingEventRepository::new(history(form_id, first_entry, |f| fill_valid(f, first_entry)));
        let submission_id = Uuid::new_v4();
        let command = SubmitForm {
            correlation_id: Uuid::new_v4(),
            form_id,
            submission_id,
        };

        let pending = handle_begin_submission(&command, &clock(), &repo)
            .await
            .unwrap();

        assert_eq!(pending.submission_id, submission_id);
        assert_eq!(pending.values.first_name, "Johnathan");
        assert_eq!(pending.events.len(), 1);
        assert_eq!(pending.events[0].event_type, "profile_form.submission_started");
    }

    #[tokio::test]
    async fn test_handle_complete_submission_records_success_with_gateway_payload() {
        // Arrange
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let submission_id = Uuid::new_v4();
        let mut values = FormValues::default();
        let existing = history(form_id, first_entry, |form| {
            fill_valid(form, first_entry);
            values = form.values().clone();
            form.begin_submission(submission_id, Uuid::new_v4(), &clock())
                .unwrap();
        });
        let repo = RecordingEventRepository::new(existing);
        let gateway = RecordingSubmitGateway::<FormValues>::new();
        let pending = PendingSubmission {
            form_id,
            submission_id,
            correlation_id: Uuid::new_v4(),
            values: values.clone(),
            events: Vec::new(),
        };

        // Act
        let report = handle_complete_submission(pending, &clock(), &repo, &gateway)
            .await
            .unwrap();

        // Assert
        assert_eq!(gateway.submitted(), vec![values]);
        let CompletionOutcome::Succeeded(summary) = report.outcome else {
            panic!("expected Succeeded");
        };
        assert_eq!(summary.line("gender"), Some("male"));
        assert_eq!(summary.line("techStack"), Some("Go"));
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].event_type, "profile_form.submission_succeeded");
    }

    fn submitting_history(form_id: Uuid, submission_id: Uuid) -> Vec<StoredEvent> {
        let first_entry = Uuid::new_v4();
        history(form_id, first_entry, |form| {
            fill_valid(form, first_entry);
            form.begin_submission(submission_id, Uuid::new_v4(), &clock())
                .unwrap();
        })
    }

    fn pending_for(form_id: Uuid, submission_id: Uuid) -> PendingSubmission {
        PendingSubmission {
            form_id,
            submission_id,
            correlation_id: Uuid::new_v4(),
            values: FormValues::default(),
            events: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_handle_complete_submission_retries_after_append_conflict() {
        // Arrange
        let form_id = Uuid::new_v4();
        let submission_id = Uuid::new_v4();
        let repo = RecordingEventRepository::with_conflicts(
            submitting_history(form_id, submission_id),
            COMPLETION_ATTEMPTS - 1,
        );
        let gateway = RecordingSubmitGateway::<FormValues>::new();

        // Act
        let report = handle_complete_submission(
            pending_for(form_id, submission_id),
            &clock(),
            &repo,
            &gateway,
        )
        .await
        .unwrap();

        // Assert
        assert!(matches!(report.outcome, CompletionOutcome::Succeeded(_)));
        assert_eq!(gateway.submitted().len(), 1);
        assert_eq!(repo.appended_events().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_complete_submission_gives_up_after_repeated_conflicts() {
        let form_id = Uuid::new_v4();
        let submission_id = Uuid::new_v4();
        let repo = RecordingEventRepository::with_conflicts(
            submitting_history(form_id, submission_id),
            COMPLETION_ATTEMPTS,
        );

        let result = handle_complete_submission(
            pending_for(form_id, submission_id),
            &clock(),
            &repo,
            &RecordingSubmitGateway::<FormValues>::new(),
        )
        .await;

        assert!(matches!(
            result,
            Err(DomainError::ConcurrencyConflict { .. })
        ));
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_complete_submission_records_gateway_failure() {
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let submission_id = Uuid::new_v4();
        let existing = history(form_id, first_entry, |form| {
            fill_valid(form, first_entry);
            form.begin_submission(submission_id, Uuid::new_v4(), &clock())
                .unwrap();
        });
        let repo = RecordingEventRepository::new(existing);
        let pending = PendingSubmission {
            form_id,
            submission_id,
            correlation_id: Uuid::new_v4(),
            values: FormValues::default(),
            events: Vec::new(),
        };

        let report = handle_complete_submission(pending, &clock(), &repo, &FailingSubmitGateway)
            .await
            .unwrap();

        assert!(matches!(report.outcome, CompletionOutcome::Failed(_)));
        assert_eq!(report.events[0].event_type, "profile_form.submission_failed");
    }

    #[tokio::test]
    async fn test_handle_complete_submission_discards_after_unmount() {
        // Arrange
        let form_id = Uuid::new_v4();
        let first_entry = Uuid::new_v4();
        let submission_id = Uuid::new_v4();
        let existing = history(form_id, first_entry, |form| {
            fill_valid(form, first_entry);
            form.begin_submission(submission_id, Uuid::new_v4(), &clock())
                .unwrap();
            form.unmount(Uuid::new_v4(), &clock()).unwrap();
        });
        let repo = RecordingEventRepository::new(existing);
        let pending = PendingSubmission {
            form_id,
            submission_id,
            correlation_id: Uuid::new_v4(),
            values: FormValues::default(),
            events: Vec::new(),
        };

        // Act
        let gateway = RecordingSubmitGateway::<FormValues>::new();
        let report = handle_complete_submission(pending, &clock(), &repo, &gateway)
            .await
            .unwrap();

        // Assert
        assert_eq!(report.outcome, CompletionOutcome::Discarded);
        assert!(report.events.is_empty());
        assert!(repo.appended_events().is_empty());
        assert_eq!(gateway.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_complete_submission_discards_for_unknown_form() {
        let pending = PendingSubmission {
            form_id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            correlation_id: Uuid::new_v4(),
            values: FormValues::default(),
            events: Vec::new(),
        };

        let report = handle_complete_submission(
            pending,
            &clock(),
            &EmptyEventRepository,
            &RecordingSubmitGateway::<FormValues>::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, CompletionOutcome::Discarded);
    }

    #[test]
    fn test_reconstitute_rejects_malformed_payload() {
        let form_id = Uuid::new_v4();
        let mut stored = history(form_id, Uuid::new_v4(), |_| {});
        stored[0].payload = serde_json::json!({ "NotAnEvent": {} });

        let result = reconstitute(form_id, &stored);

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
