//! JSON routes for mounting and driving profile forms.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info, info_span, instrument};
use uuid::Uuid;

use profile_form::application::command_handlers::{self, PendingSubmission};
use profile_form::application::query_handlers::{self, FormView};
use profile_form::domain::commands;
use profile_form::domain::values::{FieldKey, Gender, TextField};
use profile_form_core::error::DomainError;
use profile_form_core::repository::StoredEvent;

use crate::error::ApiError;
use crate::state::AppState;

/// Path segment naming the gender select.
const GENDER_FIELD: &str = "gender";

/// Request body for PUT /{form_id}/fields/{field} and
/// PUT /{form_id}/tech-stack/{entry_id}.
#[derive(Debug, Deserialize)]
pub struct FieldValueRequest {
    /// The new value. `null` clears the gender selection and is rejected for
    /// text fields.
    pub value: Option<String>,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct MountResponse {
    /// The mounted form.
    pub form_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// Response body for POST /{form_id}/tech-stack.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Identity of the inserted entry.
    pub entry_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// Response body for POST /{form_id}/submit.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Identifies the submission now in flight.
    pub submission_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

fn event_ids(stored_events: &[StoredEvent]) -> Vec<Uuid> {
    stored_events.iter().map(|e| e.event_id).collect()
}

fn text_field(name: &str) -> Result<TextField, DomainError> {
    name.parse::<TextField>()
        .map_err(|e| DomainError::Validation(e.to_string()))
}

fn field_key(name: &str) -> Result<FieldKey, DomainError> {
    if name == GENDER_FIELD {
        Ok(FieldKey::Gender)
    } else {
        text_field(name).map(FieldKey::Text)
    }
}

/// Delivers the gateway's answer to the form once it arrives, off the request
/// path.
fn spawn_completion(state: &AppState, pending: PendingSubmission) {
    let clock = Arc::clone(&state.clock);
    let repo = Arc::clone(&state.event_repository);
    let gateway = Arc::clone(&state.submit_gateway);
    let span = info_span!(
        "submission_completion",
        form_id = %pending.form_id,
        submission_id = %pending.submission_id,
        correlation_id = %pending.correlation_id,
    );

    tokio::spawn(
        async move {
            if let Err(e) = command_handlers::handle_complete_submission(
                pending,
                clock.as_ref(),
                &*repo,
                &*gateway,
            )
            .await
            {
                error!(error = %e, "submission completion could not be applied");
            }
        }
        .instrument(span),
    );
}

/// POST /
#[instrument(skip_all)]
async fn mount_form(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MountResponse>), ApiError> {
    let command = commands::MountForm {
        correlation_id: Uuid::new_v4(),
        form_id: Uuid::new_v4(),
        initial_entry_id: Uuid::new_v4(),
    };

    info!(
        correlation_id = %command.correlation_id,
        form_id = %command.form_id,
        "handling mount_form command"
    );

    let stored_events = command_handlers::handle_mount_form(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MountResponse {
            form_id: command.form_id,
            event_ids: event_ids(&stored_events),
        }),
    ))
}

/// GET /{form_id}
#[instrument(skip_all, fields(form_id = %form_id))]
async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let view = query_handlers::get_form_by_id(form_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// DELETE /{form_id}
#[instrument(skip_all, fields(form_id = %form_id))]
async fn unmount_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::UnmountForm {
        correlation_id: Uuid::new_v4(),
        form_id,
    };

    info!(correlation_id = %command.correlation_id, "handling unmount_form command");

    let stored_events = command_handlers::handle_unmount_form(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&stored_events),
    }))
}

/// PUT /{form_id}/fields/{field}
#[instrument(skip_all, fields(form_id = %form_id, field = %field))]
async fn change_field(
    State(state): State<AppState>,
    Path((form_id, field)): Path<(Uuid, String)>,
    Json(request): Json<FieldValueRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let correlation_id = Uuid::new_v4();

    let stored_events = if field == GENDER_FIELD {
        let gender = request
            .value
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        let command = commands::SelectGender {
            correlation_id,
            form_id,
            gender,
        };

        info!(%correlation_id, "handling select_gender command");

        command_handlers::handle_select_gender(
            &command,
            state.clock.as_ref(),
            &*state.event_repository,
        )
        .await?
    } else {
        let field = text_field(&field)?;
        let value = request.value.ok_or_else(|| {
            DomainError::Validation(format!("value for {field} must be a string"))
        })?;
        let command = commands::ChangeField {
            correlation_id,
            form_id,
            field,
            value,
        };

        info!(%correlation_id, "handling change_field command");

        command_handlers::handle_change_field(
            &command,
            state.clock.as_ref(),
            &*state.event_repository,
        )
        .await?
    };

    Ok(Json(CommandResponse {
        event_ids: event_ids(&stored_events),
    }))
}

async fn touch(
    state: &AppState,
    form_id: Uuid,
    field: FieldKey,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::TouchField {
        correlation_id: Uuid::new_v4(),
        form_id,
        field,
    };

    info!(correlation_id = %command.correlation_id, "handling touch_field command");

    let stored_events = command_handlers::handle_touch_field(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&stored_events),
    }))
}

/// POST /{form_id}/fields/{field}/touch
#[instrument(skip_all, fields(form_id = %form_id, field = %field))]
async fn touch_field(
    State(state): State<AppState>,
    Path((form_id, field)): Path<(Uuid, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let key = field_key(&field)?;
    touch(&state, form_id, key).await
}

/// POST /{form_id}/tech-stack/{entry_id}/touch
#[instrument(skip_all, fields(form_id = %form_id, entry_id = %entry_id))]
async fn touch_tech_stack_entry(
    State(state): State<AppState>,
    Path((form_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommandResponse>, ApiError> {
    touch(&state, form_id, FieldKey::TechStackEntry(entry_id)).await
}

/// POST /{form_id}/tech-stack
#[instrument(skip_all, fields(form_id = %form_id))]
async fn add_tech_stack_entry(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<EntryResponse>, ApiError> {
    let command = commands::AddTechStackEntry {
        correlation_id: Uuid::new_v4(),
        form_id,
        entry_id: Uuid::new_v4(),
    };

    info!(
        correlation_id = %command.correlation_id,
        entry_id = %command.entry_id,
        "handling add_tech_stack_entry command"
    );

    let stored_events = command_handlers::handle_add_tech_stack_entry(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(EntryResponse {
        entry_id: command.entry_id,
        event_ids: event_ids(&stored_events),
    }))
}

/// PUT /{form_id}/tech-stack/{entry_id}
#[instrument(skip_all, fields(form_id = %form_id, entry_id = %entry_id))]
async fn change_tech_stack_entry(
    State(state): State<AppState>,
    Path((form_id, entry_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<FieldValueRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let value = request.value.ok_or_else(|| {
        DomainError::Validation("tech stack value must be a string".to_owned())
    })?;
    let command = commands::ChangeTechStackEntry {
        correlation_id: Uuid::new_v4(),
        form_id,
        entry_id,
        value,
    };

    info!(correlation_id = %command.correlation_id, "handling change_tech_stack_entry command");

    let stored_events = command_handlers::handle_change_tech_stack_entry(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&stored_events),
    }))
}

/// DELETE /{form_id}/tech-stack/positions/{position}
#[instrument(skip_all, fields(form_id = %form_id, position = position))]
async fn remove_tech_stack_entry(
    State(state): State<AppState>,
    Path((form_id, position)): Path<(Uuid, usize)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RemoveTechStackEntry {
        correlation_id: Uuid::new_v4(),
        form_id,
        position,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_tech_stack_entry command");

    let stored_events = command_handlers::handle_remove_tech_stack_entry(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&stored_events),
    }))
}

/// POST /{form_id}/submit
///
/// Answers 202 as soon as the form is `submitting`; the gateway's completion
/// is applied in the background.
#[instrument(skip_all, fields(form_id = %form_id))]
async fn submit_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let command = commands::SubmitForm {
        correlation_id: Uuid::new_v4(),
        form_id,
        submission_id: Uuid::new_v4(),
    };

    info!(
        correlation_id = %command.correlation_id,
        submission_id = %command.submission_id,
        "handling submit_form command"
    );

    let pending = command_handlers::handle_begin_submission(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    let response = SubmitResponse {
        submission_id: pending.submission_id,
        event_ids: event_ids(&pending.events),
    };
    spawn_completion(&state, pending);

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// POST /{form_id}/reset
#[instrument(skip_all, fields(form_id = %form_id))]
async fn reset_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ResetForm {
        correlation_id: Uuid::new_v4(),
        form_id,
        initial_entry_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling reset_form command");

    let stored_events = command_handlers::handle_reset_form(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse {
        event_ids: event_ids(&stored_events),
    }))
}

/// Returns the router for the form API.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(mount_form))
        .route("/{form_id}", get(get_form).delete(unmount_form))
        .route("/{form_id}/fields/{field}", put(change_field))
        .route("/{form_id}/fields/{field}/touch", post(touch_field))
        .route("/{form_id}/tech-stack", post(add_tech_stack_entry))
        .route("/{form_id}/tech-stack/{entry_id}", put(change_tech_stack_entry))
        .route(
            "/{form_id}/tech-stack/{entry_id}/touch",
            post(touch_tech_stack_entry),
        )
        .route(
            "/{form_id}/tech-stack/positions/{position}",
            delete(remove_tech_stack_entry),
        )
        .route("/{form_id}/submit", post(submit_form))
        .route("/{form_id}/reset", post(reset_form))
}
