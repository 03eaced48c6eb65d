//! Commands for the profile form.

use profile_form_core::command::Command;
use uuid::Uuid;

use super::values::{FieldKey, Gender, TextField};

macro_rules! impl_command {
    ($command:ty, $type_name:literal) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $type_name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn form_id(&self) -> Uuid {
                self.form_id
            }
        }
    };
}

/// Command to mount a new form.
#[derive(Debug, Clone)]
pub struct MountForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The new form's identifier.
    pub form_id: Uuid,
    /// Identity of the initial tech stack entry.
    pub initial_entry_id: Uuid,
}

/// Command to change a text field.
#[derive(Debug, Clone)]
pub struct ChangeField {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The field to change.
    pub field: TextField,
    /// The new value.
    pub value: String,
}

/// Command to set or clear the gender selection.
#[derive(Debug, Clone)]
pub struct SelectGender {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The selected option; `None` clears the selection.
    pub gender: Option<Gender>,
}

/// Command to mark a field as interacted with.
#[derive(Debug, Clone)]
pub struct TouchField {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// The touched field.
    pub field: FieldKey,
}

/// Command to insert a blank tech stack entry at the front of the list.
#[derive(Debug, Clone)]
pub struct AddTechStackEntry {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the new entry.
    pub entry_id: Uuid,
}

/// Command to change a tech stack entry's value.
#[derive(Debug, Clone)]
pub struct ChangeTechStackEntry {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the entry.
    pub entry_id: Uuid,
    /// The new value.
    pub value: String,
}

/// Command to remove the tech stack entry at a position.
#[derive(Debug, Clone)]
pub struct RemoveTechStackEntry {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Position of the entry to remove; must be greater than zero.
    pub position: usize,
}

/// Command to submit the form.
#[derive(Debug, Clone)]
pub struct SubmitForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Identifies this submission attempt.
    pub submission_id: Uuid,
}

/// Command to return a submitted form to its freshly mounted state.
#[derive(Debug, Clone)]
pub struct ResetForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
    /// Identity of the new initial tech stack entry.
    pub initial_entry_id: Uuid,
}

/// Command to unmount a form.
#[derive(Debug, Clone)]
pub struct UnmountForm {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The form identifier.
    pub form_id: Uuid,
}

impl_command!(MountForm, "profile_form.mount_form");
impl_command!(ChangeField, "profile_form.change_field");
impl_command!(SelectGender, "profile_form.select_gender");
impl_command!(TouchField, "profile_form.touch_field");
impl_command!(AddTechStackEntry, "profile_form.add_tech_stack_entry");
impl_command!(ChangeTechStackEntry, "profile_form.change_tech_stack_entry");
impl_command!(RemoveTechStackEntry, "profile_form.remove_tech_stack_entry");
impl_command!(SubmitForm, "profile_form.submit_form");
impl_command!(ResetForm, "profile_form.reset_form");
impl_command!(UnmountForm, "profile_form.unmount_form");
