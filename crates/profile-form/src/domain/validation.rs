//! Field validation rules.
//!
//! Rules are declared per field and evaluated in a fixed order: required,
//! then minimum length, then pattern. The first failing rule is the field's
//! error. Evaluation is pure, so re-running it on unchanged values always
//! yields the same result.

use std::sync::LazyLock;

use profile_form_core::error::FieldViolation;
use regex::Regex;

use super::values::{FieldKey, FormValues, Gender, TextField};

/// Message shown for an empty required field.
pub const REQUIRED_MESSAGE: &str = "This is required";

/// Minimum number of characters in a first name.
pub const FIRST_NAME_MIN_LENGTH: usize = 4;

// ASCII digits only; `\d` would also accept other Unicode digits.
static PHONE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone number pattern is valid"));

/// A pattern rule: the regex plus the message shown when it does not match.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    regex: &'static LazyLock<Regex>,
    message: &'static str,
}

/// The rules registered for one field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRules {
    /// Fails with [`ValidationErrorKind::Required`] on an empty value.
    pub required: bool,
    /// Fails with [`ValidationErrorKind::MinLength`] below this many characters.
    pub min_length: Option<usize>,
    /// Fails with [`ValidationErrorKind::Pattern`] when the value does not match.
    pub pattern: Option<PatternRule>,
}

impl FieldRules {
    const REQUIRED: Self = Self {
        required: true,
        min_length: None,
        pattern: None,
    };

    /// Rules registered for a text field.
    #[must_use]
    pub fn for_text(field: TextField) -> Self {
        match field {
            TextField::FirstName => Self {
                min_length: Some(FIRST_NAME_MIN_LENGTH),
                ..Self::REQUIRED
            },
            TextField::PhoneNumber => Self {
                pattern: Some(PatternRule {
                    regex: &PHONE_NUMBER_PATTERN,
                    message: "Phone number format is incorrect",
                }),
                ..Self::REQUIRED
            },
            TextField::LastName | TextField::Email | TextField::DateOfBirth => Self::REQUIRED,
        }
    }

    /// Rules registered for every tech stack entry.
    #[must_use]
    pub fn for_tech_stack_entry() -> Self {
        Self::REQUIRED
    }

    /// Evaluates the rules against `value`.
    #[must_use]
    pub fn check(&self, value: &str) -> Option<ValidationErrorKind> {
        if value.is_empty() {
            return self.required.then_some(ValidationErrorKind::Required);
        }
        if let Some(min) = self.min_length
            && value.chars().count() < min
        {
            return Some(ValidationErrorKind::MinLength { min });
        }
        if let Some(rule) = self.pattern
            && !rule.regex.is_match(value)
        {
            return Some(ValidationErrorKind::Pattern {
                message: rule.message,
            });
        }
        None
    }
}

/// The ways a field can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The field is empty.
    Required,
    /// The value is shorter than `min` characters.
    MinLength {
        /// Required minimum.
        min: usize,
    },
    /// The value does not match the field's pattern.
    Pattern {
        /// Message registered with the pattern.
        message: &'static str,
    },
}

impl ValidationErrorKind {
    /// Machine-readable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength { .. } => "min_length",
            Self::Pattern { .. } => "pattern",
        }
    }

    /// Message shown next to the field.
    #[must_use]
    pub fn message(self) -> String {
        match self {
            Self::Required => REQUIRED_MESSAGE.to_owned(),
            Self::MinLength { min } => format!("Minimum length should be {min}"),
            Self::Pattern { message } => message.to_owned(),
        }
    }
}

/// A validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The failing field.
    pub field: FieldKey,
    /// Field path, e.g. `firstName` or `techStack.1.value`.
    pub path: String,
    /// The failed rule.
    pub kind: ValidationErrorKind,
}

impl FieldError {
    /// Converts to the transport-neutral violation carried by `DomainError`.
    #[must_use]
    pub fn to_violation(&self) -> FieldViolation {
        FieldViolation {
            field: self.path.clone(),
            code: self.kind.code(),
            message: self.kind.message(),
        }
    }
}

/// Validates the gender selection.
#[must_use]
pub fn check_gender(gender: Option<Gender>) -> Option<ValidationErrorKind> {
    gender.is_none().then_some(ValidationErrorKind::Required)
}

fn text_error(values: &FormValues, field: TextField) -> Option<FieldError> {
    FieldRules::for_text(field)
        .check(values.text(field))
        .map(|kind| FieldError {
            field: FieldKey::Text(field),
            path: field.name().to_owned(),
            kind,
        })
}

/// Validates every field of `values`, in display order.
#[must_use]
pub fn validate_all(values: &FormValues) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = [
        TextField::FirstName,
        TextField::LastName,
        TextField::Email,
        TextField::PhoneNumber,
    ]
    .into_iter()
    .filter_map(|field| text_error(values, field))
    .collect();

    if let Some(kind) = check_gender(values.gender) {
        errors.push(FieldError {
            field: FieldKey::Gender,
            path: "gender".to_owned(),
            kind,
        });
    }

    errors.extend(text_error(values, TextField::DateOfBirth));

    let entry_rules = FieldRules::for_tech_stack_entry();
    for (position, entry) in values.tech_stack.iter().enumerate() {
        if let Some(kind) = entry_rules.check(&entry.value) {
            errors.push(FieldError {
                field: FieldKey::TechStackEntry(entry.id),
                path: format!("techStack.{position}.value"),
                kind,
            });
        }
    }

    errors
}
