//! Field values held by a profile form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when parsing field names or option values from input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    /// The name does not identify a field of the form.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The value is not one of the gender options.
    #[error("unknown gender option: {0}")]
    UnknownGender(String),
}

/// Country code shown in front of the phone number. It is not part of the
/// stored value.
pub const PHONE_COUNTRY_CODE: &str = "+91";

/// Placeholder of every tech stack entry input.
pub const TECH_STACK_PLACEHOLDER: &str = "Tech Stack";

/// The free-text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Contact email.
    Email,
    /// Ten-digit mobile number.
    PhoneNumber,
    /// Date of birth as entered in a date picker (`YYYY-MM-DD`).
    DateOfBirth,
}

impl TextField {
    /// All text fields in display order.
    pub const ALL: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::PhoneNumber,
        Self::DateOfBirth,
    ];

    /// The field's name as used in paths and the summary.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::DateOfBirth => "dateOfBirth",
        }
    }

    /// The label rendered above the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone Number",
            Self::DateOfBirth => "Date of Birth",
        }
    }

    /// The HTML input type for the field.
    #[must_use]
    pub fn input_type(self) -> &'static str {
        match self {
            Self::FirstName | Self::LastName => "text",
            Self::Email => "email",
            Self::PhoneNumber => "tel",
            Self::DateOfBirth => "date",
        }
    }

    /// Hint shown inside an empty input. The date picker has none.
    #[must_use]
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::FirstName => Some("first name"),
            Self::LastName => Some("last name"),
            Self::Email => Some("email"),
            Self::PhoneNumber => Some("phone number"),
            Self::DateOfBirth => None,
        }
    }

    /// Fixed text rendered in front of the input.
    #[must_use]
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Self::PhoneNumber => Some(PHONE_COUNTRY_CODE),
            _ => None,
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextField {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| ParseValueError::UnknownField(s.to_owned()))
    }
}

/// The closed set of gender options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// `Male` / `male`.
    Male,
    /// `Female` / `female`.
    Female,
    /// `Other` / `other`.
    Other,
}

impl Gender {
    /// All options in the order they are offered.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Submitted value.
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|gender| gender.value() == s)
            .ok_or_else(|| ParseValueError::UnknownGender(s.to_owned()))
    }
}

/// One entry of the repeatable tech stack list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStackEntry {
    /// Stable identity, independent of position.
    pub id: Uuid,
    /// The entered technology.
    pub value: String,
    /// Current position in the list.
    pub index: usize,
}

impl TechStackEntry {
    /// Creates a blank entry.
    #[must_use]
    pub fn blank(id: Uuid) -> Self {
        Self {
            id,
            value: String::new(),
            index: 0,
        }
    }
}

/// Identifies something the user can interact with and that carries its own
/// validation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum FieldKey {
    /// One of the text fields.
    Text(TextField),
    /// The gender select.
    Gender,
    /// A tech stack entry, by identity.
    TechStackEntry(Uuid),
}

/// The full set of values entered into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Ten-digit mobile number.
    pub phone_number: String,
    /// Selected gender option, if any.
    pub gender: Option<Gender>,
    /// Date of birth.
    pub date_of_birth: String,
    /// Ordered tech stack entries.
    pub tech_stack: Vec<TechStackEntry>,
}

impl FormValues {
    /// Values of a freshly mounted form: everything blank, one tech stack
    /// entry.
    #[must_use]
    pub fn initial(entry_id: Uuid) -> Self {
        Self {
            tech_stack: vec![TechStackEntry::blank(entry_id)],
            ..Self::default()
        }
    }

    /// Returns the value of a text field.
    #[must_use]
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FirstName => &self.first_name,
            TextField::LastName => &self.last_name,
            TextField::Email => &self.email,
            TextField::PhoneNumber => &self.phone_number,
            TextField::DateOfBirth => &self.date_of_birth,
        }
    }

    /// Replaces the value of a text field.
    pub fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::FirstName => &mut self.first_name,
            TextField::LastName => &mut self.last_name,
            TextField::Email => &mut self.email,
            TextField::PhoneNumber => &mut self.phone_number,
            TextField::DateOfBirth => &mut self.date_of_birth,
        };
        *slot = value;
    }

    /// Finds a tech stack entry by identity.
    #[must_use]
    pub fn entry(&self, entry_id: Uuid) -> Option<&TechStackEntry> {
        self.tech_stack.iter().find(|entry| entry.id == entry_id)
    }

    /// Current position of a tech stack entry.
    #[must_use]
    pub fn position_of(&self, entry_id: Uuid) -> Option<usize> {
        self.tech_stack.iter().position(|entry| entry.id == entry_id)
    }

    /// Inserts a blank entry at the front of the list.
    pub(crate) fn prepend_entry(&mut self, entry_id: Uuid) {
        self.tech_stack.insert(0, TechStackEntry::blank(entry_id));
        self.renumber();
    }

    /// Removes the entry at `position`, returning it.
    pub(crate) fn remove_entry(&mut self, position: usize) -> Option<TechStackEntry> {
        if position >= self.tech_stack.len() {
            return None;
        }
        let removed = self.tech_stack.remove(position);
        self.renumber();
        Some(removed)
    }

    fn renumber(&mut self) {
        for (index, entry) in self.tech_stack.iter_mut().enumerate() {
            entry.index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_parses_from_name() {
        assert_eq!("phoneNumber".parse(), Ok(TextField::PhoneNumber));
        assert_eq!(
            "gender".parse::<TextField>(),
            Err(ParseValueError::UnknownField("gender".to_owned()))
        );
    }

    #[test]
    fn test_only_phone_number_carries_a_prefix() {
        let prefixed: Vec<TextField> = TextField::ALL
            .into_iter()
            .filter(|field| field.prefix().is_some())
            .collect();

        assert_eq!(prefixed, vec![TextField::PhoneNumber]);
        assert_eq!(TextField::PhoneNumber.prefix(), Some("+91"));
        assert_eq!(TextField::DateOfBirth.placeholder(), None);
        assert_eq!(TextField::FirstName.placeholder(), Some("first name"));
    }

    #[test]
    fn test_gender_parses_from_value_not_label() {
        assert_eq!("female".parse(), Ok(Gender::Female));
        assert!("Female".parse::<Gender>().is_err());
    }

    #[test]
    fn test_prepend_entry_inserts_at_front_and_renumbers() {
        // Arrange
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let mut values = FormValues::initial(first);

        // Act
        values.prepend_entry(second);

        // Assert
        let ids: Vec<Uuid> = values.tech_stack.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(values.tech_stack[0].index, 0);
        assert_eq!(values.tech_stack[1].index, 1);
    }

    #[test]
    fn test_remove_entry_out_of_range_returns_none() {
        let mut values = FormValues::initial(Uuid::new_v4());

        assert!(values.remove_entry(3).is_none());
        assert_eq!(values.tech_stack.len(), 1);
    }

    #[test]
    fn test_form_values_serialize_with_camel_case_names() {
        let mut values = FormValues::initial(Uuid::nil());
        values.gender = Some(Gender::Other);

        let json = serde_json::to_value(&values).unwrap();

        assert_eq!(json["gender"], "other");
        assert!(json.get("phoneNumber").is_some());
        assert!(json.get("techStack").is_some());
    }
}
