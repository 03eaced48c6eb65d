//! Read-only summary of submitted values.

use serde::Serialize;

use super::values::{FormValues, TextField};

/// One `name: value` line of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    /// Field name, e.g. `firstName`.
    pub field: &'static str,
    /// Flattened text of the field's value.
    pub text: String,
}

/// The summary shown after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// One line per field, in display order.
    pub lines: Vec<SummaryLine>,
}

impl Summary {
    /// Flattens `values` into summary lines. Text renders as-is, gender as
    /// its value, and the tech stack as its entry values joined by `", "`.
    #[must_use]
    pub fn of(values: &FormValues) -> Self {
        let text = |field: TextField| SummaryLine {
            field: field.name(),
            text: values.text(field).to_owned(),
        };

        let lines = vec![
            text(TextField::FirstName),
            text(TextField::LastName),
            text(TextField::Email),
            text(TextField::PhoneNumber),
            SummaryLine {
                field: "gender",
                text: values
                    .gender
                    .map(|g| g.value().to_owned())
                    .unwrap_or_default(),
            },
            text(TextField::DateOfBirth),
            SummaryLine {
                field: "techStack",
                text: values
                    .tech_stack
                    .iter()
                    .map(|entry| entry.value.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            },
        ];

        Self { lines }
    }

    /// Looks up the line for `field`.
    #[must_use]
    pub fn line(&self, field: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.field == field)
            .map(|line| line.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::Gender;
    use uuid::Uuid;

    #[test]
    fn test_summary_flattens_gender_and_tech_stack() {
        // Arrange
        let mut values = FormValues::initial(Uuid::new_v4());
        values.first_name = "Johnathan".to_owned();
        values.gender = Some(Gender::Female);
        values.tech_stack[0].value = "Rust".to_owned();
        values.prepend_entry(Uuid::new_v4());
        values.tech_stack[0].value = "Go".to_owned();

        // Act
        let summary = Summary::of(&values);

        // Assert
        assert_eq!(summary.lines.len(), 7);
        assert_eq!(summary.line("firstName"), Some("Johnathan"));
        assert_eq!(summary.line("gender"), Some("female"));
        assert_eq!(summary.line("techStack"), Some("Go, Rust"));
        assert_eq!(summary.line("lastName"), Some(""));
    }

    #[test]
    fn test_summary_lines_follow_display_order() {
        let summary = Summary::of(&FormValues::initial(Uuid::new_v4()));

        let fields: Vec<&str> = summary.lines.iter().map(|l| l.field).collect();
        assert_eq!(
            fields,
            vec![
                "firstName",
                "lastName",
                "email",
                "phoneNumber",
                "gender",
                "dateOfBirth",
                "techStack"
            ]
        );
    }
}
