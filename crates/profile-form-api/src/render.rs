//! HTML rendering of the profile form page.
//!
//! The page is a gapped grid wrapping the form markup and, once a submission
//! has succeeded, the summary block.

use profile_form::application::query_handlers::{FormView, TechStackEntryView};
use profile_form::domain::select::gender_select;
use profile_form::domain::summary::Summary;
use profile_form::domain::values::{TECH_STACK_PLACEHOLDER, TextField};

/// Label on the submit button while idle.
pub const SUBMIT_LABEL: &str = "Submit";

/// Label on the submit button while a submission is in flight.
pub const SUBMITTING_LABEL: &str = "Submitting\u{2026}";

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn error_text(message: Option<&str>) -> String {
    message.map_or_else(String::new, |message| {
        format!(
            r#"<p class="field-error" role="alert">{}</p>"#,
            html_escape(message)
        )
    })
}

fn disabled_attr(view: &FormView) -> &'static str {
    if view.submitting { " disabled" } else { "" }
}

fn text_input(view: &FormView, field: TextField) -> String {
    let name = field.name();
    let placeholder = field.placeholder().map_or_else(String::new, |text| {
        format!(r#" placeholder="{}""#, html_escape(text))
    });
    let input = format!(
        r#"<input id="{name}" name="{name}" type="{input_type}"{placeholder} value="{value}"{disabled}>"#,
        input_type = field.input_type(),
        value = html_escape(view.values.text(field)),
        disabled = disabled_attr(view),
    );
    let control = match field.prefix() {
        Some(prefix) => format!(
            r#"<div class="input-group"><span class="input-addon">{}</span>{input}</div>"#,
            html_escape(prefix)
        ),
        None => input,
    };

    format!(
        r#"<div class="field"><label for="{name}">{label}</label>{control}{error}</div>"#,
        label = field.label(),
        error = error_text(view.error_for(name)),
    )
}

fn gender_input(view: &FormView) -> String {
    let gender = view.gender();
    let select = gender_select(gender.as_ref());
    let placeholder_selected = if select.selected().is_none() {
        " selected"
    } else {
        ""
    };

    let mut options = format!(
        r#"<option value=""{placeholder_selected}>{}</option>"#,
        html_escape(select.placeholder())
    );
    for option in select.render() {
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            html_escape(&option.value),
            if option.selected { " selected" } else { "" },
            html_escape(&option.content),
        ));
    }

    format!(
        r#"<div class="field"><label for="gender">Gender</label><select id="gender" name="gender"{disabled}>{options}</select>{error}</div>"#,
        disabled = disabled_attr(view),
        error = error_text(view.error_for("gender")),
    )
}

fn tech_stack_entry(view: &FormView, entry: &TechStackEntryView) -> String {
    let remove = if entry.removable {
        format!(
            r#"<button type="button" class="remove-entry" data-position="{}"{}>Remove</button>"#,
            entry.position,
            disabled_attr(view),
        )
    } else {
        String::new()
    };

    format!(
        r#"<li class="tech-stack-entry" data-entry-id="{id}"><input name="techStack.{position}.value" type="text" placeholder="{TECH_STACK_PLACEHOLDER}" value="{value}"{disabled}>{remove}{error}</li>"#,
        id = entry.entry_id,
        position = entry.position,
        value = html_escape(&entry.value),
        disabled = disabled_attr(view),
        error = error_text(entry.error.as_deref()),
    )
}

fn tech_stack(view: &FormView) -> String {
    let entries: String = view
        .tech_stack
        .iter()
        .map(|entry| tech_stack_entry(view, entry))
        .collect();

    format!(
        r#"<fieldset class="tech-stack"><legend>Tech stack</legend><button type="button" class="add-entry"{disabled}>Add</button><ul>{entries}</ul></fieldset>"#,
        disabled = disabled_attr(view),
    )
}

fn submit_button(view: &FormView) -> String {
    if view.submitting {
        format!(
            r#"<button type="submit" disabled aria-busy="true">{SUBMITTING_LABEL}</button>"#
        )
    } else {
        format!(r#"<button type="submit">{SUBMIT_LABEL}</button>"#)
    }
}

fn failure_notice(view: &FormView) -> String {
    view.last_failure.as_deref().map_or_else(String::new, |reason| {
        format!(
            r#"<p class="submit-error" role="alert">{}</p>"#,
            html_escape(reason)
        )
    })
}

/// Renders the form markup.
#[must_use]
pub fn form(view: &FormView) -> String {
    let mut fields = String::new();
    for field in [
        TextField::FirstName,
        TextField::LastName,
        TextField::Email,
        TextField::PhoneNumber,
    ] {
        fields.push_str(&text_input(view, field));
    }
    fields.push_str(&gender_input(view));
    fields.push_str(&text_input(view, TextField::DateOfBirth));
    fields.push_str(&tech_stack(view));

    format!(
        r#"<form class="profile-form" data-form-id="{form_id}" data-status="{status}" novalidate>{fields}{failure}{submit}</form>"#,
        form_id = view.form_id,
        status = view.status,
        failure = failure_notice(view),
        submit = submit_button(view),
    )
}

/// Renders the summary block: one `field: value` line per field.
#[must_use]
pub fn summary(summary: &Summary) -> String {
    let lines: String = summary
        .lines
        .iter()
        .map(|line| {
            format!(
                "<li>{}: {}</li>",
                html_escape(line.field),
                html_escape(&line.text)
            )
        })
        .collect();

    format!(r#"<section class="summary"><h2>Summary</h2><ul>{lines}</ul></section>"#)
}

/// Renders the whole page: the grid container, the form and, after a
/// successful submission, the summary.
#[must_use]
pub fn page(view: &FormView) -> String {
    let summary_block = view.summary.as_ref().map(summary).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>Profile</title></head><body><main class="page" style="display: grid; gap: 1rem;">{form}{summary_block}</main></body></html>"#,
        form = form(view),
    )
}
