//! Selection input over a fixed option set.
//!
//! `SelectInput` knows nothing about how an option is drawn. Callers hand it
//! a render hook that receives each option together with whether it is the
//! current selection, which is how the gender field puts a checkmark next to
//! the chosen option.

use std::fmt;

use super::values::Gender;

/// Something that can be offered in a [`SelectInput`].
pub trait SelectOption {
    /// Text shown to the user.
    fn label(&self) -> &str;

    /// Value submitted when the option is chosen.
    fn value(&self) -> &str;
}

impl SelectOption for Gender {
    fn label(&self) -> &str {
        Gender::label(*self)
    }

    fn value(&self) -> &str {
        Gender::value(*self)
    }
}

/// Hook that renders one option; the flag is `true` for the selection.
pub type RenderOption<O> = Box<dyn Fn(&O, bool) -> String + Send + Sync>;

/// An option after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOption {
    /// The option's submitted value.
    pub value: String,
    /// Output of the render hook.
    pub content: String,
    /// Whether this option is the current selection.
    pub selected: bool,
}

/// A select input over a fixed set of options.
pub struct SelectInput<'a, O: SelectOption + PartialEq> {
    options: &'a [O],
    selected: Option<&'a O>,
    placeholder: &'a str,
    render_option: Option<RenderOption<O>>,
}

impl<O: SelectOption + PartialEq> fmt::Debug for SelectInput<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectInput")
            .field("options", &self.options.len())
            .field("selected", &self.selected.map(SelectOption::value))
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

impl<'a, O: SelectOption + PartialEq> SelectInput<'a, O> {
    /// Creates a select input that renders each option by its label.
    #[must_use]
    pub fn new(options: &'a [O], selected: Option<&'a O>, placeholder: &'a str) -> Self {
        Self {
            options,
            selected,
            placeholder,
            render_option: None,
        }
    }

    /// Replaces the render hook.
    #[must_use]
    pub fn with_render_option<F>(mut self, render: F) -> Self
    where
        F: Fn(&O, bool) -> String + Send + Sync + 'static,
    {
        self.render_option = Some(Box::new(render));
        self
    }

    /// Text shown while nothing is selected.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.placeholder
    }

    /// The selected option, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&O> {
        self.selected
    }

    /// Renders every option in order through the render hook.
    #[must_use]
    pub fn render(&self) -> Vec<RenderedOption> {
        self.options
            .iter()
            .map(|option| {
                let selected = self.selected.is_some_and(|s| s == option);
                RenderedOption {
                    value: option.value().to_owned(),
                    content: match &self.render_option {
                        Some(render) => render(option, selected),
                        None => option.label().to_owned(),
                    },
                    selected,
                }
            })
            .collect()
    }
}

/// Checkmark appended to the selected gender option.
pub const SELECTED_MARK: &str = "\u{2713}";

/// The gender select, with a checkmark on the selected option.
#[must_use]
pub fn gender_select(selected: Option<&Gender>) -> SelectInput<'_, Gender> {
    SelectInput::new(&Gender::ALL, selected, "Select gender").with_render_option(
        |gender: &Gender, is_selected| {
            if is_selected {
                format!("{} {SELECTED_MARK}", gender.label())
            } else {
                gender.label().to_owned()
            }
        },
    )
}
