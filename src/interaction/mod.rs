use std::rc::Rc;

use anyhow::{Result, anyhow};
use typed_builder::TypedBuilder;

mod input;
mod spinner;

#[derive(Debug, Default, Clone)]
pub struct Interaction;

impl Interaction {
    pub fn new() -> Self {
        Default::default()
    }
}

#[derive(TypedBuilder)]
pub struct InputPromptOptions {
    #[builder(setter(into))]
    pub message: String,
    #[builder(default, setter(strip_option(fallback = validator_opt)))]
    pub validator: Option<InputPromptValidator>,
}

#[derive(Clone)]
// Rc because inquire needs a cloneable validator
pub struct InputPromptValidator(Rc<dyn InputValidator>);

impl InputPromptValidator {
    pub fn new(validator: impl InputValidator + 'static) -> Self {
        Self(Rc::new(validator))
    }
}

pub trait InputValidator {
    fn validate(&self, input: &str) -> Result<InputValidatorResult>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValidatorResult {
    Valid,
    Invalid(String),
}

pub enum InputPromptResult {
    Input(String),
    Canceled,
}

pub trait InputPrompt {
    fn input(&self, options: InputPromptOptions) -> Result<InputPromptResult>;

    /// Prompts the user for input if the field is `None`, otherwise returns the existing value.
    ///
    /// Returns an error if the user cancels the prompt.
    fn prompt_if_none(
        &self,
        field: Option<&str>,
        prompt: &str,
        validator: Option<InputPromptValidator>,
    ) -> Result<String> {
        match field {
            Some(value) => Ok(value.to_string()),
            None => match self.input(
                InputPromptOptions::builder()
                    .message(prompt)
                    .validator_opt(validator)
                    .build(),
            )? {
                InputPromptResult::Input(value) => Ok(value),
                InputPromptResult::Canceled => Err(anyhow!("user canceled the prompt")),
            },
        }
    }
}

/// Stops the spinner when dropped.
pub struct SpinnerHandle {
    stop_spinner: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl SpinnerHandle {
    pub fn new(stop_spinner: Box<dyn FnOnce() + Send + Sync>) -> Self {
        Self {
            stop_spinner: Some(stop_spinner),
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        if let Some(stop_spinner) = self.stop_spinner.take() {
            stop_spinner();
        }
    }
}

pub trait SpinnerInteraction {
    fn start_spinner(&self, message: String) -> Result<SpinnerHandle>;
}
