use anyhow::{Result, anyhow};
use inquire::{
    InquireError, Text,
    validator::{ErrorMessage, StringValidator, Validation},
};

use super::{
    InputPrompt, InputPromptOptions, InputPromptResult, InputPromptValidator, InputValidatorResult,
    Interaction,
};

impl StringValidator for InputPromptValidator {
    fn validate(&self, input: &str) -> Result<Validation, inquire::error::CustomUserError> {
        match self.0.validate(input) {
            Ok(InputValidatorResult::Valid) => Ok(Validation::Valid),
            Ok(InputValidatorResult::Invalid(error)) => {
                Ok(Validation::Invalid(ErrorMessage::Custom(error)))
            }
            Err(e) => Err(inquire::error::CustomUserError::from(e)),
        }
    }
}

impl InputPrompt for Interaction {
    fn input(&self, options: InputPromptOptions) -> Result<InputPromptResult> {
        let mut prompt = Text::new(&options.message);

        if let Some(validator) = options.validator {
            prompt = prompt.with_validator(validator);
        }

        match prompt.prompt() {
            Ok(value) => Ok(InputPromptResult::Input(value)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(InputPromptResult::Canceled)
            }
            Err(e) => Err(anyhow!("error prompting for input: {e}")),
        }
    }
}
