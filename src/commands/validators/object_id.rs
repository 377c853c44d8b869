//! Validator for Atlas identifiers (project IDs and the like).

use anyhow::Result;

use crate::interaction::{InputValidator, InputValidatorResult};

/// Validator for identifiers formatted as a MongoDB ObjectId.
#[derive(Clone)]
pub struct ObjectIdValidator;

impl InputValidator for ObjectIdValidator {
    fn validate(&self, input: &str) -> Result<InputValidatorResult> {
        match parse_object_id(input) {
            Ok(_) => Ok(InputValidatorResult::Valid),
            Err(e) => Ok(InputValidatorResult::Invalid(e)),
        }
    }
}

/// Check that the input is a 24 character hexadecimal string.
///
/// Also used as a clap value parser for `--projectId`.
pub fn parse_object_id(input: &str) -> Result<String, String> {
    if input.len() == 24 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(input.to_string())
    } else {
        Err(format!(
            "Invalid ID '{input}', expected a 24 character hexadecimal string"
        ))
    }
}
