//! Validators for user input.

pub mod object_id;

pub use object_id::{ObjectIdValidator, parse_object_id};
