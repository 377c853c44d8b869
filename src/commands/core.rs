//! Core traits for commands.
//!
//! - [`Command`] is a unit of work that can be executed.
//! - [`CommandWithOutput`] is a command that produces a result.
//!
//! [`CommandWithOutputExt`] turns a [`CommandWithOutput`] into a [`Command`] that prints its result.

use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::formatting::{Format, Formattable};

#[async_trait]
pub trait Command {
    async fn execute(&mut self) -> Result<()>;
}

#[async_trait]
pub trait CommandWithOutput {
    type Output;

    async fn execute(&mut self) -> Result<Self::Output>;
}

pub trait CommandWithOutputExt {
    /// Convert a [`CommandWithOutput`] into a [`Command`] that prints the output to stdout in the given format.
    fn with_print_to_stdout(self, format: Format) -> Result<Box<dyn Command>>;
}

/// Executes the wrapped command and writes its formatted output.
pub struct PrintCommand<C> {
    command: C,
    format: Format,
    writer: Box<dyn Write + Send>,
}

impl<C> PrintCommand<C> {
    pub fn new(command: C, format: Format, writer: Box<dyn Write + Send>) -> Self {
        Self {
            command,
            format,
            writer,
        }
    }
}

#[async_trait]
impl<C, O> Command for PrintCommand<C>
where
    C: CommandWithOutput<Output = O> + Send,
    O: Formattable,
{
    async fn execute(&mut self) -> Result<()> {
        let output = self.command.execute().await?;
        let formatted_output = output.format(self.format)?;

        // Tables end with a newline already.
        writeln!(self.writer, "{}", formatted_output.trim_end()).context("writing output")?;

        Ok(())
    }
}

impl<C, O> CommandWithOutputExt for C
where
    C: CommandWithOutput<Output = O> + Send + 'static,
    O: Formattable + 'static,
{
    fn with_print_to_stdout(self, format: Format) -> Result<Box<dyn Command>> {
        Ok(Box::new(PrintCommand::new(
            self,
            format,
            Box::new(std::io::stdout()),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde::Serialize;
    use std::{
        fmt::Display,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Serialize)]
    struct Outcome {
        state: String,
    }

    impl Display for Outcome {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            writeln!(f, "STATE")?;
            writeln!(f, "{}", self.state)
        }
    }

    struct Succeeds;

    #[async_trait]
    impl CommandWithOutput for Succeeds {
        type Output = Outcome;

        async fn execute(&mut self) -> Result<Self::Output> {
            Ok(Outcome {
                state: "IDLE".to_string(),
            })
        }
    }

    struct Fails;

    #[async_trait]
    impl CommandWithOutput for Fails {
        type Output = Outcome;

        async fn execute(&mut self) -> Result<Self::Output> {
            Err(anyhow!("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_prints_text_output() {
        let buffer = SharedBuffer::default();
        let mut command = PrintCommand::new(Succeeds, Format::Text, Box::new(buffer.clone()));

        command.execute().await.unwrap();

        assert_eq!(buffer.contents(), "STATE\nIDLE\n");
    }

    #[tokio::test]
    async fn test_prints_json_output() {
        let buffer = SharedBuffer::default();
        let mut command = PrintCommand::new(Succeeds, Format::Json, Box::new(buffer.clone()));

        command.execute().await.unwrap();

        assert_eq!(buffer.contents(), "{\n  \"state\": \"IDLE\"\n}\n");
    }

    #[tokio::test]
    async fn test_error_prints_nothing() {
        let buffer = SharedBuffer::default();
        let mut command = PrintCommand::new(Fails, Format::Text, Box::new(buffer.clone()));

        let err = command.execute().await.unwrap_err();

        assert_eq!(err.to_string(), "connection reset");
        assert_eq!(buffer.contents(), "");
    }
}
