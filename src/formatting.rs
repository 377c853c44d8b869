//! Output formatting of command results.
//!
//! Every command result can be rendered as human readable text or as JSON, see [`Formattable`].
use std::fmt::Display;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

/// Format of the output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    /// Pick the output format: the `--output` flag wins over the profile, text is the fallback.
    pub fn resolve(flag: Option<Format>, profile: Option<Format>) -> Format {
        flag.or(profile).unwrap_or_default()
    }
}

/// Types that can be rendered as text or JSON.
///
/// Types implementing both [`Display`] and [`Serialize`] get an implementation for free.
pub trait Formattable {
    fn format(&self, format: Format) -> Result<String>;
}

/// Text uses [`Display`], JSON is pretty printed from [`Serialize`] like the Atlas CLI does.
impl<T> Formattable for T
where
    T: Display + Serialize,
{
    fn format(&self, format: Format) -> Result<String> {
        Ok(match format {
            Format::Text => self.to_string(),
            Format::Json => serde_json::to_string_pretty(self).context("serializing to json")?,
        })
    }
}
