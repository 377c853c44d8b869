//! Plumbing shared by the `watch` commands.
//!
//! Every watch command resolves a project, shows a spinner and polls one Atlas resource with a [`Watcher`].
//! The watch stops early when the user presses Ctrl-C.
use std::future::Future;

use anyhow::Result;
use tracing::debug;

use crate::{
    args::{ProjectArgs, WatchArgs},
    commands::validators::ObjectIdValidator,
    config::Profile,
    interaction::{InputPrompt, InputPromptValidator, Interaction, SpinnerInteraction},
    watcher::{WatchOptions, WatchStatus, Watcher},
};

// Interaction dependencies for the watch commands
pub trait WatchInteraction: InputPrompt + SpinnerInteraction + Send + Sync {}
impl<T: InputPrompt + SpinnerInteraction + Send + Sync> WatchInteraction for T {}

pub struct WatchContext {
    /// Project from `--projectId` or the profile, prompted for when missing.
    project_id: Option<String>,
    watcher: Watcher,
    interaction: Box<dyn WatchInteraction>,
}

impl WatchContext {
    pub fn new(project: ProjectArgs, watch: WatchArgs, profile: &Profile) -> Self {
        let options = WatchOptions::builder()
            .timeout_opt(watch.watch_timeout)
            .build();

        Self {
            project_id: project.project_id.or_else(|| profile.project_id.clone()),
            watcher: Watcher::new(options),
            interaction: Box::new(Interaction::new()),
        }
    }

    /// Project to watch in, prompting the user when neither the flag nor the profile sets one.
    pub fn project_id(&self) -> Result<String> {
        self.interaction.prompt_if_none(
            self.project_id.as_deref(),
            "Project ID?",
            Some(InputPromptValidator::new(ObjectIdValidator)),
        )
    }

    /// Poll `probe` behind a spinner until it reports a terminal state.
    ///
    /// Errors of the watch (probe failure, timeout, Ctrl-C) are returned as the error of the command.
    pub async fn watch<T, F, Fut>(&self, message: &str, probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<WatchStatus<T>>>,
    {
        debug!(options = ?self.watcher.options(), "starting watch");

        let _spinner = self.interaction.start_spinner(message.to_string())?;
        let value = self.watcher.watch_until(probe, interrupted()).await?;

        Ok(value)
    }
}

/// Resolves on Ctrl-C. Never resolves when the signal handler can't be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
impl WatchContext {
    /// Context polling every 10ms with the given interaction.
    pub fn for_test(project_id: Option<&str>, interaction: impl WatchInteraction + 'static) -> Self {
        Self {
            project_id: project_id.map(str::to_string),
            watcher: Watcher::new(
                WatchOptions::builder()
                    .interval(std::time::Duration::from_millis(10))
                    .build(),
            ),
            interaction: Box::new(interaction),
        }
    }

    pub fn with_options(mut self, options: WatchOptions) -> Self {
        self.watcher = Watcher::new(options);
        self
    }
}
