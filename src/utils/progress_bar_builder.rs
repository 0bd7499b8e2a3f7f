use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    enable_tick: bool,
    hidden: bool,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} {msg}",
            message: message.into(),
            enable_tick: false,
            hidden: false,
        }
    }

    /// Spinner for streams of unknown length that shows how many records went by.
    pub(crate) fn records(message: impl Into<String>) -> Self {
        Self::new(message)
            .with_template("{spinner:.green} [{elapsed_precise}] {msg} {human_pos} records ({per_sec})")
            .with_tick()
    }

    pub(crate) fn with_template(mut self, template: &'static str) -> Self {
        self.style_template = template;
        self
    }

    pub(crate) fn with_tick(mut self) -> Self {
        self.enable_tick = true;
        self
    }

    /// A hidden bar never draws and never ticks.
    pub(crate) fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };

        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if self.enable_tick && !self.hidden {
            pb.enable_steady_tick(Duration::from_millis(250));
        }

        Ok(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_spinner_counts_positions() {
        let pb = ProgressBarBuilder::records("Reading").build().unwrap();
        assert_eq!(pb.message(), "Reading");
        pb.inc(3);
        pb.set_position(10_000);
        assert_eq!(pb.position(), 10_000);
        pb.finish_and_clear();
    }

    #[test]
    fn hidden_spinner_stays_hidden() {
        let pb = ProgressBarBuilder::new("Merging results")
            .with_tick()
            .hidden(true)
            .build()
            .unwrap();
        assert!(pb.is_hidden());
        assert_eq!(pb.message(), "Merging results");
        pb.finish_and_clear();
    }
}
