use std::fmt::Display;
use std::path::Path;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::progress::{SPINNER_FRAMES, SPINNER_MESSAGE, TICK_INTERVAL};

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const VERBOSE_PREFIX: &str = "[VERBOSE]";

/// Status reporting on stderr: a spinner in interactive sessions,
/// `[VERBOSE]` lines when verbose output is requested
pub struct ProgressReporter {
    term: Term,
    verbose: bool,
    current_spinner: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            term: Term::stderr(),
            verbose,
            current_spinner: None,
        }
    }

    /// Print a detail line, only in verbose mode
    pub fn verbose(&self, message: impl Display) {
        if self.verbose {
            eprintln!("{} {message}", style(VERBOSE_PREFIX).dim());
        }
    }

    fn create_spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_FRAMES);
        pb.set_style(spinner_style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(TICK_INTERVAL);
        pb
    }

    /// Start the generation spinner unless output is verbose or not a
    /// terminal
    pub fn start_generation(&mut self) {
        if self.verbose || !self.term.is_term() {
            return;
        }
        self.current_spinner = Some(self.create_spinner(SPINNER_MESSAGE));
    }

    pub fn finish_generation(&mut self) {
        if let Some(pb) = self.current_spinner.take() {
            pb.finish_and_clear();
        }
    }

    pub fn diagram_written(&self, path: &Path) {
        eprintln!(
            "{} Mermaid diagram successfully written to {}",
            style("✓").green(),
            style(path.display()).bold()
        );
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish_generation();
    }
}
