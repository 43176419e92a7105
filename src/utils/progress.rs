use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over the documents of one search.
#[derive(Clone)]
pub struct ProgressTracker {
    progress_bar: Option<ProgressBar>,
    label: String,
}

impl ProgressTracker {
    /// A hidden tracker does nothing; useful when output is not a terminal.
    pub fn new(total: u64, label: &str, visible: bool) -> Self {
        let progress_bar = visible.then(|| {
            let pb = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self {
            progress_bar,
            label: label.to_string(),
        }
    }

    pub fn update_message(&self, message: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("{} [{}]", self.label, message));
        }
    }

    pub fn increment(&self, delta: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Prints a line above the bar without garbling it.
    pub fn println(&self, line: &str) {
        match &self.progress_bar {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Complete [{}]", self.label));
            pb.finish();
        }
    }
}
