//! Terminal progress for one mosaic run: rows sampled and rows rendered

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::pipeline::RunEvent;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template =
        format!("{{prefix:>9}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}");
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks sampling and rendering of a run on two stacked bars
pub struct ProgressManager {
    multi_progress: MultiProgress,
    sampled: ProgressBar,
    rendered: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with empty bars
    pub fn new() -> Self {
        let multi_progress = MultiProgress::new();
        let sampled = multi_progress.add(Self::bar("Sampling"));
        let rendered = multi_progress.add(Self::bar("Rendering"));
        Self {
            multi_progress,
            sampled,
            rendered,
        }
    }

    /// Reset both bars for a run covering `rows` rows
    pub fn initialize(&self, rows: usize) {
        for bar in [&self.sampled, &self.rendered] {
            bar.set_length(rows as u64);
            bar.set_position(0);
            bar.set_message(String::new());
        }
    }

    /// Advance the bars for one run event
    pub fn observe(&self, event: &RunEvent) {
        match event {
            RunEvent::RowSampled { row, percent } => {
                self.sampled.set_position(*row as u64 + 1);
                self.sampled.set_message(format!("{percent:.0}%"));
            }
            RunEvent::SamplingComplete { .. } => self.sampled.finish_with_message("done"),
            RunEvent::RowComplete(_) => self.rendered.inc(1),
            RunEvent::Resolved(summary) => self.rendered.finish_with_message(format!(
                "{} lookups, {} cache hits",
                summary.cache.lookups, summary.cache.hits
            )),
            RunEvent::Failed(_) => self.rendered.abandon_with_message("failed"),
            RunEvent::Progress { .. } => {}
        }
    }

    /// Rows sampled so far
    pub fn rows_sampled(&self) -> u64 {
        self.sampled.position()
    }

    /// Rows rendered so far
    pub fn rows_rendered(&self) -> u64 {
        self.rendered.position()
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        let _ = self.multi_progress.clear();
    }

    fn bar(prefix: &'static str) -> ProgressBar {
        let bar = ProgressBar::new(0);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(prefix);
        bar
    }
}
