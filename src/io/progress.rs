//! Progress display for contingency screening

use crate::algorithm::contingency::ScreenProgress;
use crate::io::configuration::{PROGRESS_BAR_WIDTH, PROGRESS_REFRESH_INTERVAL};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates one bar per outage depth plus an overall bar
pub struct ProgressManager {
    multi_progress: MultiProgress,
    overall_bar: Option<ProgressBar>,
    depth_bars: Vec<ProgressBar>,
    /// Last `done` count reported per depth, used to fold progress into the overall bar
    reported: Vec<usize>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static DEPTH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>6}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static OVERALL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Scenarios: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            overall_bar: None,
            depth_bars: Vec::new(),
            reported: Vec::new(),
        }
    }

    /// Create bars for a screen of the given depth
    ///
    /// `per_depth[k - 1]` is the number of scenarios with `k` outages.
    pub fn initialize(&mut self, per_depth: &[usize]) {
        let total: usize = per_depth.iter().sum();
        let overall = ProgressBar::new(total as u64);
        overall.set_style(OVERALL_STYLE.clone());
        self.overall_bar = Some(self.multi_progress.add(overall));

        for (depth, &count) in per_depth.iter().enumerate() {
            let bar = ProgressBar::new(count as u64);
            bar.set_style(DEPTH_STYLE.clone());
            bar.set_prefix(format!("N-{}", depth + 1));
            self.depth_bars.push(self.multi_progress.add(bar));
        }
        self.reported = vec![0; per_depth.len()];
    }

    /// Fold one progress snapshot into the bars
    ///
    /// Redraws are batched; the last scenario of each depth always redraws.
    pub fn update(&mut self, progress: ScreenProgress) {
        let Some(slot) = progress.outages.checked_sub(1) else {
            return;
        };
        let finished_depth = progress.done == progress.total;
        if progress.done % PROGRESS_REFRESH_INTERVAL != 0 && !finished_depth {
            return;
        }

        if let Some(bar) = self.depth_bars.get(slot) {
            bar.set_position(progress.done as u64);
            if finished_depth {
                bar.finish();
            }
        }

        if let Some(previous) = self.reported.get_mut(slot) {
            let delta = progress.done.saturating_sub(*previous);
            *previous = progress.done;
            if let Some(ref overall) = self.overall_bar {
                overall.inc(delta as u64);
            }
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref overall) = self.overall_bar {
            overall.finish_with_message("Screening complete");
        }
        let _ = self.multi_progress.clear();
    }
}
