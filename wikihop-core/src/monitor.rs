// Periodic throughput reporter for a running search

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::task::JoinHandle;
use wikihop_scanner::{SearchMonitor, StatsSnapshot};

pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Render one snapshot taken `interval` after the previous one.
pub fn format_snapshot(snapshot: &StatsSnapshot, interval: Duration) -> String {
    let secs = interval.as_secs_f64().max(f64::EPSILON);
    format!(
        "Parsed/s: {:.0} | Fetched/s: {:.0} | Known pages: {} | Pull queue: {} | Parse queue: {}",
        snapshot.parsed as f64 / secs,
        snapshot.fetched as f64 / secs,
        snapshot.known_pages,
        snapshot.frontier_depth,
        snapshot.parse_depth,
    )
}

/// Spinner that polls a [`SearchMonitor`] on a fixed interval.
pub struct Reporter {
    progress_bar: ProgressBar,
    task: JoinHandle<()>,
}

impl Reporter {
    pub fn spawn(monitor: SearchMonitor, interval: Duration) -> Self {
        Self::with_progress_bar(monitor, interval, ProgressBar::new_spinner())
    }

    /// Same polling, nothing drawn.
    pub fn hidden(monitor: SearchMonitor, interval: Duration) -> Self {
        Self::with_progress_bar(monitor, interval, ProgressBar::hidden())
    }

    fn with_progress_bar(
        monitor: SearchMonitor,
        interval: Duration,
        progress_bar: ProgressBar,
    ) -> Self {
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress_bar.set_message("Searching... working");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let pb = progress_bar.clone();
        let task = tokio::spawn(async move {
            // Reset counters so the first tick covers exactly one interval.
            monitor.snapshot();
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !monitor.is_running() {
                    break;
                }
                pb.set_message(format_snapshot(&monitor.snapshot(), interval));
            }
        });

        Self { progress_bar, task }
    }

    /// Whether the polling task is still alive. It exits on its own once the
    /// search stops running.
    pub fn is_polling(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn message(&self) -> String {
        self.progress_bar.message()
    }

    /// Stop polling and replace the spinner with `message`.
    pub async fn finish(self, message: impl Into<String>) {
        self.task.abort();
        let _ = self.task.await;
        self.progress_bar.finish_with_message(message.into());
    }
}
