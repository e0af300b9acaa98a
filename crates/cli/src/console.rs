//! Console rendering of delivery progress.
//!
//! The live path draws a segmented progress bar mirroring the journey
//! stages; the fallback path degrades to a plain per-stage percent line.

use async_trait::async_trait;
use ordertrail_core::{Stage, TrackingUpdate};
use ordertrail_sim::{SinkError, UpdateSink};

/// Renders tracking updates as lines on stdout.
pub struct ConsoleSink {
    width: usize,
}

impl ConsoleSink {
    /// Sink with the default bar width.
    pub fn new() -> Self {
        Self { width: 40 }
    }

    fn render_bar(&self, update: &TrackingUpdate) -> String {
        let total = update.journey_total as usize;
        let filled = update.progress as usize * self.width / total;
        let mut cells: Vec<char> = (0..self.width)
            .map(|cell| if cell < filled { '=' } else { '.' })
            .collect();

        // Mark segment boundaries so the bar mirrors the journey stages.
        for stage in Stage::all().iter().skip(1) {
            let at = stage.cumulative_progress() as usize * self.width / total;
            if at < self.width {
                cells[at] = '|';
            }
        }

        cells.into_iter().collect()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpdateSink for ConsoleSink {
    async fn deliver(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
        println!(
            "[{}] {:>3}/{}  #{}  {} - {}",
            self.render_bar(update),
            update.progress,
            update.journey_total,
            update.order_id.short(),
            update.headline(),
            update.eta_text,
        );
        Ok(())
    }

    async fn deliver_fallback(&self, update: &TrackingUpdate) -> Result<(), SinkError> {
        println!(
            "{}: {}% complete ({})",
            update.headline(),
            update.stage.percent_complete(),
            update.eta_text,
        );
        Ok(())
    }
}
