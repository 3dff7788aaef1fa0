//! Auto-advancing playback of the timeline.
//!
//! A [`Playback`] owns at most one running ticker task. Starting playback
//! always aborts the previous ticker first, and dropping the [`Playback`]
//! aborts it too, so there is never more than one timer advancing the year.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Buffered years per playback channel.
const CHANNEL_CAPACITY: usize = 16;

/// How playback advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSettings {
    /// Years advanced per tick.
    pub step_years: i32,
    /// Time between ticks.
    pub interval: Duration,
    /// Playback stops once this year has been emitted.
    pub max_year: i32,
}

/// Handle to the playback ticker.
#[derive(Debug)]
pub struct Playback {
    settings: PlaybackSettings,
    ticker: Option<JoinHandle<()>>,
}

impl Playback {
    /// Creates a stopped playback.
    #[must_use]
    pub const fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            ticker: None,
        }
    }

    /// Starts advancing from `from`, cancelling any playback in progress.
    ///
    /// Each tick sends the next year on the returned channel. The channel
    /// closes once `max_year` has been sent, when playback is stopped or
    /// restarted, or when the [`Playback`] is dropped. Must be called from
    /// within a Tokio runtime.
    pub fn start(&mut self, from: i32) -> mpsc::Receiver<i32> {
        self.stop();

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let PlaybackSettings {
            step_years,
            interval,
            max_year,
        } = self.settings;

        if from >= max_year || step_years <= 0 {
            log::debug!("Playback from {from} has nothing to advance (max {max_year})");
            return rx;
        }

        log::debug!("Starting playback at {from}, {step_years} year(s) every {interval:?}");
        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;

            let mut year = from;
            while year < max_year {
                ticker.tick().await;
                year = year.saturating_add(step_years).min(max_year);
                if tx.send(year).await.is_err() {
                    log::debug!("Playback receiver dropped at {year}");
                    return;
                }
            }
            log::debug!("Playback reached {max_year}");
        }));

        rx
    }

    /// Stops playback if it is running.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Returns `true` while the ticker is still advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|ticker| !ticker.is_finished())
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
    }
}
