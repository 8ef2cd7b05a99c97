//! Workout countdown timer and `HH:MM:SS` helpers

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Total seconds for a duration input.
///
/// Only hours and minutes count toward the total; the seconds segment is
/// ignored. Unparseable segments count as zero. Empty input is absent.
pub fn parse_duration(input: &str) -> Option<u64> {
    if input.is_empty() {
        return None;
    }
    let (hours, minutes, _) = split_segments(input);
    Some(hours.saturating_mul(3600).saturating_add(minutes.saturating_mul(60)))
}

/// Split `HH:MM:SS` into numeric segments, defaulting each to zero
pub fn split_segments(input: &str) -> (u64, u64, u64) {
    let mut parts = input.split(':');
    let hours = leading_number(parts.next());
    let minutes = leading_number(parts.next());
    let seconds = leading_number(parts.next());
    (hours, minutes, seconds)
}

// Leading decimal digits after optional whitespace, like a lenient integer parse.
fn leading_number(segment: Option<&str>) -> u64 {
    let Some(segment) = segment else {
        return 0;
    };
    let digits: String = segment
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Format a number of seconds as zero-padded `HH:MM:SS`
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let remaining = total_seconds % 3600;
    format!("{:02}:{:02}:{:02}", hours, remaining / 60, remaining % 60)
}

/// Idle display for a duration input: each segment padded, not normalized
pub fn display_for_input(input: &str) -> String {
    let (hours, minutes, seconds) = split_segments(input);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Observable countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub running: bool,
}

/// Result of advancing the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    /// Reached zero; the countdown is idle again
    Finished,
}

/// Single countdown, idle until started, cancelled by dropping its ticker
#[derive(Debug)]
pub struct Countdown {
    state: CountdownState,
    display: String,
    period: Duration,
    ticker: Option<Interval>,
}

impl Countdown {
    /// A zero `period` is raised to one millisecond; tokio intervals need a
    /// non-zero period.
    pub fn new(period: Duration) -> Self {
        Self {
            state: CountdownState::default(),
            display: format_hms(0),
            period: period.max(MIN_PERIOD),
            ticker: None,
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// True while a tick is scheduled
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Start counting down from `total_seconds`.
    ///
    /// Returns `None` without touching the running countdown when one is
    /// already active. A zero duration finishes immediately.
    pub fn start(&mut self, total_seconds: u64) -> Option<Tick> {
        if self.ticker.is_some() {
            tracing::debug!("Countdown already running, start ignored");
            return None;
        }

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.state = CountdownState {
            remaining_seconds: total_seconds,
            running: true,
        };
        tracing::info!("Countdown started at {}", format_hms(total_seconds));
        Some(self.show())
    }

    /// Advance by one second
    pub fn tick(&mut self) -> Tick {
        if !self.state.running {
            return Tick::Continue;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        self.show()
    }

    fn show(&mut self) -> Tick {
        self.display = format_hms(self.state.remaining_seconds);
        if self.state.remaining_seconds == 0 {
            self.ticker = None;
            self.state.running = false;
            tracing::info!("Countdown finished");
            Tick::Finished
        } else {
            Tick::Continue
        }
    }

    /// Cancel any pending tick and show the configured duration again
    pub fn reset(&mut self, input_time: &str) {
        if self.ticker.take().is_some() {
            tracing::debug!("Countdown cancelled");
        }
        self.state = CountdownState {
            remaining_seconds: parse_duration(input_time).unwrap_or(0),
            running: false,
        };
        self.display = display_for_input(input_time);
    }

    /// Show a new duration input while idle. A running countdown keeps its
    /// value and overwrites the display on the next tick.
    pub fn preview(&mut self, input_time: &str) {
        self.display = display_for_input(input_time);
        if !self.state.running {
            self.state.remaining_seconds = parse_duration(input_time).unwrap_or(0);
        }
    }

    /// Wait for the next scheduled tick; never resolves while idle
    pub async fn wait_tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
