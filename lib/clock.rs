use crate::chess::Color;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::{Duration, Instant};

#[cfg(test)]
use proptest::prelude::*;

/// The reason why parsing [`TimeControl`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse time control")]
pub struct ParseTimeControlError(ron::de::SpannedError);

/// How much time each player has for the whole game.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}", "ron::ser::to_string(self).unwrap()")]
#[serde(deny_unknown_fields, default)]
pub struct TimeControl {
    /// The time each player starts with.
    #[cfg_attr(test, strategy((0u64..=86400).prop_map(Duration::from_secs)))]
    #[serde(with = "humantime_serde")]
    pub limit: Duration,
}

impl Default for TimeControl {
    fn default() -> Self {
        TimeControl {
            limit: Duration::from_secs(600),
        }
    }
}

impl FromStr for TimeControl {
    type Err = ParseTimeControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

/// A pair of chess clocks, one of which is running at any time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Clock {
    remaining: [Duration; 2],
    running: Color,
    since: Instant,
}

impl Clock {
    /// Starts white's clock.
    pub fn new(tc: TimeControl) -> Self {
        Clock {
            remaining: [tc.limit; 2],
            running: Color::White,
            since: Instant::now(),
        }
    }

    /// The side whose clock is running.
    pub fn running(&self) -> Color {
        self.running
    }

    /// Stops the running clock and starts the other.
    pub fn switch(&mut self) {
        let now = Instant::now();
        let remaining = &mut self.remaining[self.running as usize];
        *remaining = remaining.saturating_sub(now.saturating_duration_since(self.since));
        self.running = !self.running;
        self.since = now;
    }

    /// The time left to a side, including the interval currently elapsing.
    pub fn remaining(&self, side: Color) -> Duration {
        let remaining = self.remaining[side as usize];

        if side == self.running {
            remaining.saturating_sub(self.since.elapsed())
        } else {
            remaining
        }
    }

    /// The side that ran out of time, if any.
    ///
    /// Checks the running side first.
    pub fn flagged(&self) -> Option<Color> {
        [self.running, !self.running]
            .into_iter()
            .find(|&c| self.remaining(c).is_zero())
    }
}
