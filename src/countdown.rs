use std::fmt;

use chrono::{DateTime, Utc};

// 365.25 days, the same approximation the displayed years use.
pub const YEAR_SECS: u64 = 31_557_600;
pub const DAY_SECS: u64 = 86_400;
pub const HOUR_SECS: u64 = 3_600;
pub const MINUTE_SECS: u64 = 60;

pub const CELEBRATION: &str = "Happy birthday! 🎉";

/// Elapsed-time ticker against a fixed target moment.
///
/// Ticks once a second while running and renders the elapsed breakdown. If
/// the target is ever in the future the ticker cancels itself and shows the
/// celebratory message instead. With a past target that branch never fires,
/// but it stays here on purpose.
#[derive(Debug, Clone)]
pub struct Countdown {
    target: DateTime<Utc>,
    running: bool,
    display: String,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            running: false,
            display: String::new(),
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.running = true;
        self.tick(now);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.running {
            return;
        }

        match (now - self.target).num_seconds() {
            secs if secs < 0 => {
                self.running = false;
                self.display = CELEBRATION.to_string();
            }
            secs => self.display = Elapsed::breakdown(secs as u64).to_string(),
        }
    }
}

/// Approximate calendar breakdown of an elapsed duration. Integer division
/// with remainder carry; not leap-year or month aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub years: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Elapsed {
    pub fn breakdown(secs: u64) -> Self {
        let years = secs / YEAR_SECS;
        let rem = secs % YEAR_SECS;
        let days = rem / DAY_SECS;
        let rem = rem % DAY_SECS;
        let hours = rem / HOUR_SECS;
        let rem = rem % HOUR_SECS;
        let minutes = rem / MINUTE_SECS;
        let seconds = rem % MINUTE_SECS;

        Self {
            years,
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years, {} days, {} hrs, {} min, and {} sec",
            self.years, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn breakdown_reconstructs_exactly() {
        for secs in [
            0,
            59,
            MINUTE_SECS,
            HOUR_SECS - 1,
            DAY_SECS + 1,
            YEAR_SECS - 1,
            YEAR_SECS,
            3 * YEAR_SECS + 12 * DAY_SECS + 5 * HOUR_SECS + 42 * MINUTE_SECS + 7,
            98_765_432_109,
        ] {
            let e = Elapsed::breakdown(secs);
            let rebuilt = e.years * YEAR_SECS
                + e.days * DAY_SECS
                + e.hours * HOUR_SECS
                + e.minutes * MINUTE_SECS
                + e.seconds;
            assert_eq!(rebuilt, secs);
            assert!(e.days <= 365);
            assert!(e.hours < 24);
            assert!(e.minutes < 60);
            assert!(e.seconds < 60);
        }
    }

    #[test]
    fn breakdown_of_one_year_and_a_second() {
        let e = Elapsed::breakdown(YEAR_SECS + 1);
        assert_eq!(
            e,
            Elapsed {
                years: 1,
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 1
            }
        );
    }

    #[test]
    fn ticking_past_target_renders_breakdown() {
        let target = Utc.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap();
        let now = target + chrono::Duration::seconds(90);

        let mut countdown = Countdown::new(target);
        countdown.start(now);

        assert!(countdown.is_running());
        assert_eq!(countdown.display(), "0 years, 0 days, 0 hrs, 1 min, and 30 sec");
    }

    #[test]
    fn future_target_cancels_and_celebrates() {
        let now = Utc.with_ymd_and_hms(2023, 3, 14, 0, 0, 0).unwrap();
        let target = Utc.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap();

        let mut countdown = Countdown::new(target);
        countdown.start(now);

        assert!(!countdown.is_running());
        assert_eq!(countdown.display(), CELEBRATION);

        // Cancelled: further ticks change nothing, even once the target passes.
        countdown.tick(target + chrono::Duration::seconds(10));
        assert_eq!(countdown.display(), CELEBRATION);
    }
}
