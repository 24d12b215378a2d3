// src/core/session.rs
use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

/// Decides whether a refresh cycle may run at `now`.
pub trait SessionCalendar: Send + Sync {
    fn is_open(&self, now: DateTime<Utc>) -> bool;
}

/// Used when session gating is switched off.
pub struct AlwaysOpen;

impl SessionCalendar for AlwaysOpen {
    fn is_open(&self, _now: DateTime<Utc>) -> bool {
        true
    }
}

/// A weekly exchange session: `[open, close)` local time on the listed weekdays.
#[derive(Debug, Clone)]
pub struct TradingSession {
    tz: Tz,
    weekdays: Vec<Weekday>,
    open: NaiveTime,
    close: NaiveTime,
}

impl TradingSession {
    pub fn new(tz: Tz, weekdays: Vec<Weekday>, open: NaiveTime, close: NaiveTime) -> Self {
        Self {
            tz,
            weekdays,
            open,
            close,
        }
    }
}

impl SessionCalendar for TradingSession {
    fn is_open(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.tz);
        if !self.weekdays.contains(&local.weekday()) {
            return false;
        }
        let t = local.time();
        t >= self.open && t < self.close
    }
}
