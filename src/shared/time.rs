use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use std::sync::Mutex;

/// Source of the current local wall-clock time.
///
/// Task dates and times are entered as local wall-clock values, so every
/// comparison against "now" happens in naive local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock. Hosts use it for previews; tests use it to pin "now".
#[derive(Debug)]
pub struct FixedClock(Mutex<NaiveDateTime>);

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut current) = self.0.lock() {
            *current = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut current) = self.0.lock() {
            *current += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.0.lock() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

const HHMM_FORMAT: &str = "%H:%M";

/// Serde adapter storing a `NaiveTime` as `HH:mm` (24-hour, no seconds).
pub mod hhmm {
    use super::HHMM_FORMAT;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(HHMM_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse `HH:mm`. Also accepts `HH:mm:ss` and drops the seconds.
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, HHMM_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(truncate_to_minute)
}

/// Drop seconds and sub-second precision, matching what the time picker yields.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::new(at(9, 0));
        assert_eq!(clock.now(), at(9, 0));

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now(), at(10, 30));

        clock.set(at(8, 15));
        assert_eq!(clock.now(), at(8, 15));
    }

    #[test]
    fn test_parse_hhmm_variants() {
        assert_eq!(
            parse_hhmm("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_hhmm("23:59:41").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
        assert!(parse_hhmm("9am").is_err());
        assert!(parse_hhmm("24:00").is_err());
    }

    #[test]
    fn test_hhmm_serde_shape() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Slot {
            #[serde(with = "hhmm")]
            time: NaiveTime,
        }

        let slot = Slot {
            time: NaiveTime::from_hms_opt(7, 5, 0).unwrap(),
        };
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"{"time":"07:05"}"#);
        assert_eq!(serde_json::from_str::<Slot>(&json).unwrap(), slot);
    }
}
