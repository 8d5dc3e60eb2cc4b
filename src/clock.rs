use std::sync::Arc;

use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;

/// source of "now" for the engine
///
/// `SafeTimeProvider` covers both production (`TimeSource::System`) and tests
/// (`TimeSource::Test` driven through `test_control()`).
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl Clock for SafeTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        SafeTimeProvider::now(self)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// clock backed by the system time
pub fn system_clock() -> SafeTimeProvider {
    SafeTimeProvider::new(hourglass_rs::TimeSource::System)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;

    fn read<C: Clock>(clock: C) -> DateTime<Utc> {
        clock.now()
    }

    #[test]
    fn test_controlled_clock_through_reference() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(start));
        let control = time.test_control().unwrap();

        assert_eq!(read(&time), start);

        control.advance(Duration::days(21));
        assert_eq!(read(&time), start + Duration::days(21));
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = system_clock();
        let before = Utc::now();
        let now = read(&clock);
        assert!(now >= before - Duration::seconds(1));
    }
}
