//! UTC reporting windows.

use jiff::{Timestamp, ToSpan, tz::TimeZone};

/// Start instants of the periods the dashboard sums over, all in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindows {
    pub now: Timestamp,
    pub today: Timestamp,
    pub yesterday: Timestamp,
    pub this_month: Timestamp,
    pub last_month: Timestamp,
    /// Start of the trailing three months used for the top products.
    pub top_products_since: Timestamp,
}

impl ReportingWindows {
    /// # Errors
    ///
    /// Fails only when `now` is so close to the edge of the supported range that a boundary
    /// cannot be represented.
    pub fn at(now: Timestamp) -> Result<Self, jiff::Error> {
        let zoned = now.to_zoned(TimeZone::UTC);
        let today = zoned.start_of_day()?;
        let yesterday = today.checked_sub(1.day())?;
        let this_month = zoned.first_of_month()?.start_of_day()?;
        let last_month = this_month.checked_sub(1.month())?;
        let top_products_since = zoned.checked_sub(3.months())?;

        Ok(Self {
            now,
            today: today.timestamp(),
            yesterday: yesterday.timestamp(),
            this_month: this_month.timestamp(),
            last_month: last_month.timestamp(),
            top_products_since: top_products_since.timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_utc_midnights() -> testresult::TestResult {
        let now: Timestamp = "2026-03-15T10:30:00Z".parse()?;

        let windows = ReportingWindows::at(now)?;

        assert_eq!(windows.today, "2026-03-15T00:00:00Z".parse::<Timestamp>()?);
        assert_eq!(windows.yesterday, "2026-03-14T00:00:00Z".parse::<Timestamp>()?);
        assert_eq!(windows.this_month, "2026-03-01T00:00:00Z".parse::<Timestamp>()?);
        assert_eq!(windows.last_month, "2026-02-01T00:00:00Z".parse::<Timestamp>()?);
        assert_eq!(windows.top_products_since, "2025-12-15T10:30:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn january_reaches_back_into_previous_year() -> testresult::TestResult {
        let now: Timestamp = "2026-01-01T00:00:00Z".parse()?;

        let windows = ReportingWindows::at(now)?;

        assert_eq!(windows.today, now);
        assert_eq!(windows.yesterday, "2025-12-31T00:00:00Z".parse::<Timestamp>()?);
        assert_eq!(windows.this_month, now);
        assert_eq!(windows.last_month, "2025-12-01T00:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }
}
