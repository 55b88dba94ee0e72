//! Relative date calculation: anchor + day/week offsets, optional weekday
//! rollover, strftime-style output.

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Duration, Local, NaiveDate};
use tracing::debug;

use crate::error::ToolError;
use crate::Result;

pub const DEFAULT_FORMAT: &str = "%d/%m/%Y";

/// Offsets applied to an anchor date. `days` and `weeks` compose; `weekday`
/// (0 = Monday .. 6 = Sunday) then rolls the result forward to the next
/// matching day, leaving it unchanged if it already matches.
#[derive(Debug, Clone)]
pub struct DateOffset {
    pub days: i64,
    pub weeks: i64,
    pub weekday: Option<u8>,
    pub format: String,
}

impl Default for DateOffset {
    fn default() -> Self {
        Self {
            days: 0,
            weeks: 0,
            weekday: None,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl DateOffset {
    pub fn days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn weeks(mut self, weeks: i64) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn weekday(mut self, weekday: u8) -> Self {
        self.weekday = Some(weekday);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// Computes the target date relative to today (local time).
pub fn calculate_date(offset: &DateOffset) -> Result<String> {
    calculate_date_from(Local::now().date_naive(), offset)
}

/// Computes the target date relative to an explicit anchor. Pure function of
/// its inputs; the anchor is injectable so callers and tests can pin "today".
pub fn calculate_date_from(anchor: NaiveDate, offset: &DateOffset) -> Result<String> {
    let mut base = anchor + Duration::days(offset.weeks * 7 + offset.days);

    if let Some(weekday) = offset.weekday {
        if weekday > 6 {
            return Err(ToolError::InvalidInput(format!(
                "weekday must be in 0..=6 (0 = Monday), got {}",
                weekday
            )));
        }
        let current = base.weekday().num_days_from_monday() as i64;
        let ahead = (weekday as i64 - current).rem_euclid(7);
        base += Duration::days(ahead);
    }

    debug!("Resolved {:?} from anchor {} to {}", offset, anchor, base);
    render(base, &offset.format)
}

/// Formats the date, rejecting templates chrono cannot render. Both bad
/// specifiers and date-incompatible ones (time-of-day fields like `%H` have
/// no value on a plain date) surface as `Format` instead of panicking, so
/// the result is written through `fmt::Write` rather than `to_string`.
fn render(date: NaiveDate, format: &str) -> Result<String> {
    use std::fmt::Write;

    let items: Vec<Item> = StrftimeItems::new(format).collect();
    let mut rendered = String::new();
    write!(rendered, "{}", date.format_with_items(items.into_iter())).map_err(|_| {
        ToolError::Format(format!("unsupported date format template: {:?}", format))
    })?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 17/05/2025 is a Saturday.
    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 17).unwrap()
    }

    #[test]
    fn test_zero_offset_returns_anchor() {
        let out = calculate_date_from(anchor(), &DateOffset::default()).unwrap();
        assert_eq!(out, "17/05/2025");
    }

    #[test]
    fn test_day_offsets() {
        let out = calculate_date_from(anchor(), &DateOffset::default().days(1)).unwrap();
        assert_eq!(out, "18/05/2025");

        let out = calculate_date_from(anchor(), &DateOffset::default().days(-1)).unwrap();
        assert_eq!(out, "16/05/2025");
    }

    #[test]
    fn test_weeks_days_and_custom_format() {
        let offset = DateOffset::default().weeks(2).days(3).format("%Y-%m-%d");
        let out = calculate_date_from(anchor(), &offset).unwrap();
        assert_eq!(out, "2025-06-04");
    }

    #[test]
    fn test_weeks_days_additivity() {
        for (d, w) in [(3i64, 2i64), (-4, 1), (0, -3), (10, 0)] {
            let combined =
                calculate_date_from(anchor(), &DateOffset::default().days(d).weeks(w)).unwrap();
            let flattened =
                calculate_date_from(anchor(), &DateOffset::default().days(d + 7 * w)).unwrap();
            assert_eq!(combined, flattened);
        }
    }

    #[test]
    fn test_weekday_rolls_forward() {
        // Wednesday (2) after a Saturday anchor.
        let out = calculate_date_from(anchor(), &DateOffset::default().weekday(2)).unwrap();
        assert_eq!(out, "21/05/2025");
    }

    #[test]
    fn test_weekday_same_day_unchanged() {
        // Anchor is already a Saturday (5); no rollover happens.
        let out = calculate_date_from(anchor(), &DateOffset::default().weekday(5)).unwrap();
        assert_eq!(out, "17/05/2025");
    }

    #[test]
    fn test_weekday_composes_with_offsets() {
        // +1 day lands on Sunday 18/05; next Monday (0) is 19/05.
        let offset = DateOffset::default().days(1).weekday(0);
        let out = calculate_date_from(anchor(), &offset).unwrap();
        assert_eq!(out, "19/05/2025");
    }

    #[test]
    fn test_weekday_out_of_range() {
        let err = calculate_date_from(anchor(), &DateOffset::default().weekday(7)).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_format_template() {
        let err =
            calculate_date_from(anchor(), &DateOffset::default().format("%Q")).unwrap_err();
        assert!(matches!(err, ToolError::Format(_)));
    }

    #[test]
    fn test_time_of_day_template_is_rejected() {
        // %H/%M/%T parse as valid strftime items but cannot be rendered
        // from a date alone; they must error, not panic.
        for template in ["%H:%M", "%T", "%d/%m/%Y %H:%M"] {
            let err = calculate_date_from(anchor(), &DateOffset::default().format(template))
                .unwrap_err();
            assert!(matches!(err, ToolError::Format(_)), "template {:?}", template);
        }
    }
}
