use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How far ahead of the due date a machine counts as "expiring soon".
pub const WARNING_WINDOW_DAYS: i64 = 30;

/// Largest accepted service interval. Keeps the year arithmetic far away from
/// the calendar range chrono can represent.
pub const MAX_INTERVAL_YEARS: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Expired,
    ExpiringSoon,
    Normal,
}

/// Result of a due-date computation for one machine/track pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueComputation {
    pub next_due: NaiveDate,
    pub status: DueStatus,
    /// Whole days past due. Set only when `status == Expired`.
    pub days_overdue: Option<i64>,
    /// Whole days until due, 0 when due today. Set only when `status == ExpiringSoon`.
    pub days_remaining: Option<i64>,
    /// Set when the last-service date was missing or the due date was not
    /// representable, so callers can flag the record for manual review.
    pub needs_review: bool,
}

/// Advance a date by whole calendar years. When the source day does not exist
/// in the target year (Feb 29 on a non-leap year), clamp to the last valid day
/// of that month. Returns `None` when the target year is outside the range
/// chrono can represent.
pub fn add_years_clamped(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    // Feb 29 is the only day that can vanish when only the year changes.
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

/// Compute the next due date and classification for one service track.
///
/// `next_due = last_date + interval_years` (calendar years, Feb 29 clamped).
/// Classification against `today` with a fixed 30-day warning horizon:
/// expired when `next_due < today`, expiring soon when
/// `today <= next_due <= today + 30d`, normal otherwise.
///
/// A missing `last_date` never errors: the machine is reported as normal, due
/// today, with `needs_review` set. The same fallback applies when the interval
/// pushes the due date outside the representable calendar range. Bad records
/// must not take the alert computation down.
pub fn compute_due_status(
    last_date: Option<NaiveDate>,
    interval_years: i32,
    today: NaiveDate,
) -> DueComputation {
    let fallback = DueComputation {
        next_due: today,
        status: DueStatus::Normal,
        days_overdue: None,
        days_remaining: None,
        needs_review: true,
    };

    let Some(last) = last_date else {
        return fallback;
    };

    let Some(next_due) = add_years_clamped(last, interval_years) else {
        return fallback;
    };

    if next_due < today {
        DueComputation {
            next_due,
            status: DueStatus::Expired,
            days_overdue: Some((today - next_due).num_days()),
            days_remaining: None,
            needs_review: false,
        }
    } else if (next_due - today).num_days() <= WARNING_WINDOW_DAYS {
        DueComputation {
            next_due,
            status: DueStatus::ExpiringSoon,
            days_overdue: None,
            days_remaining: Some((next_due - today).num_days()),
            needs_review: false,
        }
    } else {
        DueComputation {
            next_due,
            status: DueStatus::Normal,
            days_overdue: None,
            days_remaining: None,
            needs_review: false,
        }
    }
}
