use chrono::{NaiveDate, Utc};

/// Current UTC calendar date, used for completion-time date defaults.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
