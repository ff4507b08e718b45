use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::db::DbPool;
use crate::models::settings::Setting;

/// Zone used for every user-facing timestamp, from settings.
pub fn display_tz(pool: &DbPool) -> Tz {
    Setting::get_or(pool, "display_timezone", "America/Denver")
        .parse()
        .unwrap_or(chrono_tz::America::Denver)
}

/// Formats a stored UTC timestamp for display, e.g. "Nov 5, 2024, 03:12 PM".
/// Post pages, user feeds, and the comment-submission payload all go
/// through here so the string stays identical everywhere.
pub fn format_create_time(ts: &NaiveDateTime, tz: Tz) -> String {
    Utc.from_utc_datetime(ts)
        .with_timezone(&tz)
        .format("%b %-d, %Y, %I:%M %p")
        .to_string()
}
