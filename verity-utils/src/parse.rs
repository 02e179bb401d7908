use chrono::{DateTime, NaiveDate, Utc};
use twilight_model::id::{Id, marker::UserMarker};

/// Accepted layout for date boundary options.
pub const BOUNDARY_DATE_FORMAT: &str = "%m-%d-%Y";

/// Parse a target user from a raw argument (`<@id>`, `<@!id>`, or raw ID).
pub fn parse_target_user_id(raw: &str) -> Option<Id<UserMarker>> {
    let trimmed = raw.trim();

    let numeric = if trimmed.starts_with("<@") && trimmed.ends_with('>') {
        let without_wrappers = trimmed.strip_prefix("<@")?.strip_suffix('>')?;
        without_wrappers
            .strip_prefix('!')
            .unwrap_or(without_wrappers)
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok()?;

    Id::new_checked(id)
}

/// Parse an `MM-DD-YYYY` boundary as midnight UTC of that day.
pub fn parse_boundary_date(raw: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), BOUNDARY_DATE_FORMAT).ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
