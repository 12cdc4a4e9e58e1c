use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Format used by editable datetime fields: ISO-like, UTC, no zone marker.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const INPUT_FALLBACKS: &[&str] = &[
    INPUT_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn format_input(datetime: &DateTime<Utc>) -> String {
    datetime.format(INPUT_FORMAT).to_string()
}

/// Local time in the locale's preferred date and time representation.
pub fn format_display(datetime: &DateTime<Utc>) -> String {
    datetime.with_timezone(&Local).format("%x %X").to_string()
}

/// Parse what a user typed into a datetime field. Naive values are taken as
/// UTC; a bare date means midnight.
pub fn parse_input(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Date is required".to_string());
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.with_timezone(&Utc));
    }

    for format in INPUT_FALLBACKS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid date '{}'", input))
}
