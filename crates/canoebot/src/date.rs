//! Lenient date parsing for user input.

use chrono::{Days, NaiveDate};
use tracing::debug;

/// Formats tried in order after the keywords.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d %b %Y"];

/// Parse a user supplied date relative to `today`.
///
/// Accepts `today`, `tomorrow`, `yesterday`, ISO dates, `DD/MM/YYYY`,
/// `DD-MM-YYYY` and `DD MMM YYYY`. Anything else falls back to `today`.
///
/// # Example
///
/// ```
/// use canoebot::parse_date;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(parse_date("tomorrow", today), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
/// assert_eq!(parse_date("05/03/2024", today), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
/// assert_eq!(parse_date("next week", today), today);
/// ```
pub fn parse_date(input: &str, today: NaiveDate) -> NaiveDate {
    let input = input.split_whitespace().collect::<Vec<_>>().join(" ");

    let keyword = match input.to_lowercase().as_str() {
        "" | "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => None,
    };

    keyword
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&input, format).ok())
        })
        .unwrap_or_else(|| {
            debug!(%input, "Unrecognised date, using today");
            today
        })
}
