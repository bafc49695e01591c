use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedDate {
    pub text: String,
    pub is_daily_listing: bool,
}

/// Resolve a "today" keyword to an ISO date; any other text passes through trimmed.
/// Deliberately not a general date parser.
pub fn normalize_posted_date(raw: &str, today_keywords: &[String], today: NaiveDate) -> PostedDate {
    let lowered = raw.to_lowercase();
    let mentions_today = today_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && lowered.contains(&k));

    if mentions_today {
        PostedDate {
            text: today.format("%Y-%m-%d").to_string(),
            is_daily_listing: true,
        }
    } else {
        PostedDate {
            text: raw.trim().to_string(),
            is_daily_listing: false,
        }
    }
}
