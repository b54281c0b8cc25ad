//! View-models for the two chat screens.
//!
//! A screen mounts against a [`StoreProvider`](crate::StoreProvider), holds its
//! live subscriptions and turns every snapshot into display rows. Store
//! failures are logged and never surfaced: a screen that cannot load stays in
//! its loading state.

mod chat_detail;
mod chat_list;

pub use chat_detail::{ChatDetailScreen, MessageRow, Sender};
pub use chat_list::{ChatListRow, ChatListScreen};

use chrono::{Local, TimeZone};

/// Format an epoch-millisecond timestamp as local `HH:MM`
pub fn format_time(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_is_hours_and_minutes() {
        let formatted = format_time(1_700_000_000_000);
        assert_eq!(formatted.len(), 5);
        assert_eq!(formatted.as_bytes()[2], b':');
    }
}
