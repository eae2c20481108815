//! Business rules applied inside mutations.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use shared_types::{new_reference, WallsBadge};

use super::errors::AccountError;

/// How long a new badge stays active before renewal.
pub const BADGE_ACTIVE_DAYS: i64 = 365;

/// Currency assigned to new wallets.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// A card must not be expired as of `today`.
pub fn validate_card_expiry(month: u32, year: i32, today: NaiveDate) -> Result<(), AccountError> {
    if !(1..=12).contains(&month) {
        return Err(AccountError::Validation(format!(
            "invalid card expiry month {month}"
        )));
    }
    if year < today.year() || (year == today.year() && month < today.month()) {
        return Err(AccountError::Validation(format!(
            "card expired {month:02}/{year}"
        )));
    }
    Ok(())
}

/// Build a badge for a scope. The first badge in a scope becomes its default.
#[must_use]
pub fn new_badge(
    scope: &[WallsBadge],
    user_reference: &str,
    wallet_reference: &str,
    walls_tag: &str,
    now: DateTime<Utc>,
) -> WallsBadge {
    WallsBadge {
        walls_badge_reference: new_reference(),
        wallet_reference: wallet_reference.to_string(),
        user_reference: user_reference.to_string(),
        walls_tag: walls_tag.to_string(),
        is_default: scope.is_empty(),
        is_active: true,
        active_for: now + Duration::days(BADGE_ACTIVE_DAYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_card_expiry_current_month_is_valid() {
        assert!(validate_card_expiry(6, 2025, today()).is_ok());
        assert!(validate_card_expiry(1, 2026, today()).is_ok());
    }

    #[test]
    fn test_card_expiry_in_past_is_rejected() {
        assert!(validate_card_expiry(5, 2025, today()).is_err());
        assert!(validate_card_expiry(12, 2024, today()).is_err());
    }

    #[test]
    fn test_card_expiry_month_range() {
        assert!(validate_card_expiry(0, 2030, today()).is_err());
        assert!(validate_card_expiry(13, 2030, today()).is_err());
    }

    #[test]
    fn test_first_badge_in_scope_is_default() {
        let now = Utc::now();
        let first = new_badge(&[], "u-1", "w-1", "ABCDEFGH", now);
        assert!(first.is_default);
        assert!(first.is_active);
        assert_eq!(first.active_for, now + Duration::days(365));

        let second = new_badge(std::slice::from_ref(&first), "u-1", "w-1", "HGFEDCBA", now);
        assert!(!second.is_default);
        assert_ne!(first.walls_badge_reference, second.walls_badge_reference);
    }
}
