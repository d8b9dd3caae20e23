//! Renewal-date and expiry derivation for subscriptions.
//!
//! This is the one piece of real domain logic in the API. It runs in the
//! create/update handlers immediately before a subscription row is written,
//! so persisted state is always consistent with the derivation rule.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::{Frequency, SubscriptionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("invalid subscription input: {0}")]
    InvalidInput(&'static str),
}

/// Outcome of a renewal resolution: what to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRenewal {
    pub renewal_date: DateTime<Utc>,
    pub status: SubscriptionStatus,
}

/// Resolves the effective renewal date and lifecycle status of a
/// subscription at `now`.
///
/// An explicit renewal date wins and is used as-is; otherwise the date is
/// derived from the start date plus the billing period (daily +1, weekly +7,
/// monthly +30, yearly +365 days). A resolved renewal date in the past
/// flips the status to expired, except that a cancelled subscription stays
/// cancelled. Pure: same inputs and `now` always yield the same output.
pub fn resolve_renewal(
    start_date: DateTime<Utc>,
    frequency: Option<Frequency>,
    explicit_renewal_date: Option<DateTime<Utc>>,
    current_status: SubscriptionStatus,
    now: DateTime<Utc>,
) -> Result<ResolvedRenewal, LifecycleError> {
    if start_date > now {
        return Err(LifecycleError::InvalidInput(
            "start date must not be in the future",
        ));
    }

    let renewal_date = match explicit_renewal_date {
        Some(date) => {
            if date < start_date {
                return Err(LifecycleError::InvalidInput(
                    "renewal date must not precede the start date",
                ));
            }
            date
        }
        None => {
            let frequency = frequency.ok_or(LifecycleError::InvalidInput(
                "either a frequency or a renewal date is required",
            ))?;
            start_date + Duration::days(frequency.period_days())
        }
    };

    let status = if renewal_date < now && current_status != SubscriptionStatus::Cancelled {
        SubscriptionStatus::Expired
    } else {
        current_status
    };

    Ok(ResolvedRenewal {
        renewal_date,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn derives_renewal_from_each_frequency() {
        let start = date(2024, 1, 1);
        let now = date(2024, 1, 1);
        let cases = [
            (Frequency::Daily, date(2024, 1, 2)),
            (Frequency::Weekly, date(2024, 1, 8)),
            (Frequency::Monthly, date(2024, 1, 31)),
            (Frequency::Yearly, date(2024, 12, 31)),
        ];
        for (frequency, expected) in cases {
            let resolved =
                resolve_renewal(start, Some(frequency), None, SubscriptionStatus::Active, now)
                    .unwrap();
            assert_eq!(resolved.renewal_date, expected);
        }
    }

    #[test]
    fn explicit_renewal_date_is_used_as_is() {
        let start = date(2024, 1, 1);
        let explicit = date(2024, 4, 15);
        let resolved = resolve_renewal(
            start,
            Some(Frequency::Monthly),
            Some(explicit),
            SubscriptionStatus::Active,
            date(2024, 2, 1),
        )
        .unwrap();
        assert_eq!(resolved.renewal_date, explicit);
        assert_eq!(resolved.status, SubscriptionStatus::Active);
    }

    #[test]
    fn monthly_subscription_expires_once_renewal_passes() {
        let resolved = resolve_renewal(
            date(2024, 1, 1),
            Some(Frequency::Monthly),
            None,
            SubscriptionStatus::Active,
            date(2024, 3, 1),
        )
        .unwrap();
        assert_eq!(resolved.renewal_date, date(2024, 1, 31));
        assert_eq!(resolved.status, SubscriptionStatus::Expired);
    }

    #[test]
    fn yearly_subscription_stays_active_before_renewal() {
        let resolved = resolve_renewal(
            date(2024, 1, 1),
            Some(Frequency::Yearly),
            None,
            SubscriptionStatus::Active,
            date(2024, 6, 1),
        )
        .unwrap();
        assert_eq!(resolved.renewal_date, date(2024, 12, 31));
        assert_eq!(resolved.status, SubscriptionStatus::Active);
    }

    #[test]
    fn cancelled_takes_precedence_over_expiry() {
        let resolved = resolve_renewal(
            date(2024, 1, 1),
            Some(Frequency::Daily),
            None,
            SubscriptionStatus::Cancelled,
            date(2024, 3, 1),
        )
        .unwrap();
        assert_eq!(resolved.status, SubscriptionStatus::Cancelled);
    }

    #[test]
    fn missing_frequency_and_renewal_date_is_invalid() {
        let err = resolve_renewal(
            date(2024, 5, 1),
            None,
            None,
            SubscriptionStatus::Active,
            date(2024, 6, 1),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn future_start_date_is_invalid() {
        let err = resolve_renewal(
            date(2025, 1, 1),
            Some(Frequency::Weekly),
            None,
            SubscriptionStatus::Active,
            date(2024, 6, 1),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn explicit_renewal_before_start_is_invalid() {
        let err = resolve_renewal(
            date(2024, 5, 1),
            None,
            Some(date(2024, 4, 30)),
            SubscriptionStatus::Active,
            date(2024, 6, 1),
        )
        .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidInput(_)));
    }

    #[test]
    fn resolution_is_idempotent_for_fixed_now() {
        let now = date(2024, 6, 1);
        let args = (
            date(2024, 1, 1),
            Some(Frequency::Monthly),
            None,
            SubscriptionStatus::Active,
        );
        let first = resolve_renewal(args.0, args.1, args.2, args.3, now).unwrap();
        let second = resolve_renewal(args.0, args.1, args.2, args.3, now).unwrap();
        assert_eq!(first, second);

        // Re-applying to the already-resolved record changes nothing either.
        let third =
            resolve_renewal(args.0, None, Some(first.renewal_date), first.status, now).unwrap();
        assert_eq!(third, first);
    }
}
