//! Date availability resolver
//!
//! A calendar day is unavailable iff an admin blocked it manually or at least
//! one cake order for that day is confirmed or in progress. The listing is
//! recomputed from the database on every call.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::database::AvailabilityRepository;
use crate::models::{
    BookedDate, CreateUnavailableDateRequest, DateAvailability, ManualUnavailableDate,
    UnavailableDate,
};
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::require_field;

/// Union of manual and booked entries, ascending by date.
///
/// Entries for the same day are all kept; manual ones sort before booked ones
/// on the same day. The sort is stable otherwise.
pub fn resolve_unavailable_dates(
    manual: Vec<ManualUnavailableDate>,
    booked: Vec<BookedDate>,
) -> Vec<UnavailableDate> {
    let mut dates: Vec<UnavailableDate> = manual
        .into_iter()
        .map(UnavailableDate::from)
        .chain(booked.into_iter().map(UnavailableDate::from))
        .collect();

    dates.sort_by_key(|entry| entry.date);
    dates
}

/// Whether `date` is bookable given the resolved listing
pub fn date_availability(date: NaiveDate, entries: &[UnavailableDate]) -> DateAvailability {
    let reasons: Vec<String> = entries
        .iter()
        .filter(|entry| entry.date == date)
        .map(|entry| entry.reason.clone())
        .collect();

    DateAvailability {
        date,
        available: reasons.is_empty(),
        reasons,
    }
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: AvailabilityRepository,
}

impl AvailabilityService {
    pub fn new(repository: AvailabilityRepository) -> Self {
        Self { repository }
    }

    /// Full unavailable-dates listing
    pub async fn list(&self) -> Result<Vec<UnavailableDate>> {
        let manual = self.repository.list_manual().await?;
        let booked = self.repository.list_booked().await?;
        debug!(manual = manual.len(), booked = booked.len(), "Resolving unavailable dates");

        Ok(resolve_unavailable_dates(manual, booked))
    }

    /// Check a single candidate date
    pub async fn check(&self, date: NaiveDate) -> Result<DateAvailability> {
        let manual = self.repository.list_manual_on(date).await?;
        let booked = self.repository.list_booked_on(date).await?;
        let entries = resolve_unavailable_dates(manual, booked);

        Ok(date_availability(date, &entries))
    }

    /// Fail with `DateUnavailable` when the date cannot take a new order
    pub async fn ensure_bookable(&self, date: NaiveDate) -> Result<()> {
        let availability = self.check(date).await?;
        if availability.available {
            Ok(())
        } else {
            Err(BakeshopError::DateUnavailable(date))
        }
    }

    /// Block a date manually
    pub async fn add_manual(&self, request: CreateUnavailableDateRequest, admin_id: i64) -> Result<UnavailableDate> {
        let request = CreateUnavailableDateRequest {
            date: request.date,
            reason: require_field("reason", &request.reason)?,
        };

        let row = self.repository.create_manual(request, Some(admin_id)).await?;
        info!(id = row.id, date = %row.date, "Manual unavailable date added");
        Ok(row.into())
    }

    /// Remove a manual block. Booked entries cannot be removed this way.
    pub async fn remove_manual(&self, id: i64) -> Result<()> {
        if !self.repository.delete_manual(id).await? {
            return Err(BakeshopError::not_found("Unavailable date", id));
        }

        info!(id = id, "Manual unavailable date removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateOrigin, BOOKED_REASON};
    use chrono::Utc;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manual(id: i64, date: NaiveDate, reason: &str) -> ManualUnavailableDate {
        ManualUnavailableDate {
            id,
            date,
            reason: reason.to_string(),
            created_by: None,
            created_at: Utc::now(),
        }
    }

    fn booked(order_id: i64, date: NaiveDate) -> BookedDate {
        BookedDate { order_id, event_date: date }
    }

    #[test]
    fn test_union_is_sorted() {
        let dates = resolve_unavailable_dates(
            vec![manual(1, day(2025, 12, 25), "Holiday"), manual(2, day(2025, 1, 1), "New year")],
            vec![booked(10, day(2025, 6, 14))],
        );

        let days: Vec<NaiveDate> = dates.iter().map(|d| d.date).collect();
        assert_eq!(days, vec![day(2025, 1, 1), day(2025, 6, 14), day(2025, 12, 25)]);
        assert_eq!(dates[1].origin, DateOrigin::Booked);
        assert_eq!(dates[1].reason, BOOKED_REASON);
        assert_eq!(dates[1].order_id, Some(10));
        assert_eq!(dates[1].id, None);
    }

    #[test]
    fn test_same_day_entries_are_not_merged() {
        let christmas = day(2025, 12, 25);
        let dates = resolve_unavailable_dates(
            vec![manual(1, christmas, "Holiday")],
            vec![booked(7, christmas), booked(8, christmas)],
        );

        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].origin, DateOrigin::Manual);
        assert!(dates[1..].iter().all(|d| d.origin == DateOrigin::Booked));
    }

    #[test]
    fn test_date_availability() {
        let dates = resolve_unavailable_dates(
            vec![manual(1, day(2025, 12, 25), "Holiday")],
            vec![booked(3, day(2025, 12, 25))],
        );

        let blocked = date_availability(day(2025, 12, 25), &dates);
        assert!(!blocked.available);
        assert_eq!(blocked.reasons, vec!["Holiday".to_string(), BOOKED_REASON.to_string()]);

        let open = date_availability(day(2025, 12, 26), &dates);
        assert!(open.available);
        assert!(open.reasons.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(resolve_unavailable_dates(vec![], vec![]).is_empty());
    }

    fn arb_day() -> impl Strategy<Value = NaiveDate> {
        (0u32..730).prop_map(|offset| day(2025, 1, 1) + chrono::Duration::days(offset as i64))
    }

    proptest! {
        #[test]
        fn prop_every_source_row_is_listed(
            manual_days in prop::collection::vec(arb_day(), 0..20),
            booked_days in prop::collection::vec(arb_day(), 0..20),
        ) {
            let manual_rows: Vec<_> = manual_days.iter().enumerate()
                .map(|(i, d)| manual(i as i64, *d, "Closed"))
                .collect();
            let booked_rows: Vec<_> = booked_days.iter().enumerate()
                .map(|(i, d)| booked(i as i64, *d))
                .collect();

            let dates = resolve_unavailable_dates(manual_rows, booked_rows);

            prop_assert_eq!(dates.len(), manual_days.len() + booked_days.len());
            prop_assert!(dates.windows(2).all(|w| w[0].date <= w[1].date));
            for d in &manual_days {
                prop_assert!(dates.iter().any(|e| e.date == *d && e.origin == DateOrigin::Manual));
            }
            for d in &booked_days {
                prop_assert!(dates.iter().any(|e| e.date == *d && e.origin == DateOrigin::Booked));
            }
        }

        #[test]
        fn prop_removing_manual_keeps_booked(
            shared in arb_day(),
            extra in prop::collection::vec(arb_day(), 0..10),
        ) {
            let booked_rows: Vec<_> = std::iter::once(shared).chain(extra.iter().copied())
                .enumerate()
                .map(|(i, d)| booked(i as i64, d))
                .collect();

            let with_manual = resolve_unavailable_dates(vec![manual(1, shared, "Closed")], booked_rows.clone());
            let without_manual = resolve_unavailable_dates(vec![], booked_rows);

            prop_assert!(!date_availability(shared, &with_manual).available);
            prop_assert!(!date_availability(shared, &without_manual).available);
            prop_assert!(without_manual.iter().all(|e| e.origin == DateOrigin::Booked));
        }
    }
}
