//! Read-only view over ad space status, used to decide which spaces may be
//! booked and whether a date range collides with approved bookings.
use super::ad_space::{AdSpace, AdSpaceId, AdSpaceStatus, AdSpaceType};
use super::booking::{Booking, BookingStatus};
use super::error::Result;
use super::repository::BookingRepository;
use super::types::Date;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdSpaceFilter {
    pub kind: Option<AdSpaceType>,
    pub city: Option<String>,
    pub status: Option<AdSpaceStatus>,
}

impl AdSpaceFilter {
    /// Only spaces that can currently take a booking. This is what the
    /// public listing shows.
    pub fn available() -> Self {
        Self {
            status: Some(AdSpaceStatus::Available),
            ..Self::default()
        }
    }
    pub fn with_kind(mut self, kind: AdSpaceType) -> Self {
        self.kind = Some(kind);
        self
    }
    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }
    pub fn matches(&self, space: &AdSpace) -> bool {
        self.kind.is_none_or(|kind| space.kind == kind)
            && self.city.as_deref().is_none_or(|city| space.city == city)
            && self.status.is_none_or(|status| space.status == status)
    }
}

pub fn is_bookable(space: &AdSpace) -> bool {
    space.status == AdSpaceStatus::Available
}

/// Inclusive ranges overlap when each starts no later than the other ends.
pub fn ranges_overlap(a_start: Date, a_end: Date, b_start: Date, b_end: Date) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Approved bookings on `ad_space_id` whose dates intersect `start..=end`.
pub fn approved_conflicts<'a>(
    bookings: &'a [Booking],
    ad_space_id: AdSpaceId,
    start: Date,
    end: Date,
) -> impl Iterator<Item = &'a Booking> {
    bookings.iter().filter(move |booking| {
        booking.ad_space_id == ad_space_id
            && booking.status == BookingStatus::Approved
            && ranges_overlap(booking.start_date, booking.end_date, start, end)
    })
}

/// The last fetched ad space listing together with the filter that produced
/// it. Refreshing consumes the old value and returns the new one.
#[derive(Debug, Clone, Default)]
pub struct AdSpaceCatalog {
    pub filter: AdSpaceFilter,
    pub spaces: Vec<AdSpace>,
    pub last_error: Option<String>,
}

impl AdSpaceCatalog {
    pub fn new(filter: AdSpaceFilter) -> Self {
        Self {
            filter,
            spaces: vec![],
            last_error: None,
        }
    }
    pub fn with_filter(self, filter: AdSpaceFilter) -> Self {
        Self { filter, ..self }
    }
    pub fn refresh<R: BookingRepository + ?Sized>(self, repository: &R) -> Self {
        match repository.list_ad_spaces(&self.filter) {
            Ok(spaces) => Self {
                spaces,
                last_error: None,
                ..self
            },
            Err(e) => Self {
                spaces: vec![],
                last_error: Some(e.to_string()),
                ..self
            },
        }
    }
    pub fn get(&self, id: AdSpaceId) -> Option<&AdSpace> {
        self.spaces.iter().find(|space| space.id == id)
    }
}

/// Fetch one space and report whether it can be booked right now.
pub fn check_bookable<R: BookingRepository + ?Sized>(
    repository: &R,
    id: AdSpaceId,
) -> Result<bool> {
    let space = repository.get_ad_space(id)?;
    Ok(is_bookable(&space))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingId, BookingRequest};
    use crate::types::{Money, TimeStamp};
    use crate::validator;
    use crate::config::BookingPolicy;

    fn date(d: u32) -> Date {
        Date::new(2025, 3, d).unwrap()
    }

    fn space(id: u64, kind: AdSpaceType, city: &str, status: AdSpaceStatus) -> AdSpace {
        AdSpace::new(AdSpaceId(id), "Space", kind, city, "Somewhere 1", Money::from_units(50))
            .with_status(status)
    }

    fn booking(id: u64, space_id: u64, start: u32, end: u32, status: BookingStatus) -> Booking {
        let target = space(space_id, AdSpaceType::Billboard, "Oslo", AdSpaceStatus::Available);
        let request = BookingRequest::new(target.id)
            .set_advertiser_name("Acme")
            .set_advertiser_email("a@b.com")
            .set_start_date(date(start))
            .set_end_date(date(end));
        let policy = BookingPolicy::default().with_min_duration_days(1);
        let validated = validator::validate(&request, Some(&target), date(1), &policy).unwrap();
        let mut booking = validated.into_booking(BookingId(id), TimeStamp::new());
        booking.status = status;
        booking
    }

    #[test]
    fn filter_combines_all_criteria() {
        let filter = AdSpaceFilter::available()
            .with_kind(AdSpaceType::BusStop)
            .with_city("Oslo");

        assert!(filter.matches(&space(1, AdSpaceType::BusStop, "Oslo", AdSpaceStatus::Available)));
        assert!(!filter.matches(&space(2, AdSpaceType::BusStop, "Bergen", AdSpaceStatus::Available)));
        assert!(!filter.matches(&space(3, AdSpaceType::Billboard, "Oslo", AdSpaceStatus::Available)));
        assert!(!filter.matches(&space(4, AdSpaceType::BusStop, "Oslo", AdSpaceStatus::Booked)));
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = AdSpaceFilter::default();
        assert!(filter.matches(&space(1, AdSpaceType::TransitAd, "Rome", AdSpaceStatus::Maintenance)));
    }

    #[test]
    fn overlap_is_inclusive_at_both_ends() {
        assert!(ranges_overlap(date(1), date(10), date(10), date(20)));
        assert!(ranges_overlap(date(10), date(20), date(1), date(10)));
        assert!(ranges_overlap(date(5), date(6), date(1), date(30)));
        assert!(!ranges_overlap(date(1), date(9), date(10), date(20)));
    }

    #[test]
    fn only_approved_bookings_on_the_same_space_conflict() {
        let bookings = vec![
            booking(1, 1, 2, 12, BookingStatus::Approved),
            booking(2, 1, 2, 12, BookingStatus::Pending),
            booking(3, 1, 2, 12, BookingStatus::Rejected),
            booking(4, 2, 2, 12, BookingStatus::Approved),
            booking(5, 1, 20, 28, BookingStatus::Approved),
        ];

        let ids: Vec<BookingId> = approved_conflicts(&bookings, AdSpaceId(1), date(10), date(18))
            .map(|b| b.id)
            .collect();

        assert_eq!(ids, vec![BookingId(1)]);
    }
}
