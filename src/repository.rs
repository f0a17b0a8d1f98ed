//! The boundary to durable state.
//!
//! Implementations own ids, creation timestamps and ad space status. After a
//! mutating call returns `Ok`, every later read through the same repository
//! must observe the change; the booking service relies on that instead of
//! patching local copies.
use super::ad_space::{AdSpace, AdSpaceId};
use super::availability::AdSpaceFilter;
use super::booking::{Booking, BookingId, BookingStatus, ValidatedRequest};
use super::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub ad_space_id: Option<AdSpaceId>,
}

impl BookingFilter {
    pub fn all() -> Self {
        Self::default()
    }
    pub fn with_status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
    pub fn for_ad_space(mut self, id: AdSpaceId) -> Self {
        self.ad_space_id = Some(id);
        self
    }
    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.is_none_or(|status| booking.status == status)
            && self.ad_space_id.is_none_or(|id| booking.ad_space_id == id)
    }
}

pub trait BookingRepository: Send + Sync {
    fn list_ad_spaces(&self, filter: &AdSpaceFilter) -> Result<Vec<AdSpace>>;
    /// `NotFound` when no space has this id.
    fn get_ad_space(&self, id: AdSpaceId) -> Result<AdSpace>;
    /// Persist a new booking in `PENDING`, assigning its id and creation time.
    fn create_booking(&self, request: ValidatedRequest) -> Result<Booking>;
    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>>;
    fn get_booking(&self, id: BookingId) -> Result<Booking>;
    /// Move a booking to `APPROVED` or `REJECTED`.
    ///
    /// Fails with `IllegalTransition` when the stored status does not allow
    /// the move, and with `NotFound` for an unknown id. Approving also marks
    /// the booked ad space as `BOOKED`.
    fn set_booking_status(&self, id: BookingId, status: BookingStatus) -> Result<Booking>;
}
