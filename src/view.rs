//! Client-side booking list state as a plain value.
//!
//! A `BookingsView` is passed into each operation and a new one is returned.
//! Every mutation is followed by a full re-read from the repository, whether
//! the mutation succeeded or not, so the list only ever shows statuses the
//! repository has confirmed.
use super::booking::{Booking, BookingId, BookingRequest, BookingStatus};
use super::error::Result;
use super::repository::{BookingFilter, BookingRepository};
use super::service::BookingService;
use super::types::Date;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingsView {
    pub filter: BookingFilter,
    pub bookings: Vec<Booking>,
    /// Message of the most recent failed operation or refresh.
    pub last_error: Option<String>,
}

impl BookingsView {
    pub fn new(filter: BookingFilter) -> Self {
        Self {
            filter,
            bookings: vec![],
            last_error: None,
        }
    }

    /// Change the status filter. The list is stale until the next refresh.
    pub fn with_status_filter(self, status: Option<BookingStatus>) -> Self {
        Self {
            filter: BookingFilter {
                status,
                ..self.filter
            },
            ..self
        }
    }

    pub fn refresh<R: BookingRepository>(self, service: &BookingService<R>) -> Self {
        match service.list_bookings(&self.filter) {
            Ok(bookings) => Self {
                bookings,
                last_error: None,
                ..self
            },
            Err(e) => Self {
                bookings: vec![],
                last_error: Some(e.to_string()),
                ..self
            },
        }
    }

    pub fn submit<R: BookingRepository>(
        self,
        service: &BookingService<R>,
        candidate: &BookingRequest,
        today: Date,
    ) -> (Result<Booking>, Self) {
        let outcome = service.submit(candidate, today);
        self.resync(service, outcome)
    }

    pub fn approve<R: BookingRepository>(
        self,
        service: &BookingService<R>,
        id: BookingId,
    ) -> (Result<Booking>, Self) {
        let outcome = service.approve(id);
        self.resync(service, outcome)
    }

    pub fn reject<R: BookingRepository>(
        self,
        service: &BookingService<R>,
        id: BookingId,
    ) -> (Result<Booking>, Self) {
        let outcome = service.reject(id);
        self.resync(service, outcome)
    }

    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    fn resync<R: BookingRepository>(
        self,
        service: &BookingService<R>,
        outcome: Result<Booking>,
    ) -> (Result<Booking>, Self) {
        let mut view = self.refresh(service);
        // the operation's own error wins over a clean refresh
        if let Err(e) = &outcome {
            view.last_error = Some(e.to_string());
        }
        (outcome, view)
    }
}
