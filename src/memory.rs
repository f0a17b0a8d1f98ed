//! In-process repository, used as the test double for the booking service
//! and for anything that does not need durability.
use super::ad_space::{AdSpace, AdSpaceId, AdSpaceStatus};
use super::availability::AdSpaceFilter;
use super::booking::{Booking, BookingId, BookingStatus, ValidatedRequest};
use super::error::{BookingError, Result};
use super::repository::{BookingFilter, BookingRepository};
use super::types::TimeStamp;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    ad_spaces: BTreeMap<AdSpaceId, AdSpace>,
    bookings: BTreeMap<BookingId, Booking>,
    last_booking_id: u64,
    // when set, the next call fails with this message
    fail_next: Option<String>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_ad_spaces(spaces: impl IntoIterator<Item = AdSpace>) -> Self {
        let repository = Self::new();
        if let Ok(mut state) = repository.state.lock() {
            state
                .ad_spaces
                .extend(spaces.into_iter().map(|space| (space.id, space)));
        }
        repository
    }
    /// Add or replace an ad space, as an inventory system would.
    pub fn insert_ad_space(&self, space: AdSpace) -> Result<()> {
        self.lock()?.ad_spaces.insert(space.id, space);
        Ok(())
    }
    pub fn set_ad_space_status(&self, id: AdSpaceId, status: AdSpaceStatus) -> Result<AdSpace> {
        let mut state = self.lock()?;
        let space = state
            .ad_spaces
            .get_mut(&id)
            .ok_or(BookingError::ad_space_not_found(id))?;
        space.status = status;
        Ok(space.clone())
    }
    /// Make the next repository call fail with a transport error.
    pub fn fail_next_call(&self, message: &str) -> Result<()> {
        self.lock()?.fail_next = Some(message.to_string());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| BookingError::Transport("repository lock poisoned".into()))
    }

    // Every trait method goes through here so injected failures hit reads and writes alike.
    fn begin(&self) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock()?;
        match state.fail_next.take() {
            Some(message) => Err(BookingError::Transport(message)),
            None => Ok(state),
        }
    }
}

impl BookingRepository for InMemoryRepository {
    fn list_ad_spaces(&self, filter: &AdSpaceFilter) -> Result<Vec<AdSpace>> {
        let state = self.begin()?;
        Ok(state
            .ad_spaces
            .values()
            .filter(|space| filter.matches(space))
            .cloned()
            .collect())
    }

    fn get_ad_space(&self, id: AdSpaceId) -> Result<AdSpace> {
        let state = self.begin()?;
        state
            .ad_spaces
            .get(&id)
            .cloned()
            .ok_or(BookingError::ad_space_not_found(id))
    }

    fn create_booking(&self, request: ValidatedRequest) -> Result<Booking> {
        let mut state = self.begin()?;
        if !state.ad_spaces.contains_key(&request.ad_space_id()) {
            return Err(BookingError::ad_space_not_found(request.ad_space_id()));
        }

        state.last_booking_id += 1;
        let id = BookingId(state.last_booking_id);
        let booking = request.into_booking(id, TimeStamp::new());
        state.bookings.insert(id, booking.clone());

        Ok(booking)
    }

    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let state = self.begin()?;
        Ok(state
            .bookings
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect())
    }

    fn get_booking(&self, id: BookingId) -> Result<Booking> {
        let state = self.begin()?;
        state
            .bookings
            .get(&id)
            .cloned()
            .ok_or(BookingError::booking_not_found(id))
    }

    fn set_booking_status(&self, id: BookingId, status: BookingStatus) -> Result<Booking> {
        let mut state = self.begin()?;
        let state = &mut *state;

        let booking = state
            .bookings
            .get_mut(&id)
            .ok_or(BookingError::booking_not_found(id))?;

        if !booking.status.can_transition_to(status) {
            return Err(BookingError::IllegalTransition {
                id,
                from: booking.status,
                to: status,
            });
        }

        booking.status = status;
        if status == BookingStatus::Approved {
            if let Some(space) = state.ad_spaces.get_mut(&booking.ad_space_id) {
                space.status = AdSpaceStatus::Booked;
            }
        }

        Ok(booking.clone())
    }
}
