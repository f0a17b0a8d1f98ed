//! Service layer API for the booking lifecycle
use super::availability;
use super::booking::{Booking, BookingId, BookingRequest, BookingStatus, ValidatedRequest};
use super::config::BookingPolicy;
use super::error::{BookingError, Result};
use super::repository::{BookingFilter, BookingRepository};
use super::types::Date;
use super::validator::{self, Field, Violations};
use std::sync::Arc;
use tracing::{info, warn};

/// Drives bookings from submission to a final decision.
///
/// Holds no booking state of its own: every call reads what it needs from the
/// repository. After any successful `submit`, `approve` or `reject`, callers
/// should re-read bookings from the repository rather than patch a local copy
/// (see [`crate::view::BookingsView`]).
pub struct BookingService<R: BookingRepository> {
    repository: Arc<R>,
    policy: BookingPolicy,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(repository: Arc<R>, policy: BookingPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validate and price a candidate without persisting anything.
    pub fn check(&self, candidate: &BookingRequest, today: Date) -> Result<ValidatedRequest> {
        let ad_space = self.repository.get_ad_space(candidate.ad_space_id())?;

        let validated = validator::validate(candidate, Some(&ad_space), today, &self.policy)
            .map_err(|violations| {
                warn!(
                    ad_space_id = %candidate.ad_space_id(),
                    %violations,
                    "booking request rejected by validation"
                );
                BookingError::ValidationFailed(violations)
            })?;

        if self.policy.reject_overlapping_approved {
            self.ensure_no_approved_overlap(&validated)?;
        }

        Ok(validated)
    }

    /// Submit a new booking request. On success the booking is `PENDING`.
    pub fn submit(&self, candidate: &BookingRequest, today: Date) -> Result<Booking> {
        let validated = self.check(candidate, today)?;
        let booking = self.repository.create_booking(validated)?;

        info!(
            booking_id = %booking.id,
            ad_space_id = %booking.ad_space_id,
            total_cost = %booking.total_cost,
            "booking submitted"
        );
        Ok(booking)
    }

    /// Approve a booking that is still `PENDING`.
    ///
    /// An id the repository does not know fails with `NotFound`, not
    /// `IllegalTransition`.
    pub fn approve(&self, id: BookingId) -> Result<Booking> {
        self.transition(id, BookingStatus::Approved)
    }

    /// Reject a booking that is still `PENDING`. Unknown ids fail as in
    /// [`BookingService::approve`].
    pub fn reject(&self, id: BookingId) -> Result<Booking> {
        self.transition(id, BookingStatus::Rejected)
    }

    pub fn get_booking(&self, id: BookingId) -> Result<Booking> {
        self.repository.get_booking(id)
    }

    pub fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        self.repository.list_bookings(filter)
    }

    fn transition(&self, id: BookingId, to: BookingStatus) -> Result<Booking> {
        let current = self.repository.get_booking(id)?;

        // Checked here so an illegal request never reaches the write path.
        // The repository checks again against whatever is stored at write time.
        if !current.status.can_transition_to(to) {
            warn!(booking_id = %id, from = %current.status, to = %to, "illegal transition");
            return Err(BookingError::IllegalTransition {
                id,
                from: current.status,
                to,
            });
        }

        let updated = self.repository.set_booking_status(id, to)?;
        info!(booking_id = %id, status = %updated.status, "booking status changed");
        Ok(updated)
    }

    fn ensure_no_approved_overlap(&self, request: &ValidatedRequest) -> Result<()> {
        let approved = self.repository.list_bookings(
            &BookingFilter::with_status(BookingStatus::Approved)
                .for_ad_space(request.ad_space_id()),
        )?;

        let conflict = availability::approved_conflicts(
            &approved,
            request.ad_space_id(),
            request.start_date(),
            request.end_date(),
        )
        .next();

        match conflict {
            Some(existing) => {
                warn!(
                    ad_space_id = %request.ad_space_id(),
                    conflicting_booking = %existing.id,
                    "booking request overlaps an approved booking"
                );
                Err(BookingError::ValidationFailed(Violations::single(
                    Field::AdSpace,
                    "Ad space already has approved bookings for the selected date range",
                )))
            }
            None => Ok(()),
        }
    }
}
