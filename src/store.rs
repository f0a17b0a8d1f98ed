//! Sled-backed repository.
//!
//! Ad spaces and bookings live in separate trees keyed by their big-endian id,
//! values are CBOR. Status changes run in a transaction over both trees so a
//! booking approval and the BOOKED mark on its ad space commit together.
use super::ad_space::{AdSpace, AdSpaceId, AdSpaceStatus};
use super::availability::AdSpaceFilter;
use super::booking::{Booking, BookingId, BookingStatus, ValidatedRequest};
use super::config::StoreConfig;
use super::error::{BookingError, Result};
use super::repository::{BookingFilter, BookingRepository};
use super::types::TimeStamp;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use std::sync::Arc;
use tracing::debug;

const AD_SPACES_TREE: &str = "ad_spaces";
const BOOKINGS_TREE: &str = "bookings";

pub struct SledRepository {
    instance: Arc<Db>,
    ad_spaces: Tree,
    bookings: Tree,
}

impl SledRepository {
    pub fn new(instance: Arc<Db>) -> Result<Self> {
        let ad_spaces = instance.open_tree(AD_SPACES_TREE)?;
        let bookings = instance.open_tree(BOOKINGS_TREE)?;
        Ok(Self {
            instance,
            ad_spaces,
            bookings,
        })
    }

    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db = sled::open(&config.db_path)?;
        Self::new(Arc::new(db))
    }

    /// Add or replace an ad space. Inventory is provisioned outside the
    /// booking workflow; this is the hook for doing so.
    pub fn insert_ad_space(&self, space: &AdSpace) -> Result<()> {
        self.ad_spaces
            .insert(space.id.0.to_be_bytes(), encode(space)?)?;
        debug!(ad_space_id = %space.id, status = %space.status, "stored ad space");
        Ok(())
    }

    /// Drop every ad space and booking.
    pub fn clear(&self) -> Result<()> {
        self.ad_spaces.clear()?;
        self.bookings.clear()?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.instance.flush()?;
        Ok(())
    }

    // sled ids start at zero; bookings start at one
    fn next_booking_id(&self) -> Result<BookingId> {
        Ok(BookingId(self.instance.generate_id()? + 1))
    }
}

fn encode<T: minicbor::Encode<()>>(value: &T) -> Result<Vec<u8>> {
    minicbor::to_vec(value).map_err(|e| BookingError::Transport(format!("failed to encode record: {e}")))
}

fn decode<T: for<'b> minicbor::Decode<'b, ()>>(bytes: &[u8]) -> Result<T> {
    Ok(minicbor::decode(bytes)?)
}

impl BookingRepository for SledRepository {
    fn list_ad_spaces(&self, filter: &AdSpaceFilter) -> Result<Vec<AdSpace>> {
        let mut spaces = vec![];
        for entry in self.ad_spaces.iter() {
            let (_, value) = entry?;
            let space: AdSpace = decode(&value)?;
            if filter.matches(&space) {
                spaces.push(space);
            }
        }
        Ok(spaces)
    }

    fn get_ad_space(&self, id: AdSpaceId) -> Result<AdSpace> {
        match self.ad_spaces.get(id.0.to_be_bytes())? {
            Some(value) => decode(&value),
            None => Err(BookingError::ad_space_not_found(id)),
        }
    }

    fn create_booking(&self, request: ValidatedRequest) -> Result<Booking> {
        if !self.ad_spaces.contains_key(request.ad_space_id().0.to_be_bytes())? {
            return Err(BookingError::ad_space_not_found(request.ad_space_id()));
        }

        let id = self.next_booking_id()?;
        let booking = request.into_booking(id, TimeStamp::new());
        self.bookings.insert(id.0.to_be_bytes(), encode(&booking)?)?;
        debug!(booking_id = %id, ad_space_id = %booking.ad_space_id, "stored booking");

        Ok(booking)
    }

    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let mut bookings = vec![];
        for entry in self.bookings.iter() {
            let (_, value) = entry?;
            let booking: Booking = decode(&value)?;
            if filter.matches(&booking) {
                bookings.push(booking);
            }
        }
        Ok(bookings)
    }

    fn get_booking(&self, id: BookingId) -> Result<Booking> {
        match self.bookings.get(id.0.to_be_bytes())? {
            Some(value) => decode(&value),
            None => Err(BookingError::booking_not_found(id)),
        }
    }

    fn set_booking_status(&self, id: BookingId, status: BookingStatus) -> Result<Booking> {
        let outcome = (&self.bookings, &self.ad_spaces).transaction(|(bookings, ad_spaces)| {
            let key = id.0.to_be_bytes();
            let mut booking: Booking = match bookings.get(key)? {
                Some(value) => decode(&value).map_err(ConflictableTransactionError::Abort)?,
                None => {
                    return Err(ConflictableTransactionError::Abort(
                        BookingError::booking_not_found(id),
                    ));
                }
            };

            if !booking.status.can_transition_to(status) {
                return Err(ConflictableTransactionError::Abort(
                    BookingError::IllegalTransition {
                        id,
                        from: booking.status,
                        to: status,
                    },
                ));
            }

            booking.status = status;
            let encoded = encode(&booking).map_err(ConflictableTransactionError::Abort)?;
            bookings.insert(&key[..], encoded)?;

            if status == BookingStatus::Approved {
                let space_key = booking.ad_space_id.0.to_be_bytes();
                if let Some(value) = ad_spaces.get(space_key)? {
                    let mut space: AdSpace =
                        decode(&value).map_err(ConflictableTransactionError::Abort)?;
                    space.status = AdSpaceStatus::Booked;
                    let encoded = encode(&space).map_err(ConflictableTransactionError::Abort)?;
                    ad_spaces.insert(&space_key[..], encoded)?;
                }
            }

            Ok(booking)
        });

        match outcome {
            Ok(booking) => {
                debug!(booking_id = %id, status = %status, "updated booking status");
                Ok(booking)
            }
            Err(TransactionError::Abort(e)) => Err(e),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad_space::AdSpaceType;
    use crate::booking::BookingRequest;
    use crate::config::BookingPolicy;
    use crate::types::{Date, Money};
    use crate::validator;
    use tempfile::tempdir;

    fn billboard() -> AdSpace {
        AdSpace::new(
            AdSpaceId(1),
            "Main St Billboard",
            AdSpaceType::Billboard,
            "Springfield",
            "1 Main St",
            Money::from_cents(12_550),
        )
    }

    fn request_for(space: &AdSpace) -> ValidatedRequest {
        let today = Date::new(2025, 1, 1).unwrap();
        let request = BookingRequest::new(space.id)
            .set_advertiser_name("Acme")
            .set_advertiser_email("a@b.com")
            .set_start_date(today.plus_days(1).unwrap())
            .set_end_date(today.plus_days(7).unwrap());
        validator::validate(&request, Some(space), today, &BookingPolicy::default()).unwrap()
    }

    #[test]
    fn bookings_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let config = StoreConfig {
            db_path: temp_dir.path().join("reopen.db"),
        };

        let created = {
            let repo = SledRepository::open(&config).unwrap();
            repo.insert_ad_space(&billboard()).unwrap();
            let booking = repo.create_booking(request_for(&billboard())).unwrap();
            repo.flush().unwrap();
            booking
        };

        let repo = SledRepository::open(&config).unwrap();
        let loaded = repo.get_booking(created.id).unwrap();

        assert_eq!(loaded, created);
        assert_eq!(loaded.total_cost.display_rounded(), "878.50");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let temp_dir = tempdir().unwrap();
        let db = Arc::new(sled::open(temp_dir.path().join("missing.db")).unwrap());
        let repo = SledRepository::new(db).unwrap();

        assert!(matches!(
            repo.get_booking(BookingId(99)),
            Err(BookingError::NotFound { .. })
        ));
        assert!(matches!(
            repo.set_booking_status(BookingId(99), BookingStatus::Approved),
            Err(BookingError::NotFound { .. })
        ));
        assert!(matches!(
            repo.create_booking(request_for(&billboard())),
            Err(BookingError::NotFound { .. })
        ));
    }
}
