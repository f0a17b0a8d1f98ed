use adspace_booking::{
    BookingError,
    ad_space::{AdSpace, AdSpaceId, AdSpaceStatus, AdSpaceType},
    availability::{AdSpaceCatalog, AdSpaceFilter},
    booking::{BookingRequest, BookingStatus},
    config::{BookingPolicy, StoreConfig},
    repository::{BookingFilter, BookingRepository},
    service::BookingService,
    store::SledRepository,
    types::{Date, Money},
    validator::Field,
    view::BookingsView,
};
use anyhow::Context;
use std::sync::Arc;

use tempfile::tempdir; // Use for test db cleanup.

fn today() -> Date {
    Date::new(2025, 6, 1).expect("valid date")
}

fn day(offset: u64) -> Date {
    today().plus_days(offset).expect("date in range")
}

fn billboard() -> AdSpace {
    AdSpace::new(
        AdSpaceId(1),
        "Main St Billboard",
        AdSpaceType::Billboard,
        "Springfield",
        "1 Main St",
        Money::from_units(100),
    )
}

fn request(start: u64, end: u64) -> BookingRequest {
    BookingRequest::new(AdSpaceId(1))
        .set_advertiser_name("Acme")
        .set_advertiser_email("a@b.com")
        .set_start_date(day(start))
        .set_end_date(day(end))
}

/// Each test gets its own sled database under a temp dir. Sled locks the
/// directory, so tests must never share one.
fn open_repository(dir: &tempfile::TempDir, name: &str) -> anyhow::Result<Arc<SledRepository>> {
    let config = StoreConfig {
        db_path: dir.path().join(name),
    };
    let repository = SledRepository::open(&config)?;
    repository.clear()?;
    repository.insert_ad_space(&billboard())?;
    Ok(Arc::new(repository))
}

#[test]
fn submit_and_approve_booking() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_submit_and_approve.db")?;
    let service = BookingService::new(repository, BookingPolicy::default());

    let booking = service
        .submit(&request(1, 8), today())
        .context("Booking failed on submit: ")?;

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_cost, Money::from_units(800));
    assert_eq!(booking.ad_space_name, "Main St Billboard");

    let approved = service
        .approve(booking.id)
        .context("Booking failed on approval: ")?;
    assert_eq!(approved.status, BookingStatus::Approved);

    let pending = service.list_bookings(&BookingFilter::with_status(BookingStatus::Pending))?;
    assert!(pending.iter().all(|b| b.id != booking.id));

    let approved_list =
        service.list_bookings(&BookingFilter::with_status(BookingStatus::Approved))?;
    assert_eq!(approved_list.len(), 1);
    assert_eq!(approved_list[0].id, booking.id);

    Ok(())
}

#[test]
fn approving_twice_is_illegal() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_approve_twice.db")?;
    let service = BookingService::new(repository, BookingPolicy::default());

    let booking = service.submit(&request(1, 8), today())?;
    service.approve(booking.id)?;

    match service.approve(booking.id) {
        Err(BookingError::IllegalTransition { from, to, .. }) => {
            assert_eq!(from, BookingStatus::Approved);
            assert_eq!(to, BookingStatus::Approved);
        }
        other => panic!("expected an illegal transition, got {other:?}"),
    }
    assert_eq!(service.get_booking(booking.id)?.status, BookingStatus::Approved);

    Ok(())
}

#[test]
fn reject_after_approve_is_illegal() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_reject_after_approve.db")?;
    let service = BookingService::new(repository, BookingPolicy::default());

    let booking = service.submit(&request(1, 8), today())?;
    service.approve(booking.id)?;

    let err = service.reject(booking.id).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Only PENDING bookings can be rejected. Booking {} is APPROVED",
            booking.id
        )
    );

    Ok(())
}

#[test]
fn rejected_booking_stays_rejected() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_reject.db")?;
    let service = BookingService::new(repository.clone(), BookingPolicy::default());

    let booking = service.submit(&request(1, 8), today())?;
    let rejected = service.reject(booking.id)?;
    assert_eq!(rejected.status, BookingStatus::Rejected);

    assert!(matches!(
        service.approve(booking.id),
        Err(BookingError::IllegalTransition { .. })
    ));
    // rejection leaves the space open
    assert_eq!(
        repository.get_ad_space(AdSpaceId(1))?.status,
        AdSpaceStatus::Available
    );

    Ok(())
}

#[test]
fn approval_marks_space_booked() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_space_booked.db")?;
    let service = BookingService::new(repository.clone(), BookingPolicy::default());

    let booking = service.submit(&request(1, 8), today())?;
    service.approve(booking.id)?;

    assert_eq!(
        repository.get_ad_space(AdSpaceId(1))?.status,
        AdSpaceStatus::Booked
    );

    let catalog = AdSpaceCatalog::new(AdSpaceFilter::available()).refresh(repository.as_ref());
    assert!(catalog.spaces.is_empty());
    assert_eq!(catalog.last_error, None);

    let err = service.submit(&request(20, 30), today()).unwrap_err();
    assert_eq!(
        err.violations().context("expected violations")?.fields(),
        vec![Field::AdSpace]
    );

    Ok(())
}

#[test]
fn overlapping_approved_booking_blocks_submission() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_overlap.db")?;
    let policy = BookingPolicy {
        require_available_space: false,
        ..BookingPolicy::default()
    };
    let service = BookingService::new(repository, policy);

    let first = service.submit(&request(1, 10), today())?;
    service.approve(first.id)?;

    // shares day 10 with the approved booking
    assert!(service.submit(&request(10, 16), today()).is_err());
    // touches but does not share a day
    let next = service.submit(&request(11, 17), today())?;
    assert_eq!(next.status, BookingStatus::Pending);

    Ok(())
}

#[test]
fn invalid_request_is_not_persisted() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_invalid.db")?;
    let service = BookingService::new(repository, BookingPolicy::default());

    let candidate = BookingRequest::new(AdSpaceId(1))
        .set_advertiser_email("not-an-email")
        .set_start_date(today())
        .set_end_date(today());

    let err = service.submit(&candidate, today()).unwrap_err();
    let violations = err.violations().context("expected violations")?;
    assert_eq!(
        violations.fields(),
        vec![
            Field::AdvertiserName,
            Field::AdvertiserEmail,
            Field::StartDate,
            Field::EndDate,
            Field::EndDate,
        ]
    );
    assert!(service.list_bookings(&BookingFilter::all())?.is_empty());

    Ok(())
}

#[test]
fn custom_minimum_duration() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_min_duration.db")?;
    let service = BookingService::new(
        repository,
        BookingPolicy::default().with_min_duration_days(3),
    );

    let booking = service.submit(&request(1, 3), today())?;
    assert_eq!(booking.total_cost, Money::from_units(300));

    let err = service.submit(&request(1, 2), today()).unwrap_err();
    assert_eq!(
        err.violations()
            .context("expected violations")?
            .for_field(Field::EndDate),
        vec!["Minimum booking duration is 3 days"]
    );

    Ok(())
}

#[test]
fn bookings_view_follows_the_store() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_view.db")?;
    let service = BookingService::new(repository, BookingPolicy::default());

    let view = BookingsView::new(BookingFilter::all()).refresh(&service);
    assert!(view.bookings.is_empty());

    let (submitted, view) = view.submit(&service, &request(1, 8), today());
    let booking = submitted.context("Booking failed on submit: ")?;
    assert_eq!(
        view.get(booking.id).map(|b| b.status),
        Some(BookingStatus::Pending)
    );

    let (approved, view) = view.approve(&service, booking.id);
    approved.context("Booking failed on approval: ")?;
    assert_eq!(
        view.get(booking.id).map(|b| b.status),
        Some(BookingStatus::Approved)
    );
    assert_eq!(view.last_error, None);

    // a failed transition keeps the confirmed list and reports the error
    let (rejected, view) = view.reject(&service, booking.id);
    assert!(rejected.is_err());
    assert_eq!(
        view.get(booking.id).map(|b| b.status),
        Some(BookingStatus::Approved)
    );
    assert!(view.last_error.is_some());

    let view = view
        .with_status_filter(Some(BookingStatus::Pending))
        .refresh(&service);
    assert!(view.bookings.is_empty());

    Ok(())
}

#[test]
fn bookings_survive_reopen() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = StoreConfig {
        db_path: temp_dir.path().join("test_reopen.db"),
    };

    let booking_id = {
        let repository = Arc::new(SledRepository::open(&config)?);
        repository.insert_ad_space(&billboard())?;
        let service = BookingService::new(repository.clone(), BookingPolicy::default());
        let booking = service.submit(&request(1, 8), today())?;
        service.approve(booking.id)?;
        repository.flush()?;
        booking.id
    };

    let repository = Arc::new(SledRepository::open(&config)?);
    let service = BookingService::new(repository, BookingPolicy::default());
    let booking = service.get_booking(booking_id)?;

    assert_eq!(booking.status, BookingStatus::Approved);
    assert_eq!(booking.total_cost, Money::from_units(800));

    Ok(())
}

#[test]
fn unknown_booking_is_not_found() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let repository = open_repository(&temp_dir, "test_unknown.db")?;
    let service = BookingService::new(repository, BookingPolicy::default());

    let err = service
        .approve(adspace_booking::booking::BookingId(404))
        .unwrap_err();
    assert_eq!(err.to_string(), "Booking not found with id: 404");

    Ok(())
}
