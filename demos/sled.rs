//! Walks one booking through its lifecycle against a sled database.
//!
//! `ADSPACE_DB_PATH` picks the database directory (default `adspace.db`),
//! `ADSPACE_MIN_BOOKING_DAYS` the minimum booking length.
use adspace_booking::{
    ad_space::{AdSpace, AdSpaceId, AdSpaceType},
    availability::{AdSpaceCatalog, AdSpaceFilter},
    booking::BookingRequest,
    config::{BookingPolicy, StoreConfig},
    repository::BookingFilter,
    service::BookingService,
    store::SledRepository,
    types::{Date, Money},
    view::BookingsView,
    wire::{self, Route},
};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let repository = Arc::new(SledRepository::open(&StoreConfig::default())?);
    // start every run from an empty inventory
    repository.clear()?;

    repository.insert_ad_space(&AdSpace::new(
        AdSpaceId(1),
        "Main St Billboard",
        AdSpaceType::Billboard,
        "Springfield",
        "1 Main St",
        Money::from_units(100),
    ))?;
    repository.insert_ad_space(&AdSpace::new(
        AdSpaceId(2),
        "Depot Shelter",
        AdSpaceType::BusStop,
        "Springfield",
        "2 Depot Rd",
        Money::from_cents(4_550),
    ))?;

    let catalog = AdSpaceCatalog::new(AdSpaceFilter::available().with_city("Springfield"))
        .refresh(repository.as_ref());
    for space in &catalog.spaces {
        println!(
            "{:>3} {:<20} {:<12} {}/day",
            space.id,
            space.name,
            space.kind,
            space.price_per_day.display_rounded()
        );
    }

    let service = BookingService::new(repository.clone(), BookingPolicy::from_env());
    let today = Date::today();
    let start = today.plus_days(1).context("start date out of range")?;
    let end = today.plus_days(8).context("end date out of range")?;

    let request = BookingRequest::new(AdSpaceId(2))
        .set_advertiser_name("Acme")
        .set_advertiser_email("marketing@acme.example")
        .set_start_date(start)
        .set_end_date(end);

    let view = BookingsView::new(BookingFilter::all());
    let (submitted, view) = view.submit(&service, &request, today);
    let booking = submitted.context("Booking failed on submit: ")?;
    println!(
        "submitted booking {} for {} ({})",
        booking.id,
        booking.total_cost.display_rounded(),
        Route::CreateBooking.path()
    );

    let (approved, view) = view.approve(&service, booking.id);
    let approved = approved.context("Booking failed on approval: ")?;
    println!("{}", wire::to_json(&approved)?);

    for booking in &view.bookings {
        println!("{:>3} {:<10} {} -> {}", booking.id, booking.status, booking.start_date, booking.end_date);
    }

    repository.flush()?;
    Ok(())
}
