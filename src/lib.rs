//! Booking request lifecycle and pricing for fixed ad-display assets.
//!
//! A [`booking::BookingRequest`] is checked by [`validator::validate`], priced
//! by [`pricing`] and persisted as a `PENDING` [`booking::Booking`] through a
//! [`repository::BookingRepository`]. [`service::BookingService`] then moves
//! it to `APPROVED` or `REJECTED`.

pub mod ad_space;
pub mod availability;
pub mod booking;
pub mod config;
pub mod error;
pub mod memory;
pub mod pricing;
pub mod repository;
pub mod service;
pub mod store;
pub mod types;
pub mod validator;
pub mod view;
pub mod wire;

pub use error::{BookingError, Result};
