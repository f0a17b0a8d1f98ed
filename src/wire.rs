//! JSON-over-HTTP shapes for the REST deployment of the repository.
//!
//! Routes are relative to the API base (`/api/v1` in the usual
//! deployment). Entities serialise with their own serde derives; this module
//! adds the request payload, the error envelope and the route table.
use super::ad_space::{AdSpaceId, AdSpaceType};
use super::booking::{BookingId, BookingStatus, ValidatedRequest};
use super::error::{BookingError, Result};
use super::types::{Date, TimeStamp};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListAdSpaces {
        kind: Option<AdSpaceType>,
        city: Option<String>,
    },
    GetAdSpace(AdSpaceId),
    CreateBooking,
    ListBookings {
        status: Option<BookingStatus>,
    },
    GetBooking(BookingId),
    ApproveBooking(BookingId),
    RejectBooking(BookingId),
}

/// Body of `POST /booking-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    pub ad_space_id: AdSpaceId,
    pub advertiser_name: String,
    pub advertiser_email: String,
    pub start_date: Date,
    pub end_date: Date,
}

/// Error body returned by the REST service for any non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    pub timestamp: TimeStamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Route {
    pub fn method(&self) -> Method {
        match self {
            Route::ListAdSpaces { .. }
            | Route::GetAdSpace(_)
            | Route::ListBookings { .. }
            | Route::GetBooking(_) => Method::Get,
            Route::CreateBooking => Method::Post,
            Route::ApproveBooking(_) | Route::RejectBooking(_) => Method::Patch,
        }
    }

    /// Path plus query string, e.g. `/ad-spaces?type=BILLBOARD&city=New+York`.
    pub fn path(&self) -> String {
        match self {
            Route::ListAdSpaces { kind, city } => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                if let Some(kind) = kind {
                    query.append_pair("type", kind.as_str());
                }
                if let Some(city) = city {
                    query.append_pair("city", city);
                }
                with_query("/ad-spaces", query.finish())
            }
            Route::GetAdSpace(id) => format!("/ad-spaces/{id}"),
            Route::CreateBooking => "/booking-requests".to_string(),
            Route::ListBookings { status } => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                if let Some(status) = status {
                    query.append_pair("status", status.as_str());
                }
                with_query("/booking-requests", query.finish())
            }
            Route::GetBooking(id) => format!("/booking-requests/{id}"),
            Route::ApproveBooking(id) => format!("/booking-requests/{id}/approve"),
            Route::RejectBooking(id) => format!("/booking-requests/{id}/reject"),
        }
    }

    /// Route for a status change; `None` for a status no request can set.
    pub fn for_transition(id: BookingId, status: BookingStatus) -> Option<Self> {
        match status {
            BookingStatus::Approved => Some(Route::ApproveBooking(id)),
            BookingStatus::Rejected => Some(Route::RejectBooking(id)),
            BookingStatus::Pending => None,
        }
    }
}

fn with_query(path: &str, query: String) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

impl From<&ValidatedRequest> for CreateBookingPayload {
    fn from(request: &ValidatedRequest) -> Self {
        Self {
            ad_space_id: request.ad_space_id(),
            advertiser_name: request.advertiser_name().to_string(),
            advertiser_email: request.advertiser_email().to_string(),
            start_date: request.start_date(),
            end_date: request.end_date(),
        }
    }
}

impl ErrorEnvelope {
    pub fn from_error(error: &BookingError, timestamp: TimeStamp) -> Self {
        let errors = error
            .violations()
            .map(|violations| violations.iter().map(|v| v.to_string()).collect());
        Self {
            message: error.to_string(),
            timestamp,
            errors,
        }
    }

    /// What the caller sees when the service answers with this envelope.
    /// The message is carried through unchanged.
    pub fn into_error(self) -> BookingError {
        match self.errors {
            Some(errors) if !errors.is_empty() => {
                BookingError::Transport(format!("{}: {}", self.message, errors.join("; ")))
            }
            _ => BookingError::Transport(self.message),
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn from_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}
