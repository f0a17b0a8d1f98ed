//! Booking requests, validated requests and persisted bookings
use super::ad_space::{AdSpaceId, ParseEnumError};
use super::types::{Date, Money, TimeStamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub u64);

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Approved,
    #[n(2)]
    Rejected,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Rejected,
    ];

    /// The full transition table. Pending is entered only by submission, so
    /// no status may move *to* it.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        match (self, next) {
            (BookingStatus::Pending, BookingStatus::Approved) => true,
            (BookingStatus::Pending, BookingStatus::Rejected) => true,
            (BookingStatus::Pending, BookingStatus::Pending) => false,
            (BookingStatus::Approved, _) => false,
            (BookingStatus::Rejected, _) => false,
        }
    }
    pub fn is_terminal(self) -> bool {
        !BookingStatus::ALL
            .into_iter()
            .any(|next| self.can_transition_to(next))
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }
    // past participle, for transition error messages
    pub(crate) fn as_verb(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "submitted",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }
}

/// A candidate booking as the advertiser entered it. Nothing here is trusted
/// until it has passed through [`crate::validator::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    ad_space_id: AdSpaceId,
    advertiser_name: String,
    advertiser_email: String,
    start_date: Option<Date>,
    end_date: Option<Date>,
}

/// A request that passed validation, priced against the ad space it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    ad_space_id: AdSpaceId,
    ad_space_name: String,
    advertiser_name: String,
    advertiser_email: String,
    start_date: Date,
    end_date: Date,
    total_cost: Money,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[n(0)]
    pub id: BookingId,
    #[n(1)]
    pub ad_space_id: AdSpaceId,
    #[n(2)]
    pub ad_space_name: String,
    #[n(3)]
    pub advertiser_name: String,
    #[n(4)]
    pub advertiser_email: String,
    #[n(5)]
    pub start_date: Date,
    #[n(6)]
    pub end_date: Date,
    #[n(7)]
    pub status: BookingStatus,
    #[n(8)]
    pub total_cost: Money,
    #[n(9)]
    pub created_at: TimeStamp,
}

impl BookingRequest {
    /// Construct an empty candidate for the given ad space; fill it with the setters.
    pub fn new(ad_space_id: AdSpaceId) -> Self {
        Self {
            ad_space_id,
            advertiser_name: String::new(),
            advertiser_email: String::new(),
            start_date: None,
            end_date: None,
        }
    }
    pub fn set_advertiser_name(mut self, name: &str) -> Self {
        self.advertiser_name = name.to_string();
        self
    }
    pub fn set_advertiser_email(mut self, email: &str) -> Self {
        self.advertiser_email = email.to_string();
        self
    }
    pub fn set_start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }
    pub fn set_end_date(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }
    pub fn ad_space_id(&self) -> AdSpaceId {
        self.ad_space_id
    }
    pub fn advertiser_name(&self) -> &str {
        &self.advertiser_name
    }
    pub fn advertiser_email(&self) -> &str {
        &self.advertiser_email
    }
    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }
    pub fn end_date(&self) -> Option<Date> {
        self.end_date
    }
}

impl ValidatedRequest {
    pub(crate) fn new(
        request: &BookingRequest,
        ad_space_name: &str,
        start_date: Date,
        end_date: Date,
        total_cost: Money,
    ) -> Self {
        Self {
            ad_space_id: request.ad_space_id,
            ad_space_name: ad_space_name.to_string(),
            advertiser_name: request.advertiser_name.clone(),
            advertiser_email: request.advertiser_email.clone(),
            start_date,
            end_date,
            total_cost,
        }
    }
    pub fn ad_space_id(&self) -> AdSpaceId {
        self.ad_space_id
    }
    pub fn ad_space_name(&self) -> &str {
        &self.ad_space_name
    }
    pub fn advertiser_name(&self) -> &str {
        &self.advertiser_name
    }
    pub fn advertiser_email(&self) -> &str {
        &self.advertiser_email
    }
    pub fn start_date(&self) -> Date {
        self.start_date
    }
    pub fn end_date(&self) -> Date {
        self.end_date
    }
    pub fn total_cost(&self) -> Money {
        self.total_cost
    }
    /// Turn the request into a pending booking. Only repositories call this,
    /// since they own id and creation time.
    pub fn into_booking(self, id: BookingId, created_at: TimeStamp) -> Booking {
        Booking {
            id,
            ad_space_id: self.ad_space_id,
            ad_space_name: self.ad_space_name,
            advertiser_name: self.advertiser_name,
            advertiser_email: self.advertiser_email,
            start_date: self.start_date,
            end_date: self.end_date,
            status: BookingStatus::Pending,
            total_cost: self.total_cost,
            created_at,
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "booking status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<C> minicbor::Encode<C> for BookingId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.u64(self.0)?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for BookingId {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(BookingId(d.u64()?))
    }
}
