//! Ad space inventory records. The core reads these but never writes them.
use super::types::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdSpaceId(pub u64);

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdSpaceType {
    #[n(0)]
    Billboard,
    #[n(1)]
    BusStop,
    #[n(2)]
    MallDisplay,
    #[n(3)]
    TransitAd,
}

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdSpaceStatus {
    #[n(0)]
    Available,
    #[n(1)]
    Booked,
    #[n(2)]
    Maintenance,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSpace {
    #[n(0)]
    pub id: AdSpaceId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    #[serde(rename = "type")]
    pub kind: AdSpaceType,
    #[n(3)]
    pub city: String,
    #[n(4)]
    pub address: String,
    #[n(5)]
    pub price_per_day: Money,
    #[n(6)]
    pub status: AdSpaceStatus,
}

/// Returned when a query value does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl AdSpace {
    pub fn new(
        id: AdSpaceId,
        name: &str,
        kind: AdSpaceType,
        city: &str,
        address: &str,
        price_per_day: Money,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            city: city.to_string(),
            address: address.to_string(),
            price_per_day,
            status: AdSpaceStatus::Available,
        }
    }
    pub fn with_status(mut self, status: AdSpaceStatus) -> Self {
        self.status = status;
        self
    }
}

impl AdSpaceType {
    pub const ALL: [AdSpaceType; 4] = [
        AdSpaceType::Billboard,
        AdSpaceType::BusStop,
        AdSpaceType::MallDisplay,
        AdSpaceType::TransitAd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdSpaceType::Billboard => "BILLBOARD",
            AdSpaceType::BusStop => "BUS_STOP",
            AdSpaceType::MallDisplay => "MALL_DISPLAY",
            AdSpaceType::TransitAd => "TRANSIT_AD",
        }
    }
}

impl AdSpaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdSpaceStatus::Available => "AVAILABLE",
            AdSpaceStatus::Booked => "BOOKED",
            AdSpaceStatus::Maintenance => "MAINTENANCE",
        }
    }
}

// Query strings arrive in any case ("billboard", "Bus_Stop").
impl FromStr for AdSpaceType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        AdSpaceType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ParseEnumError {
                kind: "ad space type",
                value: s.to_string(),
            })
    }
}

impl FromStr for AdSpaceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(AdSpaceStatus::Available),
            "BOOKED" => Ok(AdSpaceStatus::Booked),
            "MAINTENANCE" => Ok(AdSpaceStatus::Maintenance),
            _ => Err(ParseEnumError {
                kind: "ad space status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AdSpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for AdSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for AdSpaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<C> minicbor::Encode<C> for AdSpaceId {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.u64(self.0)?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for AdSpaceId {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        Ok(AdSpaceId(d.u64()?))
    }
}
