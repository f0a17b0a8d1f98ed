//! Booking request validation.
//!
//! Every rule is evaluated on every call so a form can show all of its errors
//! at once. Violations come back in rule order, which is also field order:
//! advertiserName, advertiserEmail, startDate, endDate, adSpace.
use super::ad_space::{AdSpace, AdSpaceStatus};
use super::availability;
use super::booking::{BookingRequest, ValidatedRequest};
use super::config::BookingPolicy;
use super::pricing;
use super::types::Date;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    AdvertiserName,
    AdvertiserEmail,
    StartDate,
    EndDate,
    AdSpace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: Field,
    pub message: String,
}

/// Ordered, non-empty when returned from [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::AdvertiserName => "advertiserName",
            Field::AdvertiserEmail => "advertiserEmail",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::AdSpace => "adSpace",
        }
    }
}

impl FieldViolation {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Violations {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        Self(vec![FieldViolation::new(field, message)])
    }
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }
    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|v| v.field).collect()
    }
    /// Messages reported against one field, in the order they were found.
    pub fn for_field(&self, field: Field) -> Vec<&str> {
        self.0
            .iter()
            .filter(|v| v.field == field)
            .map(|v| v.message.as_str())
            .collect()
    }
}

impl IntoIterator for Violations {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Deliberately loose: an `@` and a `.` somewhere in the address.
pub fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Check `candidate` against the booking rules and price it.
///
/// `ad_space` is the current record for `candidate.ad_space_id()`, or `None`
/// when the repository does not know it. `today` is supplied by the caller;
/// nothing here reads a clock.
pub fn validate(
    candidate: &BookingRequest,
    ad_space: Option<&AdSpace>,
    today: Date,
    policy: &BookingPolicy,
) -> Result<ValidatedRequest, Violations> {
    let mut violations = Violations::default();

    if candidate.advertiser_name().trim().is_empty() {
        violations.push(Field::AdvertiserName, "Advertiser name is required");
    }

    let email = candidate.advertiser_email().trim();
    if email.is_empty() {
        violations.push(Field::AdvertiserEmail, "Email is required");
    } else if !is_plausible_email(email) {
        violations.push(Field::AdvertiserEmail, "Invalid email format");
    }

    let start = candidate.start_date();
    let end = candidate.end_date();

    match start {
        None => violations.push(Field::StartDate, "Start date is required"),
        Some(start) if start <= today => {
            violations.push(Field::StartDate, "Start date must be in the future")
        }
        Some(_) => {}
    }

    match (start, end) {
        (_, None) => violations.push(Field::EndDate, "End date is required"),
        (Some(start), Some(end)) => {
            if end <= start {
                violations.push(Field::EndDate, "End date must be after start date");
            }
            if pricing::duration_days(start, end) < i64::from(policy.min_duration_days) {
                violations.push(
                    Field::EndDate,
                    format!(
                        "Minimum booking duration is {} days",
                        policy.min_duration_days
                    ),
                );
            }
        }
        // no start to compare against; the startDate violation covers it
        (None, Some(_)) => {}
    }

    match ad_space {
        None => violations.push(
            Field::AdSpace,
            format!("Ad space not found with id: {}", candidate.ad_space_id()),
        ),
        Some(space) if space.id != candidate.ad_space_id() => violations.push(
            Field::AdSpace,
            format!(
                "Ad space {} does not match requested id {}",
                space.id,
                candidate.ad_space_id()
            ),
        ),
        Some(space) if policy.require_available_space && !availability::is_bookable(space) => {
            violations.push(Field::AdSpace, not_available_message(space.status))
        }
        Some(_) => {}
    }

    if let (Some(space), Some(start), Some(end)) = (ad_space, start, end) {
        if violations.is_empty() {
            match pricing::compute_total_cost(start, end, space.price_per_day) {
                Some(total_cost) => {
                    return Ok(ValidatedRequest::new(
                        candidate, &space.name, start, end, total_cost,
                    ));
                }
                None => violations.push(
                    Field::AdSpace,
                    "Total cost exceeds the largest supported amount",
                ),
            }
        }
    }

    Err(violations)
}

fn not_available_message(status: AdSpaceStatus) -> String {
    format!("Ad space is not available for booking. Current status: {status}")
}
