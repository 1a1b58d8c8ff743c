//! Booking model, lifecycle rules and list filters

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgTypeInfo, Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    item::Item,
    page::{PageRequest, DEFAULT_PAGE_SIZE},
    user::User,
};
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking status. WAITING is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        }
    }

    /// Status an owner's decision moves a waiting booking to
    pub fn decided(approved: bool) -> Self {
        if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// Stored as text
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

// ---------------------------------------------------------------------------
// BookingState (list filter)
// ---------------------------------------------------------------------------

/// Filter applied when listing bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    #[default]
    All,
    /// Started and not yet ended
    Current,
    /// Ended
    Past,
    /// Not yet started
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    /// Parse an optional query value; absent means ALL, names are case-insensitive
    pub fn parse_param(value: Option<&str>) -> AppResult<Self> {
        match value {
            None => Ok(BookingState::All),
            Some(s) => s
                .parse()
                .map_err(|_| AppError::Validation(format!("Unknown state: {}", s))),
        }
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(format!("Unknown state: {}", s)),
        }
    }
}

/// Whose bookings are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    /// Bookings made by the user
    Booker(i64),
    /// Bookings of items the user owns
    Owner(i64),
}

/// Fully resolved list filter handed to the repository
#[derive(Debug, Clone, PartialEq)]
pub struct BookingFilter {
    pub party: BookingParty,
    pub state: BookingState,
    pub now: NaiveDateTime,
    pub page: PageRequest,
}

/// Query parameters of the booking list endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED (default: ALL)
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl BookingListQuery {
    /// Parsed state filter and page window
    pub fn resolve(&self) -> AppResult<(BookingState, PageRequest)> {
        let state = BookingState::parse_param(self.state.as_deref())?;
        let page = PageRequest::new(self.from.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE))?;
        Ok((state, page))
    }
}

/// Query parameters of the approval endpoint
#[derive(Debug, Clone, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApprovalQuery {
    pub approved: bool,
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Booking as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    #[sqlx(rename = "start_date")]
    pub start: NaiveDateTime,
    #[sqlx(rename = "end_date")]
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub item_id: i64,
    pub booker_id: i64,
}

impl Booking {
    /// Only waiting bookings can be approved or rejected
    pub fn ensure_waiting(&self) -> AppResult<()> {
        if self.status != BookingStatus::Waiting {
            return Err(AppError::Validation(format!(
                "Booking {} has already been {}",
                self.id,
                self.status.as_str().to_lowercase()
            )));
        }
        Ok(())
    }
}

/// Booking together with its booker and item
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub booker: User,
    pub item: Item,
}

/// Create booking request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[validate(required(message = "must be set"))]
    pub item_id: Option<i64>,
    /// Local date-time, e.g. 2025-06-01T10:00:00
    #[validate(required(message = "must be set"))]
    pub start: Option<NaiveDateTime>,
    #[validate(required(message = "must be set"))]
    pub end: Option<NaiveDateTime>,
}

impl CreateBooking {
    /// Check the requested period against `now`, returning `(start, end)`
    pub fn period(&self, now: NaiveDateTime) -> AppResult<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::Validation(
                    "Booking start and end are required".to_string(),
                ))
            }
        };

        if start == end {
            return Err(AppError::Validation(
                "Booking start and end must differ".to_string(),
            ));
        }
        if start > end {
            return Err(AppError::Validation(
                "Booking start must be before its end".to_string(),
            ));
        }
        if start < now {
            return Err(AppError::Validation(
                "Booking start must not be in the past".to_string(),
            ));
        }

        Ok((start, end))
    }
}

/// Booking view returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: User,
    pub item: super::item::ItemResponse,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            id: details.booking.id,
            start: details.booking.start,
            end: details.booking.end,
            status: details.booking.status,
            booker: details.booker,
            item: details.item.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn request(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> CreateBooking {
        CreateBooking { item_id: Some(1), start, end }
    }

    #[test]
    fn test_period_accepts_future_window() {
        let now = noon();
        let start = now + Duration::hours(1);
        let end = now + Duration::days(1);
        assert_eq!(request(Some(start), Some(end)).period(now).unwrap(), (start, end));
    }

    #[test]
    fn test_period_accepts_start_equal_to_now() {
        let now = noon();
        assert!(request(Some(now), Some(now + Duration::hours(1))).period(now).is_ok());
    }

    #[test]
    fn test_list_query_resolves_state_and_page() {
        let query = BookingListQuery { state: Some("future".into()), from: Some(4), size: Some(2) };
        let (state, page) = query.resolve().unwrap();
        assert_eq!(state, BookingState::Future);
        assert_eq!(page.offset(), 4);

        let (state, page) = BookingListQuery::default().resolve().unwrap();
        assert_eq!(state, BookingState::All);
        assert_eq!(page, PageRequest::default());

        let unknown = BookingListQuery { state: Some("SOON".into()), ..Default::default() };
        match unknown.resolve() {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Unknown state: SOON"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_period_rejects_missing_dates() {
        let now = noon();
        assert!(request(None, Some(now)).period(now).is_err());
        assert!(request(Some(now), None).period(now).is_err());
    }

    #[test]
    fn test_period_rejects_equal_and_inverted() {
        let now = noon();
        let t = now + Duration::hours(2);
        assert!(matches!(request(Some(t), Some(t)).period(now), Err(AppError::Validation(_))));
        assert!(matches!(
            request(Some(t), Some(t - Duration::hours(1))).period(now),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_period_rejects_past_start() {
        let now = noon();
        let res = request(Some(now - Duration::minutes(1)), Some(now + Duration::hours(1))).period(now);
        assert!(matches!(res, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_state_parsing_is_case_insensitive() {
        assert_eq!(BookingState::parse_param(None).unwrap(), BookingState::All);
        assert_eq!(BookingState::parse_param(Some("current")).unwrap(), BookingState::Current);
        assert_eq!(BookingState::parse_param(Some("Rejected")).unwrap(), BookingState::Rejected);
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        match BookingState::parse_param(Some("UNSUPPORTED_STATUS")) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Unknown state: UNSUPPORTED_STATUS"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_state_with_surrounding_spaces_is_unknown() {
        assert!(BookingState::parse_param(Some(" past")).is_err());
        assert!(BookingState::parse_param(Some("PAST ")).is_err());
    }

    #[test]
    fn test_only_waiting_bookings_can_be_decided() {
        let mut booking = Booking {
            id: 3,
            start: noon(),
            end: noon() + Duration::days(1),
            status: BookingStatus::Waiting,
            item_id: 1,
            booker_id: 2,
        };
        assert!(booking.ensure_waiting().is_ok());

        booking.status = BookingStatus::decided(true);
        assert_eq!(booking.status, BookingStatus::Approved);
        assert!(booking.ensure_waiting().is_err());

        booking.status = BookingStatus::decided(false);
        assert_eq!(booking.status, BookingStatus::Rejected);
        assert!(booking.ensure_waiting().is_err());
    }

    #[test]
    fn test_create_booking_wire_format() {
        let body: CreateBooking = serde_json::from_str(
            r#"{"itemId": 4, "start": "2030-01-01T10:00:00", "end": "2030-01-02T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(body.item_id, Some(4));
        assert!(body.validate().is_ok());
        assert_eq!(serde_json::to_value(BookingStatus::Waiting).unwrap(), "WAITING");
    }
}
