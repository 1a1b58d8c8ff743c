//! Bookings repository for database operations

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingFilter, BookingParty, BookingState, BookingStatus},
        item::Item,
        user::User,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a WAITING booking and return its ID
    async fn create(
        &self,
        item_id: i64,
        booker_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<i64>;

    /// Booking with booker and item
    async fn get_details(&self, id: i64) -> AppResult<BookingDetails>;

    /// Move a WAITING booking to `status`. Returns false if it was no longer waiting.
    async fn set_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<bool>;

    /// Bookings matching the filter, newest start first
    async fn list(&self, filter: BookingFilter) -> AppResult<Vec<BookingDetails>>;

    /// Approved booking of the item that started before `now` and ended last
    async fn last_approved(&self, item_id: i64, now: NaiveDateTime) -> AppResult<Option<Booking>>;

    /// Approved booking of the item that starts soonest after `now`
    async fn next_approved(&self, item_id: i64, now: NaiveDateTime) -> AppResult<Option<Booking>>;

    /// Whether the user has an approved booking of the item that ended before `now`
    async fn has_finished_approved(
        &self,
        booker_id: i64,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<bool>;
}

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status, b.item_id, b.booker_id,
           u.name AS booker_name, u.email AS booker_email,
           i.name AS item_name, i.description AS item_description,
           i.available AS item_available, i.owner_id AS item_owner_id,
           i.request_id AS item_request_id
    FROM bookings b
    JOIN users u ON b.booker_id = u.id
    JOIN items i ON b.item_id = i.id
"#;

/// Internal row structure for joined booking queries
#[derive(Debug, FromRow)]
struct BookingDetailsRow {
    #[sqlx(flatten)]
    booking: Booking,
    booker_name: String,
    booker_email: String,
    item_name: String,
    item_description: String,
    item_available: bool,
    item_owner_id: i64,
    item_request_id: Option<i64>,
}

impl From<BookingDetailsRow> for BookingDetails {
    fn from(row: BookingDetailsRow) -> Self {
        let booker = User {
            id: row.booking.booker_id,
            name: row.booker_name,
            email: row.booker_email,
        };
        let item = Item {
            id: row.booking.item_id,
            name: row.item_name,
            description: row.item_description,
            available: row.item_available,
            owner: row.item_owner_id,
            request_id: row.item_request_id,
        };
        BookingDetails {
            booking: row.booking,
            booker,
            item,
        }
    }
}

/// WHERE clause for a list filter. `$1` is the user ID; time-based states
/// also use `$2` for now, which the returned flag reports.
fn filter_clause(filter: &BookingFilter) -> (String, bool) {
    let party = match filter.party {
        BookingParty::Booker(_) => "b.booker_id = $1",
        BookingParty::Owner(_) => "i.owner_id = $1",
    };

    let state = match filter.state {
        BookingState::All => None,
        BookingState::Current => Some("b.start_date <= $2 AND b.end_date >= $2"),
        BookingState::Past => Some("b.end_date < $2"),
        BookingState::Future => Some("b.start_date > $2"),
        BookingState::Waiting => Some("b.status = 'WAITING'"),
        BookingState::Rejected => Some("b.status = 'REJECTED'"),
    };

    let uses_now = matches!(
        filter.state,
        BookingState::Current | BookingState::Past | BookingState::Future
    );

    let clause = match state {
        Some(state) => format!("WHERE {} AND {}", party, state),
        None => format!("WHERE {}", party),
    };
    (clause, uses_now)
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    async fn create(
        &self,
        item_id: i64,
        booker_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(item_id)
        .bind(booker_id)
        .bind(BookingStatus::Waiting)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_details(&self, id: i64) -> AppResult<BookingDetails> {
        let query = format!("{} WHERE b.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, BookingDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BookingDetails::from)
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    async fn set_status_if_waiting(&self, id: i64, status: BookingStatus) -> AppResult<bool> {
        let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3")
            .bind(status)
            .bind(id)
            .bind(BookingStatus::Waiting)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list(&self, filter: BookingFilter) -> AppResult<Vec<BookingDetails>> {
        let user_id = match filter.party {
            BookingParty::Booker(id) | BookingParty::Owner(id) => id,
        };

        let (clause, uses_now) = filter_clause(&filter);
        let limit_idx = if uses_now { 3 } else { 2 };
        let query = format!(
            "{} {} ORDER BY b.start_date DESC LIMIT ${} OFFSET ${}",
            DETAILS_SELECT,
            clause,
            limit_idx,
            limit_idx + 1
        );

        let mut builder = sqlx::query_as::<_, BookingDetailsRow>(&query).bind(user_id);
        if uses_now {
            builder = builder.bind(filter.now);
        }
        let rows = builder
            .bind(filter.page.limit())
            .bind(filter.page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    async fn last_approved(&self, item_id: i64, now: NaiveDateTime) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, start_date, end_date, status, item_id, booker_id
            FROM bookings
            WHERE item_id = $1 AND status = $2 AND start_date < $3
            ORDER BY end_date DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn next_approved(&self, item_id: i64, now: NaiveDateTime) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, start_date, end_date, status, item_id, booker_id
            FROM bookings
            WHERE item_id = $1 AND status = $2 AND start_date > $3
            ORDER BY start_date ASC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn has_finished_approved(
        &self,
        booker_id: i64,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2 AND status = $3 AND end_date < $4
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
