//! Booking lifecycle service

use crate::{
    error::{AppError, AppResult},
    models::{
        self,
        booking::{BookingFilter, BookingParty, BookingResponse, BookingState, BookingStatus, CreateBooking},
        page::PageRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book an item for a period. The booking starts out WAITING.
    pub async fn create_booking(
        &self,
        booker_id: i64,
        booking: CreateBooking,
    ) -> AppResult<BookingResponse> {
        self.ensure_user(booker_id).await?;

        let item_id = booking
            .item_id
            .ok_or_else(|| AppError::Validation("itemId: must be set".to_string()))?;
        let item = self.repository.items.get_by_id(item_id).await?;

        if !item.available {
            return Err(AppError::Validation(format!(
                "Item {} is not available for booking",
                item_id
            )));
        }
        if item.owner == booker_id {
            return Err(AppError::Validation(format!(
                "Owner cannot book their own item {}",
                item_id
            )));
        }

        let (start, end) = booking.period(models::now())?;

        let id = self
            .repository
            .bookings
            .create(item_id, booker_id, start, end)
            .await?;
        tracing::info!(
            "Created booking id={} of item id={} by user id={}",
            id,
            item_id,
            booker_id
        );

        Ok(self.repository.bookings.get_details(id).await?.into())
    }

    /// Approve or reject a waiting booking. Only the item's owner may decide.
    pub async fn decide(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> AppResult<BookingResponse> {
        let details = self.repository.bookings.get_details(booking_id).await?;

        if details.item.owner != owner_id {
            return Err(AppError::Validation(format!(
                "User {} does not own the item of booking {}",
                owner_id, booking_id
            )));
        }
        details.booking.ensure_waiting()?;

        let status = BookingStatus::decided(approved);
        if !self
            .repository
            .bookings
            .set_status_if_waiting(booking_id, status)
            .await?
        {
            return Err(AppError::Validation(format!(
                "Booking {} has already been decided",
                booking_id
            )));
        }
        tracing::info!("Booking id={} is now {}", booking_id, status);

        let mut details = details;
        details.booking.status = status;
        Ok(details.into())
    }

    /// A booking, visible to its booker and to the item's owner
    pub async fn get_booking(&self, user_id: i64, booking_id: i64) -> AppResult<BookingResponse> {
        let details = self.repository.bookings.get_details(booking_id).await?;
        if details.booker.id != user_id && details.item.owner != user_id {
            return Err(AppError::NotFound(format!(
                "Booking with id {} not found for user {}",
                booking_id, user_id
            )));
        }
        Ok(details.into())
    }

    /// Bookings made by `user_id`
    pub async fn list_for_booker(
        &self,
        user_id: i64,
        state: BookingState,
        page: PageRequest,
    ) -> AppResult<Vec<BookingResponse>> {
        self.list(BookingParty::Booker(user_id), state, page).await
    }

    /// Bookings of items owned by `user_id`
    pub async fn list_for_owner(
        &self,
        user_id: i64,
        state: BookingState,
        page: PageRequest,
    ) -> AppResult<Vec<BookingResponse>> {
        self.list(BookingParty::Owner(user_id), state, page).await
    }

    async fn list(
        &self,
        party: BookingParty,
        state: BookingState,
        page: PageRequest,
    ) -> AppResult<Vec<BookingResponse>> {
        let user_id = match party {
            BookingParty::Booker(id) | BookingParty::Owner(id) => id,
        };
        self.ensure_user(user_id).await?;

        tracing::debug!("Listing {:?} bookings, state={}", party, state);
        let filter = BookingFilter {
            party,
            state,
            now: models::now(),
            page,
        };
        let bookings = self.repository.bookings.list(filter).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    async fn ensure_user(&self, id: i64) -> AppResult<()> {
        if !self.repository.users.exists(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
