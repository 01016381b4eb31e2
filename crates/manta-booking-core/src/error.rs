//! Booking errors

use thiserror::Error;

/// Booking errors
///
/// Policy and conflict rejections carry a stable reason code for the
/// boundary layer; they are expected outcomes, not faults. Only
/// `TransientStore` is retriable with the same inputs.
#[derive(Error, Debug)]
pub enum BookingError {
    /// Booking or cancellation window has closed
    #[error("booking window has closed for this event")]
    CutoffExceeded,

    /// Event does not exist
    #[error("event not found")]
    EventNotFound,

    /// Event exists but is not open for booking
    #[error("event is not scheduled")]
    EventNotScheduled,

    /// Event has no free slots
    #[error("event is full")]
    EventFull,

    /// No active subscription with remaining entries
    #[error("insufficient credits")]
    InsufficientCredit,

    /// Member's tiers do not allow this event category
    #[error("not authorized for this category")]
    NotAuthorized,

    /// A signup for this (member, event) pair already exists
    #[error("already booked")]
    AlreadyBooked,

    /// No signup to cancel
    #[error("not booked")]
    SignupNotFound,

    /// Store-level fault; the caller may retry the whole operation
    #[error("transient store error: {0}")]
    TransientStore(String),
}

impl BookingError {
    /// Stable reason code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CutoffExceeded => "CUTOFF_EXCEEDED",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::EventNotScheduled => "EVENT_NOT_SCHEDULED",
            Self::EventFull => "EVENT_FULL",
            Self::InsufficientCredit => "INSUFFICIENT_CREDIT",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::AlreadyBooked => "ALREADY_BOOKED",
            Self::SignupNotFound => "SIGNUP_NOT_FOUND",
            Self::TransientStore(_) => "TRANSIENT_STORE_ERROR",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::CutoffExceeded | Self::NotAuthorized => 403,
            Self::EventNotFound | Self::SignupNotFound => 404,
            Self::EventNotScheduled | Self::EventFull | Self::InsufficientCredit => 409,
            Self::AlreadyBooked => 409,
            Self::TransientStore(_) => 503,
        }
    }

    /// Whether retrying the same request can succeed
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        Self::TransientStore(err.to_string())
    }
}

impl From<manta_db::DbError> for BookingError {
    fn from(err: manta_db::DbError) -> Self {
        Self::TransientStore(err.to_string())
    }
}

/// Subscription lifecycle errors
#[derive(Error, Debug)]
pub enum EnrollmentError {
    /// Subscription does not exist
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// Subscription is in a state that cannot be activated
    #[error("subscription cannot be activated from status {0}")]
    NotActivatable(String),

    /// Store-level fault
    #[error("transient store error: {0}")]
    TransientStore(String),
}

impl EnrollmentError {
    /// Stable reason code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::NotActivatable(_) => "SUBSCRIPTION_NOT_ACTIVATABLE",
            Self::TransientStore(_) => "TRANSIENT_STORE_ERROR",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SubscriptionNotFound => 404,
            Self::NotActivatable(_) => 409,
            Self::TransientStore(_) => 503,
        }
    }
}

impl From<sqlx::Error> for EnrollmentError {
    fn from(err: sqlx::Error) -> Self {
        Self::TransientStore(err.to_string())
    }
}

impl From<manta_db::DbError> for EnrollmentError {
    fn from(err: manta_db::DbError) -> Self {
        Self::TransientStore(err.to_string())
    }
}
