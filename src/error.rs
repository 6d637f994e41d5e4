use std::error::Error;
use std::fmt;

use crate::api::ApiError;
use crate::bootstrap::BootstrapError;
use crate::client::{EventError, GuestConversionError, PlayCardError};


#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Internal error at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Internal error at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::UnexpectedResponse(message) => write!(f, "unexpected response: {message}"),
            EventError::CannotApplyResponse(message) => {
                write!(f, "cannot apply response: {message}")
            }
        }
    }
}

impl fmt::Display for GuestConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestConversionError::NotGuest => f.write_str("not a guest account"),
            GuestConversionError::MissingFields(message) => f.write_str(message),
            GuestConversionError::AlreadyPending => f.write_str("conversion already in progress"),
        }
    }
}

// Allows `?` into `anyhow::Result` at the binary edges.
impl Error for ApiError {}
impl Error for BootstrapError {}
impl Error for EventError {}
impl Error for GuestConversionError {}
impl Error for PlayCardError {}
