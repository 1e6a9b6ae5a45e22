pub mod accounts;

pub use accounts::{CreateAccountRequest, TransferRequest, UpdateAccountRequest};
pub use crate::core::error::ErrorResponse;
