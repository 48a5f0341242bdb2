//! # Mentora Shared
//!
//! Wire types shared between the gateway and its clients: request/response
//! DTOs and the response envelope.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
