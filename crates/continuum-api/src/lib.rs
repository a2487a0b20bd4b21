//! Continuum API client
//!
//! Thin HTTP layer over the remote board service. Every call is a single
//! attempt; callers decide what to do with failures.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, ApiResult, RequestOptions, DEFAULT_API_URL};
pub use types::{
    CardPayload, CardUpdatePayload, CategoryPayload, ErrorPayload, HealthStatus,
    MoveCardPayload, NewCardPayload,
};
