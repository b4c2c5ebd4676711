//! HTTP client for the meetpulse backend.
//!
//! - [`ApiClient`] - Typed access to the meetings, feedback and profile endpoints
//! - [`ProfileBackend`] / [`DashboardSource`] - The seams the session layer talks through
//! - [`ApiError`] / [`ProfileUpdateError`] - Error types
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/meetings          list_meetings
//! POST /api/meetings          create_meeting
//! GET  /api/meetings/{id}     get_meeting
//! GET  /api/feedback          list_feedback
//! POST /api/feedback          submit_feedback
//! GET  /api/profile/{email}   get_profile
//! POST /api/profile           update_profile
//! ```

pub mod backend;
pub mod client;
pub mod error;

pub use backend::{BoxFuture, DashboardSource, ProfileBackend};
pub use client::{ApiClient, ApiConfig};
pub use error::{ApiError, ApiErrorCode, ApiResult, ProfileUpdateError};
