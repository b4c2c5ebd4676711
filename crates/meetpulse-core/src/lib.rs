//! Core types: identity, records, credential decoding, dashboard statistics

pub mod credential;
pub mod dashboard;
pub mod identity;
pub mod profile;
pub mod record;
pub mod session;
pub mod tracing;

pub use credential::{CredentialResponse, DecodeError, GoogleClaims, decode_credential};
pub use dashboard::{AverageRating, DashboardStats, NO_DATA, aggregate, to_fixed};
pub use identity::{DEFAULT_ROLE, Identity, fallback_avatar};
pub use profile::{Profile, is_profile_complete};
pub use record::{Feedback, FeedbackResponses, Meeting, RecordId, decode_collection};
pub use session::{SessionPhase, SessionState};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
