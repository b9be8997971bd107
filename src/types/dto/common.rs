use poem_openapi::Object;

use crate::types::internal::MembershipChange;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Result of an assign/revoke call
///
/// Repeating a call is not an error; `changed` is false on the repeat.
#[derive(Object, Debug)]
pub struct MembershipResponse {
    pub changed: bool,

    /// One of `created`, `removed`, `unchanged`
    pub outcome: String,
}

impl From<MembershipChange> for MembershipResponse {
    fn from(change: MembershipChange) -> Self {
        let outcome = match change {
            MembershipChange::Created => "created",
            MembershipChange::Removed => "removed",
            MembershipChange::Unchanged => "unchanged",
        };
        Self {
            changed: change.changed(),
            outcome: outcome.to_string(),
        }
    }
}

/// Generic success response for deletions
#[derive(Object, Debug)]
pub struct DeletedResponse {
    /// Whether the operation was successful
    pub success: bool,

    /// Human-readable message describing the result
    pub message: String,
}
