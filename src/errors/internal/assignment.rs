use thiserror::Error;

use crate::types::internal::UserId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("Invalid level '{value}': expected one of user, admin, super_admin")]
    InvalidLevelValue { value: String },

    /// Attempt to strip the bootstrap identity of its privilege
    #[error("User {user_id} is the bootstrap super_admin and cannot be {attempted}")]
    SelfLockoutRejected { user_id: UserId, attempted: String },
}
