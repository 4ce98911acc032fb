//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shareit_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub flat_number: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_contact: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub flat_number: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_contact: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            flat_number: user.flat_number,
            phone_number: user.phone_number,
            preferred_contact: user.preferred_contact,
            is_admin: user.is_admin,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Reduced profile shown to other members.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicProfile {
    pub id: DbId,
    pub username: String,
    pub full_name: Option<String>,
    pub flat_number: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new user (registration).
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub flat_number: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_contact: Option<String>,
}

/// DTO for updating a user's own profile. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub flat_number: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_contact: Option<String>,
}

/// DTO for admin-toggled account flags.
#[derive(Debug, Deserialize)]
pub struct UpdateUserFlags {
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}
