//! User roster operations.

use base64::Engine as _;
use serde::Serialize;
use validator::Validate;

use youmatter_common::AppResult;
use youmatter_types::{User, UserRole, UserStatus};

use crate::ApiClient;
use crate::auth::Acknowledgement;

/// Request to create a user account.
#[derive(Debug, Serialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 80))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub role: UserRole,
}

/// Partial update of a user account.
#[derive(Debug, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Serialize)]
struct AvatarUploadRequest<'a> {
    image: &'a str,
}

/// Encode raw image bytes as the data-URL payload the avatar endpoint
/// expects.
#[must_use]
pub fn encode_avatar_image(bytes: &[u8], mime_type: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{encoded}")
}

impl ApiClient {
    /// Fetch all user accounts.
    pub async fn get_users(&self) -> AppResult<Vec<User>> {
        self.get_json("/users").await
    }

    /// Fetch one user account.
    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        self.get_json(&format!("/users/{user_id}")).await
    }

    /// Create a user account.
    pub async fn create_user(&self, req: &CreateUserRequest) -> AppResult<User> {
        req.validate()?;
        self.post_json("/users", req).await
    }

    /// Update a user account.
    pub async fn update_user(&self, user_id: i64, req: &UpdateUserRequest) -> AppResult<User> {
        self.patch_json(&format!("/users/{user_id}"), req).await
    }

    /// Delete a user account.
    pub async fn delete_user(&self, user_id: i64) -> AppResult<Acknowledgement> {
        self.delete_json(&format!("/users/{user_id}")).await
    }

    /// Change a user's password.
    pub async fn change_user_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<Acknowledgement> {
        self.post_json(
            &format!("/users/{user_id}/password"),
            &ChangePasswordRequest {
                old_password,
                new_password,
            },
        )
        .await
    }

    /// Upload a user avatar as a base64 data URL.
    pub async fn upload_user_avatar(&self, user_id: i64, image: &str) -> AppResult<User> {
        self.post_json(
            &format!("/users/{user_id}/avatar"),
            &AvatarUploadRequest { image },
        )
        .await
    }

    /// Remove a user's avatar.
    pub async fn delete_user_avatar(&self, user_id: i64) -> AppResult<User> {
        self.delete_json(&format!("/users/{user_id}/avatar")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_validation() {
        let req = CreateUserRequest {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            role: UserRole::Student,
        };
        assert!(req.validate().is_err());

        let req = CreateUserRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!Password".to_string(),
            role: UserRole::Student,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let req = UpdateUserRequest {
            email: Some("new@example.com".to_string()),
            ..UpdateUserRequest::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"email": "new@example.com"}));
    }

    #[test]
    fn test_encode_avatar_image() {
        let encoded = encode_avatar_image(b"png-bytes", "image/png");
        assert!(encoded.starts_with("data:image/png;base64,"));
        assert!(encoded.ends_with(&base64::engine::general_purpose::STANDARD.encode(b"png-bytes")));
    }
}
