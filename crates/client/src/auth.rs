//! Authentication operations.

use serde::{Deserialize, Serialize};

use youmatter_common::{AppError, AppResult};
use youmatter_types::User;

use crate::ApiClient;

/// Login request; the identifier is posted as both `email` and `username`
/// so the server can match either column.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

/// A completed session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

/// A pending two-factor challenge.
#[derive(Debug, Clone, Deserialize)]
pub struct TwoFactorChallenge {
    #[serde(default)]
    pub requires_two_factor: bool,
    #[serde(alias = "challengeId")]
    pub challenge_id: String,
    /// Masked email the code was sent to.
    #[serde(default)]
    pub email: String,
    /// Challenge lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub requires_password_reset: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginOutcome {
    /// First sign-in requires an emailed verification code.
    TwoFactor(TwoFactorChallenge),
    /// Credentials accepted.
    Session(SessionResponse),
}

/// Request to complete a two-factor challenge.
#[derive(Debug, Default, Serialize)]
pub struct VerifyTwoFactorRequest {
    pub challenge_id: String,
    pub code: String,
    /// Present when finishing a forced password reset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

/// A verified challenge that still needs a new password before the
/// session is issued.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequired {
    #[serde(default)]
    pub requires_password_reset: bool,
    #[serde(alias = "resetToken")]
    pub reset_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a two-factor verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VerifyOutcome {
    /// Code accepted; a new password must be set to finish signing in.
    PasswordReset(PasswordResetRequired),
    /// Fully signed in.
    Session(SessionResponse),
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct GoogleLoginRequest<'a> {
    token: &'a str,
}

impl ApiClient {
    /// Sign in with an email-or-username identifier.
    ///
    /// On a full session the bearer token (when issued) is installed and
    /// persisted; a two-factor outcome leaves the session untouched until
    /// [`ApiClient::verify_two_factor`] completes it.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<LoginOutcome> {
        let outcome: LoginOutcome = self
            .post_json(
                "/auth/login",
                &LoginRequest {
                    email: identifier,
                    username: identifier,
                    password,
                },
            )
            .await?;

        if let LoginOutcome::Session(session) = &outcome
            && let Some(token) = &session.token
        {
            self.remember_token(token).await;
        }
        Ok(outcome)
    }

    /// Complete a two-factor challenge.
    pub async fn verify_two_factor(&self, req: &VerifyTwoFactorRequest) -> AppResult<VerifyOutcome> {
        let outcome: VerifyOutcome = self.post_json("/auth/verify-2fa", req).await?;

        if let VerifyOutcome::Session(session) = &outcome
            && let Some(token) = &session.token
        {
            self.remember_token(token).await;
        }
        Ok(outcome)
    }

    /// Request a temporary password by email.
    pub async fn forgot_password(&self, email: &str) -> AppResult<Acknowledgement> {
        self.post_json("/auth/forgot-password", &ForgotPasswordRequest { email })
            .await
    }

    /// Sign in with a Google ID token.
    ///
    /// Only available when a Google client id is configured; otherwise the
    /// caller gets a clear message without a network call.
    pub async fn google_login(&self, id_token: &str) -> AppResult<SessionResponse> {
        if self.google_client_id().is_none() {
            return Err(AppError::Config(
                "Google Sign-In is not available.".to_string(),
            ));
        }

        let session: SessionResponse = self
            .post_json("/auth/google", &GoogleLoginRequest { token: id_token })
            .await?;

        if let Some(token) = &session.token {
            self.remember_token(token).await;
        }
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_outcome_decodes_session() {
        let raw = r#"{
            "user": {"id": 1, "username": "ada", "email": "ada@example.com", "role": "STUDENT"},
            "token": "bearer-token"
        }"#;
        let outcome: LoginOutcome = serde_json::from_str(raw).unwrap();
        match outcome {
            LoginOutcome::Session(session) => {
                assert_eq!(session.user.username, "ada");
                assert_eq!(session.token.as_deref(), Some("bearer-token"));
            }
            LoginOutcome::TwoFactor(_) => panic!("expected session"),
        }
    }

    #[test]
    fn test_login_outcome_decodes_two_factor() {
        let raw = r#"{
            "requires_two_factor": true,
            "challenge_id": "ch-1",
            "email": "a***a@example.com",
            "expires_in": 600,
            "requires_password_reset": true,
            "message": "A verification code has been sent to your email address."
        }"#;
        let outcome: LoginOutcome = serde_json::from_str(raw).unwrap();
        match outcome {
            LoginOutcome::TwoFactor(challenge) => {
                assert_eq!(challenge.challenge_id, "ch-1");
                assert!(challenge.requires_password_reset);
            }
            LoginOutcome::Session(_) => panic!("expected two-factor challenge"),
        }
    }

    #[test]
    fn test_verify_outcome_decodes_password_reset() {
        let raw = r#"{
            "requires_password_reset": true,
            "reset_token": "rt-1",
            "expires_in": 600,
            "email": "a***a@example.com"
        }"#;
        let outcome: VerifyOutcome = serde_json::from_str(raw).unwrap();
        assert!(matches!(outcome, VerifyOutcome::PasswordReset(r) if r.reset_token == "rt-1"));
    }

    #[test]
    fn test_verify_request_omits_absent_reset_fields() {
        let req = VerifyTwoFactorRequest {
            challenge_id: "ch-1".to_string(),
            code: "123456".to_string(),
            ..VerifyTwoFactorRequest::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("reset_token").is_none());
        assert!(value.get("new_password").is_none());
    }
}
