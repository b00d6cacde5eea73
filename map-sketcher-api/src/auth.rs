use map_sketcher_model::{AuthSession, Credentials, Registration, TokenResponse, User};

use crate::{ApiClient, ApiError, HttpRequest, Method, Transport};

impl<T: Transport> ApiClient<T> {
    /// POST /login for a token, then GET /users with it for the user object.
    /// Either step failing fails the whole login.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let url = self.config().endpoint("login");
        let body = Self::encode(credentials)?;
        let TokenResponse { token } = self
            .call_json(
                HttpRequest::new(Method::Post, url).with_body(body),
                "Login gagal!",
            )
            .await?;

        let user = self.current_user(&token).await?;
        Ok(AuthSession { token, user })
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let url = self.config().endpoint("register");
        let body = Self::encode(registration)?;
        self.call(
            HttpRequest::new(Method::Post, url).with_body(body),
            "Registration failed!",
        )
        .await?;
        Ok(())
    }

    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let url = self.config().endpoint("users");
        self.call_json(
            HttpRequest::new(Method::Get, url).with_bearer(token),
            "Login gagal!",
        )
        .await
    }
}

/// Client-side guard run before `register` is ever called.
pub fn validate_registration(
    registration: &Registration,
    confirm_password: &str,
) -> Result<(), &'static str> {
    if registration.password != confirm_password {
        return Err("Passwords do not match!");
    }
    Ok(())
}
