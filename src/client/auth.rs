//! Login, registration and token verification

use super::envelope::{AuthData, VerifyData};
use super::{Auth, MarketClient};
use crate::core::error::{MarketError, Result, ValidationError};
use crate::core::session::Session;
use crate::core::validation::filters::normalize_email;
use crate::core::validation::validators::{email, min_length, phone, required};
use crate::entities::User;
use reqwest::Method;
use serde::Serialize;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required()("email", &self.email)?;
        required()("password", &self.password)?;
        Ok(())
    }
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Registration {
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: password.into(),
            name: None,
            phone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into()).filter(|n: &String| !n.trim().is_empty());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into()).filter(|p: &String| !p.trim().is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required()("email", &self.email)?;
        email()("email", &self.email)?;
        min_length(MIN_PASSWORD_LENGTH)("password", &self.password)?;
        if let Some(number) = &self.phone {
            phone()("phone", number)?;
        }
        Ok(())
    }
}

impl MarketClient {
    /// Sign in and store the returned session
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        credentials.validate()?;
        let url = self.endpoint(&["auth", "login"])?;
        let request = self
            .request(Method::POST, url, Auth::Optional)?
            .json(credentials);
        let data: AuthData = self.execute(request).await?.into_data("/auth/login")?;

        let token = data
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MarketError::decode("/auth/login", "missing token"))?;
        let session = Session::new(token, data.user);
        self.session().set(session.clone()).await?;
        tracing::info!(email = %credentials.email, "logged in");
        Ok(session)
    }

    /// Create an account
    ///
    /// Returns the new session when the backend signs the user in
    /// immediately, `None` when the account must be confirmed first.
    pub async fn register(&self, registration: &Registration) -> Result<Option<Session>> {
        registration.validate()?;
        let url = self.endpoint(&["auth", "register"])?;
        let request = self
            .request(Method::POST, url, Auth::Optional)?
            .json(registration);
        let data: AuthData = self
            .execute(request)
            .await?
            .into_data("/auth/register")?;

        tracing::info!(email = %registration.email, "account registered");
        match data.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                let session = Session::new(token, data.user);
                self.session().set(session.clone()).await?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Check the stored token; a rejected token clears the session
    pub async fn verify(&self) -> Result<User> {
        let url = self.endpoint(&["auth", "verify"])?;
        let request = self.request(Method::GET, url, Auth::Required)?;
        match self.execute::<VerifyData>(request).await {
            Ok(envelope) => Ok(envelope.into_data("/auth/verify")?.user),
            Err(e) if e.is_auth_failure() => {
                tracing::info!("stored token rejected, clearing session");
                self.session().clear().await?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Sign out locally
    pub async fn logout(&self) -> Result<()> {
        self.session().clear().await?;
        Ok(())
    }
}
