use crate::core::error::MarketError;
use crate::models::account::GenderCategory;
use serde::Deserialize;

/// Body of a registration request, exactly as the form submits it
#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    pub name: String,
    /// Phone number used as the account identifier
    pub mobile: String,
    pub password: String,
    pub gender: GenderCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegistration {
    pub display_name: String,
    pub identifier: String,
    pub secret: String,
    pub gender: GenderCategory,
}

impl RegisterParams {
    pub fn validate(self) -> Result<ValidatedRegistration, MarketError> {
        let display_name = non_empty(&self.name, "name")?;
        let identifier = non_empty(&self.mobile, "mobile")?;

        // Passwords are compared verbatim, never trimmed
        if self.password.is_empty() {
            return Err(MarketError::InvalidInput("password must not be empty".to_string()));
        }

        Ok(ValidatedRegistration {
            display_name,
            identifier,
            secret: self.password,
            gender: self.gender,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginParams {
    pub username: String,
    pub password: String,
}

/// Model profile form. Missing or unusable rates fall back to the default.
#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub rate_per_minute: Option<f64>,
    #[serde(default)]
    pub availability_windows: String,
    pub photo_reference: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}

impl ProfileParams {
    pub fn availability(&self) -> String {
        self.availability_windows.trim().to_string()
    }

    /// An empty photo string means "no new photo", same as omitting it
    pub fn photo(&self) -> Option<String> {
        self.photo_reference
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }
}

/// Rate to persist: the submitted one when it is a positive finite number
pub fn normalize_rate(rate: Option<f64>, default_rate: f64) -> f64 {
    match rate {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => default_rate,
    }
}

#[derive(Debug, Deserialize)]
pub struct ForceOnlineParams {
    pub online: bool,
}

#[derive(Debug, Deserialize)]
pub struct StartCallParams {
    pub target: String,
    pub minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct GiftParams {
    pub target: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChatParams {
    pub text: String,
}

fn non_empty(value: &str, field: &str) -> Result<String, MarketError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MarketError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
