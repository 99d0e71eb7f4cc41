use serde::{Deserialize, Serialize};

/// Registration attribute that decides whether an account may become a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderCategory {
    Female,
    Male,
    Other,
}

impl GenderCategory {
    pub fn is_model_eligible(self) -> bool {
        matches!(self, GenderCategory::Female)
    }
}

/// Flat role tag used for display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    StandardUser,
    ModelPending,
    ModelActive,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::StandardUser => "standard_user",
            Role::ModelPending => "model_pending",
            Role::ModelActive => "model_active",
        }
    }
}

/// Public-facing data a model maintains about themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Opaque encoded image handle (a data URL in the browser client)
    pub photo_reference: Option<String>,
    pub rate_per_minute: f64,
    /// Free text, e.g. "6-9pm"
    pub availability_windows: String,
    #[serde(default)]
    pub is_online: bool,
}

impl ModelProfile {
    /// Profile created on demand when an admin toggles a model that never saved one
    pub fn shell(default_rate: f64) -> Self {
        Self {
            photo_reference: None,
            rate_per_minute: default_rate,
            availability_windows: String::new(),
            is_online: false,
        }
    }
}

/// Role plus the data only a model can carry.
///
/// A standard user has no variant holding a profile, so a user with a
/// populated profile cannot be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Standing {
    StandardUser,
    ModelPending { profile: Option<ModelProfile> },
    ModelActive { profile: Option<ModelProfile> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Primary key (a phone number in practice), never changes
    pub identifier: String,
    pub display_name: String,
    /// Stored in plain text: this is a mock, not an authentication system
    pub credential_secret: String,
    pub gender: GenderCategory,
    pub standing: Standing,
    #[serde(default)]
    pub gift_total: f64,
}

impl Account {
    /// Build a freshly registered account, deriving the role from the gender category
    pub fn new(
        display_name: String,
        identifier: String,
        credential_secret: String,
        gender: GenderCategory,
    ) -> Self {
        let standing = if gender.is_model_eligible() {
            Standing::ModelPending { profile: None }
        } else {
            Standing::StandardUser
        };

        Self {
            identifier,
            display_name,
            credential_secret,
            gender,
            standing,
            gift_total: 0.0,
        }
    }

    pub fn role(&self) -> Role {
        match self.standing {
            Standing::StandardUser => Role::StandardUser,
            Standing::ModelPending { .. } => Role::ModelPending,
            Standing::ModelActive { .. } => Role::ModelActive,
        }
    }

    pub fn profile(&self) -> Option<&ModelProfile> {
        match &self.standing {
            Standing::StandardUser => None,
            Standing::ModelPending { profile } | Standing::ModelActive { profile } => {
                profile.as_ref()
            }
        }
    }

    /// Mutable access to the profile slot; `None` for standard users
    pub fn profile_slot_mut(&mut self) -> Option<&mut Option<ModelProfile>> {
        match &mut self.standing {
            Standing::StandardUser => None,
            Standing::ModelPending { profile } | Standing::ModelActive { profile } => {
                Some(profile)
            }
        }
    }

    /// True only for an approved model whose profile is switched online
    pub fn is_listed_online(&self) -> bool {
        matches!(
            &self.standing,
            Standing::ModelActive { profile: Some(p) } if p.is_online
        )
    }
}
