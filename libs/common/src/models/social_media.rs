//! Social media link model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Link to one of the studio's social profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct SocialMedia {
    pub id: i64,
    /// Platform key, e.g. `instagram`
    pub platform: String,
    pub display_name: String,
    pub url: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// New social media link payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewSocialMedia {
    #[validate(length(min = 1, max = 50, message = "Platform is required"))]
    pub platform: String,
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    pub display_name: String,
    #[validate(url(message = "Please enter a valid URL"))]
    pub url: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default = "crate::validation::default_true")]
    pub is_active: bool,
    #[serde(default)]
    #[validate(range(min = 0, message = "Sort order cannot be negative"))]
    pub sort_order: i32,
}

/// Social media link update payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateSocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Platform is required"))]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "Please enter a valid URL"))]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Sort order cannot be negative"))]
    pub sort_order: Option<i32>,
}
