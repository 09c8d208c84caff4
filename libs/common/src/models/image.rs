//! Image model and upload metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Uploaded gallery image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Image {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub filename: String,
    pub file_path: String,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Category name, denormalised from `category_id`
    #[serde(default)]
    pub category: Option<String>,
    /// Comma-separated tags
    #[serde(default)]
    pub tags: Option<String>,
    pub is_featured: bool,
    pub is_public: bool,
    pub is_hero_image: bool,
    #[serde(default)]
    pub is_profile_picture: bool,
    #[serde(default)]
    pub is_thumbnail: bool,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Image {
    /// Tags split on commas, trimmed, empty entries dropped
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Public URL of the stored file relative to `origin`
    pub fn url(&self, origin: &str) -> String {
        let path = self
            .file_path
            .trim_start_matches("app/")
            .trim_start_matches('/');
        format!("{}/{}", origin.trim_end_matches('/'), path)
    }
}

/// Scalar fields sent alongside the file of an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImageMetadata {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 500, message = "Tags must be at most 500 characters"))]
    pub tags: Option<String>,
    #[validate(range(min = 1, message = "Category is invalid"))]
    pub category_id: Option<i64>,
    pub is_featured: bool,
    pub is_public: bool,
    pub is_hero_image: bool,
    pub is_profile_picture: bool,
    pub is_thumbnail: bool,
}

impl ImageMetadata {
    /// Metadata with the given title and the dashboard's default flags
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            tags: None,
            category_id: None,
            is_featured: false,
            is_public: true,
            is_hero_image: false,
            is_profile_picture: false,
            is_thumbnail: false,
        }
    }

    /// Multipart text fields in submission order
    ///
    /// A profile picture is never filed under a category.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("title", self.title.clone())];
        if let Some(description) = self.description.as_ref().filter(|d| !d.is_empty()) {
            fields.push(("description", description.clone()));
        }
        if let Some(category_id) = self.category_id.filter(|_| !self.is_profile_picture) {
            fields.push(("category_id", category_id.to_string()));
        }
        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            fields.push(("tags", tags.clone()));
        }
        fields.push(("is_featured", self.is_featured.to_string()));
        fields.push(("is_public", self.is_public.to_string()));
        fields.push(("is_hero_image", self.is_hero_image.to_string()));
        fields.push(("is_profile_picture", self.is_profile_picture.to_string()));
        fields.push(("is_thumbnail", self.is_thumbnail.to_string()));
        fields
    }
}

/// Partial image update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Tags must be at most 500 characters"))]
    pub tags: Option<String>,
    /// `Some(None)` clears the category
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::nullable"
    )]
    pub category_id: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hero_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_profile_picture: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_thumbnail: Option<bool>,
}
