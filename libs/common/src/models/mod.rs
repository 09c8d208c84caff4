//! Wire models shared by the API service and the client
//!
//! Every entity mirrors a row of the API database. `New*` payloads create a
//! record, `Update*` payloads patch one: absent fields are left untouched.

pub mod auth;
pub mod category;
pub mod hero_slide;
pub mod image;
pub mod query;
pub mod social_media;
pub mod testimonial;
pub mod user;

// Re-export for convenience
pub use auth::{LoginForm, PasswordChange, RefreshTokenRequest, TokenResponse};
pub use category::{Category, NewCategory, UpdateCategory};
pub use hero_slide::{HeroSlide, NewHeroSlide, UpdateHeroSlide};
pub use image::{Image, ImageMetadata, UpdateImage};
pub use query::{ImageQuery, ListQuery};
pub use social_media::{NewSocialMedia, SocialMedia, UpdateSocialMedia};
pub use testimonial::{NewTestimonial, Testimonial, UpdateTestimonial};
pub use user::User;

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Used together with `#[serde(default)]` so that a missing key stays `None`
/// while `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
