//! Repositories for database operations

pub mod categories;
pub mod hero_slides;
pub mod images;
pub mod social_media;
pub mod testimonials;
pub mod users;

pub use categories::CategoryRepository;
pub use hero_slides::HeroSlideRepository;
pub use images::ImageRepository;
pub use social_media::SocialMediaRepository;
pub use testimonials::TestimonialRepository;
pub use users::UserRepository;

/// Paging shared by the list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            offset: skip.unwrap_or(0).max(0),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }
}
