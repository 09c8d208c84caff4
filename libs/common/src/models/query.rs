//! List query parameters

use serde::{Deserialize, Serialize};

/// Filters for the public image listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Category name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

/// Paging and active filter shared by the curated resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_only: Option<bool>,
}

impl ListQuery {
    pub fn active_only(active_only: bool) -> Self {
        Self {
            active_only: Some(active_only),
            ..Self::default()
        }
    }

    /// Query-string pairs, omitting unset fields
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(active_only) = self.active_only {
            pairs.push(("active_only", active_only.to_string()));
        }
        pairs
    }
}

impl ImageQuery {
    pub fn featured() -> Self {
        Self {
            is_featured: Some(true),
            ..Self::default()
        }
    }

    /// Query-string pairs, omitting unset fields
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(is_featured) = self.is_featured {
            pairs.push(("is_featured", is_featured.to_string()));
        }
        pairs
    }
}
