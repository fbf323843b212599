use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{slugify, PLACEHOLDER_PHOTO};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStats {
    pub sold: Option<u32>,
    pub active: Option<u32>,
    pub experience: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub social_links: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub stats: Option<AgentStats>,
    #[serde(default)]
    pub listing_ids: Vec<String>,
}

impl Agent {
    pub fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
        self.slug = self.slug.trim().to_string();
        if self.slug.is_empty() {
            self.slug = slugify(&self.id);
        }
        if self.photo.trim().is_empty() {
            self.photo = PLACEHOLDER_PHOTO.to_string();
        }
        if matches!(self.location.as_deref(), Some(l) if l.trim().is_empty()) {
            self.location = None;
        }
        if matches!(self.social_links.as_ref(), Some(links) if links.is_empty()) {
            self.social_links = None;
        }
    }

    pub fn social_link(&self, platform: &str) -> Option<&str> {
        self.social_links
            .as_ref()?
            .get(platform)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Stats rendered for cards; unknown values print as "-".
    pub fn stat_labels(&self) -> (String, String, String) {
        let stats = self.stats.clone().unwrap_or_default();
        let dash = || "-".to_string();
        (
            stats.sold.map(|v| v.to_string()).unwrap_or_else(dash),
            stats.active.map(|v| v.to_string()).unwrap_or_else(dash),
            stats
                .experience
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(dash),
        )
    }

    /// Short bio used for the profile meta description.
    pub fn bio_excerpt(&self, max_chars: usize) -> String {
        let excerpt: String = self.bio.chars().take(max_chars).collect();
        if self.bio.chars().count() > max_chars {
            format!("{excerpt}...")
        } else {
            excerpt
        }
    }
}
