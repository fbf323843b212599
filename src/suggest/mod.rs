use std::sync::OnceLock;

use itertools::Itertools;
use regex::Regex;
use serde::Serialize;

use crate::deeplink;
use crate::model::{Agent, Property};

/// Popular items shown for an empty property query.
pub const POPULAR_LIMIT: usize = 3;
/// Matches shown for a non-empty property query.
pub const MATCH_LIMIT: usize = 8;
/// Visible agent-name and location suggestions.
pub const NAME_LIMIT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    Property {
        title: String,
        address: String,
        slug: String,
    },
    Agent {
        name: String,
        slug: String,
    },
    Location {
        label: String,
    },
    Recent {
        term: String,
    },
}

impl Suggestion {
    /// Text placed into the search input when the suggestion is picked.
    pub fn display_text(&self) -> String {
        let raw = match self {
            Self::Property { title, address, .. } => {
                if title.trim().is_empty() {
                    address.as_str()
                } else {
                    title.as_str()
                }
            }
            Self::Agent { name, .. } => name.as_str(),
            Self::Location { label } => label.as_str(),
            Self::Recent { term } => term.as_str(),
        };
        collapse_whitespace(raw)
    }

    /// Detail view for full-record suggestions; plain strings have none.
    pub fn target(&self) -> Option<String> {
        match self {
            Self::Property { slug, .. } => Some(deeplink::property_detail_href(slug)),
            Self::Agent { slug, .. } => Some(deeplink::agent_profile_href(slug)),
            Self::Location { .. } | Self::Recent { .. } => None,
        }
    }
}

/// What the page does once a suggestion is clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub input_text: String,
    pub navigate_to: Option<String>,
}

pub fn select(suggestion: &Suggestion) -> Selection {
    Selection {
        input_text: suggestion.display_text(),
        navigate_to: suggestion.target(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SuggestionGroup {
    pub heading: &'static str,
    pub items: Vec<Suggestion>,
}

pub fn collapse_whitespace(input: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    let re = WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    re.replace_all(input.trim(), " ").into_owned()
}

#[derive(Clone, Debug)]
struct PropertyEntry {
    title: String,
    address: String,
    location: String,
    slug: String,
    featured: bool,
}

impl PropertyEntry {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self.location.to_lowercase().contains(needle)
    }

    fn to_suggestion(&self) -> Suggestion {
        Suggestion::Property {
            title: self.title.clone(),
            address: self.address.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Autocomplete lists built once per page from the loaded records.
#[derive(Clone, Debug, Default)]
pub struct SuggestionIndex {
    properties: Vec<PropertyEntry>,
    agents: Vec<(String, String)>,
    locations: Vec<String>,
}

impl SuggestionIndex {
    pub fn build(properties: &[Property], agents: &[Agent]) -> Self {
        let properties = properties
            .iter()
            .map(|p| PropertyEntry {
                title: p.title.clone(),
                address: p.address.clone(),
                location: p.location.clone(),
                slug: p.slug.clone(),
                featured: p.featured,
            })
            .collect();
        let locations = agents
            .iter()
            .filter_map(|a| a.location.as_deref())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unique()
            .map(str::to_string)
            .collect();
        let agents = agents
            .iter()
            .map(|a| (a.name.clone(), a.slug.clone()))
            .collect();
        Self {
            properties,
            agents,
            locations,
        }
    }

    /// Empty query: featured records first, backfilled in natural order up to
    /// three. Otherwise up to eight substring matches in natural order.
    pub fn properties(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            let featured = self.properties.iter().filter(|e| e.featured);
            let backfill = self.properties.iter().filter(|e| !e.featured);
            return featured
                .chain(backfill)
                .take(POPULAR_LIMIT)
                .map(PropertyEntry::to_suggestion)
                .collect();
        }
        self.properties
            .iter()
            .filter(|e| e.matches(&needle))
            .take(MATCH_LIMIT)
            .map(PropertyEntry::to_suggestion)
            .collect()
    }

    pub fn agents(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        self.agents
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .take(NAME_LIMIT)
            .map(|(name, slug)| Suggestion::Agent {
                name: name.clone(),
                slug: slug.clone(),
            })
            .collect()
    }

    pub fn locations(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        self.locations
            .iter()
            .filter(|l| l.to_lowercase().contains(&needle))
            .take(NAME_LIMIT)
            .map(|l| Suggestion::Location { label: l.clone() })
            .collect()
    }

    /// Dropdown contents for the property search box. The recent group is
    /// independent of the query and omitted when history is empty.
    pub fn property_groups(&self, query: &str, recent: &[String]) -> Vec<SuggestionGroup> {
        let mut groups = Vec::new();
        if !recent.is_empty() {
            groups.push(recent_group(recent));
        }
        let heading = if query.trim().is_empty() {
            "Popular Searches"
        } else {
            "Properties"
        };
        groups.push(SuggestionGroup {
            heading,
            items: self.properties(query),
        });
        groups
    }

    pub fn agent_groups(&self, query: &str, recent: &[String]) -> Vec<SuggestionGroup> {
        let mut groups = Vec::new();
        if !recent.is_empty() {
            groups.push(recent_group(recent));
        }
        groups.push(SuggestionGroup {
            heading: "Agents",
            items: self.agents(query),
        });
        groups
    }
}

fn recent_group(recent: &[String]) -> SuggestionGroup {
    SuggestionGroup {
        heading: "Recent Searches",
        items: recent
            .iter()
            .map(|term| Suggestion::Recent { term: term.clone() })
            .collect(),
    }
}
