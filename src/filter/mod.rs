use std::collections::BTreeSet;

use tracing::debug;

use crate::model::{Agent, ListingStatus, Property};

/// Checkbox value that switches a beds/baths dimension off.
pub const ANY: &str = "any";

/// The filter UI state, rebuilt on every interaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub types: BTreeSet<String>,
    pub beds: BTreeSet<String>,
    pub baths: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub search: String,
}

impl FilterCriteria {
    pub fn with_search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    /// Clears the checkbox and price dimensions, keeping the search text.
    pub fn reset_filters(&mut self) {
        let search = std::mem::take(&mut self.search);
        *self = Self {
            search,
            ..Self::default()
        };
    }
}

/// "At least N" threshold for a beds/baths set: the smallest checked number.
/// `"any"` anywhere in the set, or no parsable number, means no constraint.
pub fn min_threshold(values: &BTreeSet<String>) -> Option<f64> {
    if values.iter().any(|v| v.trim().eq_ignore_ascii_case(ANY)) {
        return None;
    }
    values
        .iter()
        .filter_map(|v| v.trim().trim_end_matches('+').parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .reduce(f64::min)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Featured,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "newest" => Some(Self::Newest),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "featured" => Some(Self::Featured),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Featured => "featured",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceAsc => "Price (Low to High)",
            Self::PriceDesc => "Price (High to Low)",
            Self::Featured => "Featured",
        }
    }
}

pub fn matches(property: &Property, criteria: &FilterCriteria) -> bool {
    let needle = criteria.search.trim().to_lowercase();
    matches_with_needle(property, criteria, &needle)
}

fn matches_with_needle(property: &Property, criteria: &FilterCriteria, needle: &str) -> bool {
    if !needle.is_empty() && !property.matches_text(needle) {
        return false;
    }
    if !criteria.types.is_empty()
        && !criteria
            .types
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(&property.kind))
    {
        return false;
    }
    if let Some(min_beds) = min_threshold(&criteria.beds) {
        if f64::from(property.beds) < min_beds {
            return false;
        }
    }
    if let Some(min_baths) = min_threshold(&criteria.baths) {
        if property.baths < min_baths {
            return false;
        }
    }
    // Checkbox values may arrive as labels ("For Sale") or slugs.
    if !criteria.statuses.is_empty()
        && !criteria
            .statuses
            .iter()
            .any(|s| ListingStatus::parse(s).slug() == property.status.slug())
    {
        return false;
    }
    if let Some(min) = criteria.min_price {
        if property.price < min {
            return false;
        }
    }
    if let Some(max) = criteria.max_price {
        if property.price > max {
            return false;
        }
    }
    true
}

/// Sorts in place. Every order is stable, so ties keep their prior order.
pub fn sort_properties(list: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::Newest => list.sort_by(|a, b| b.listing_date.cmp(&a.listing_date)),
        SortOrder::PriceAsc => list.sort_by_key(|p| p.price),
        SortOrder::PriceDesc => list.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Featured => list.sort_by_key(|p| !p.featured),
    }
}

/// Filters with AND across every active dimension, then applies one sort.
pub fn apply(properties: &[Property], criteria: &FilterCriteria, sort: SortOrder) -> Vec<Property> {
    let needle = criteria.search.trim().to_lowercase();
    let mut result: Vec<Property> = properties
        .iter()
        .filter(|p| matches_with_needle(p, criteria, &needle))
        .cloned()
        .collect();
    sort_properties(&mut result, sort);
    debug!(
        total = properties.len(),
        visible = result.len(),
        sort = sort.as_str(),
        "properties filtered"
    );
    result
}

/// Agent directory filter: the name must contain `name_query`; the location
/// must contain `location_query` only when that query is non-empty.
pub fn filter_agents(agents: &[Agent], name_query: &str, location_query: &str) -> Vec<Agent> {
    let name_q = name_query.trim().to_lowercase();
    let loc_q = location_query.trim().to_lowercase();
    let result: Vec<Agent> = agents
        .iter()
        .filter(|a| a.name.to_lowercase().contains(&name_q))
        .filter(|a| {
            loc_q.is_empty()
                || a.location
                    .as_deref()
                    .map(|l| l.to_lowercase().contains(&loc_q))
                    .unwrap_or(false)
        })
        .cloned()
        .collect();
    debug!(total = agents.len(), visible = result.len(), "agents filtered");
    result
}

/// Properties represented by `agent`, in data order. Unknown ids are skipped.
pub fn listings_for_agent(properties: &[Property], agent: &Agent) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| agent.listing_ids.iter().any(|id| id == &p.id))
        .cloned()
        .collect()
}

/// Everything except the property currently shown.
pub fn other_listings(properties: &[Property], slug: &str) -> Vec<Property> {
    properties.iter().filter(|p| p.slug != slug).cloned().collect()
}
