use reqwest::Url;
use tracing::debug;

use crate::model::{Agent, Property};
use crate::store::DataStore;

/// Origin that relative page addresses are resolved against.
const PAGE_BASE: &str = "http://localhost/";

/// Query parameters and path slug a page was opened with. All values are
/// URL-decoded; blank values count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub search: Option<String>,
    pub agent: Option<String>,
    pub address: Option<String>,
    pub id: Option<String>,
    pub path_slug: Option<String>,
}

impl DeepLink {
    /// Accepts an absolute URL, a relative page address
    /// (`property.html?search=miami`, `/agent/sarah-jenkins`) or a bare query.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::default());
        }
        let base = Url::parse(PAGE_BASE).map_err(|e| e.to_string())?;
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(_) => base
                .join(input)
                .map_err(|e| format!("invalid page address '{input}': {e}"))?,
        };
        Ok(Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let mut link = Self::default();
        for (key, value) in url.query_pairs() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "search" => &mut link.search,
                "agent" => &mut link.agent,
                "address" => &mut link.address,
                "id" => &mut link.id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
        link.path_slug = path_slug(url.path());
        link
    }

    /// Pre-populated text for the property listing search box.
    pub fn initial_query(&self) -> Option<&str> {
        self.search
            .as_deref()
            .or(self.address.as_deref())
            .or(self.agent.as_deref())
    }

    /// Pre-populated text for the agent directory name box.
    pub fn agent_query(&self) -> Option<&str> {
        self.search.as_deref().or(self.agent.as_deref())
    }

    /// Valuation page address as `(short, full)`.
    pub fn valuation_address(&self) -> Option<(String, String)> {
        self.address.as_deref().map(valuation_address)
    }
}

/// Directory the agent profile pages live under.
const AGENT_DIR: &str = "agent";

/// Segment following the agent directory, unless it names the directory
/// index or a page file (`/agent/sarah-jenkins` yes, `/agent/`, `/agent/index`
/// and `/agent/index.html` no).
fn path_slug(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let dir = segments.iter().rposition(|s| *s == AGENT_DIR)?;
    let slug = *segments.get(dir + 1)?;
    if slug.contains('.') || slug == "index" || slug == AGENT_DIR {
        return None;
    }
    Some(slug.to_string())
}

pub fn valuation_address(full: &str) -> (String, String) {
    let full = full.trim();
    let short = full.split(',').next().unwrap_or(full).trim();
    (short.to_string(), full.to_string())
}

/// What a detail page does when the URL carries no identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    #[default]
    FirstRecord,
    NotFound,
}

impl FallbackPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "first-record" | "first" => Some(Self::FirstRecord),
            "not-found" | "none" => Some(Self::NotFound),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstRecord => "first-record",
            Self::NotFound => "not-found",
        }
    }
}

/// Which URL input picked the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedVia {
    PathSlug,
    AgentParam,
    IdParam,
    Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<T> {
    Found { record: T, via: ResolvedVia },
    /// `requested` is the identifier that matched nothing, or `None` when the
    /// URL had no identifier and the policy forbids a fallback.
    NotFound { requested: Option<String> },
}

impl<T> Resolution<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Found { record, .. } => Some(record),
            Self::NotFound { .. } => None,
        }
    }
}

/// Agent detail page: path slug, then `agent`, then legacy `id` (matched
/// against id and slug). Identifiers are tried in that order until one
/// matches; when none does the page is not-found for the first one present.
pub fn resolve_agent(
    store: &DataStore,
    link: &DeepLink,
    policy: FallbackPolicy,
) -> Resolution<Agent> {
    let candidates: Vec<(&str, ResolvedVia)> = [
        (link.path_slug.as_deref(), ResolvedVia::PathSlug),
        (link.agent.as_deref(), ResolvedVia::AgentParam),
        (link.id.as_deref(), ResolvedVia::IdParam),
    ]
    .into_iter()
    .filter_map(|(value, via)| value.map(|v| (v, via)))
    .collect();
    let Some(&(first, _)) = candidates.first() else {
        return fallback(store.agents().first(), policy);
    };
    for (requested, via) in candidates {
        let found = match via {
            ResolvedVia::IdParam => store
                .agent_by_id(requested)
                .or_else(|| store.agent_by_slug(requested)),
            _ => store.agent_by_slug(requested),
        };
        debug!(requested, ?via, found = found.is_some(), "agent lookup");
        if let Some(agent) = found {
            return Resolution::Found {
                record: agent.clone(),
                via,
            };
        }
    }
    Resolution::NotFound {
        requested: Some(first.to_string()),
    }
}

/// Property detail page: `id` is matched against slug, then legacy id.
pub fn resolve_property(
    store: &DataStore,
    link: &DeepLink,
    policy: FallbackPolicy,
) -> Resolution<Property> {
    if let Some(requested) = link.id.as_deref() {
        let found = store
            .property_by_slug(requested)
            .or_else(|| store.property_by_id(requested));
        debug!(requested, found = found.is_some(), "property lookup");
        return match found {
            Some(property) => Resolution::Found {
                record: property.clone(),
                via: ResolvedVia::IdParam,
            },
            None => Resolution::NotFound {
                requested: Some(requested.to_string()),
            },
        };
    }
    fallback(store.properties().first(), policy)
}

fn fallback<T: Clone>(first: Option<&T>, policy: FallbackPolicy) -> Resolution<T> {
    match (policy, first) {
        (FallbackPolicy::FirstRecord, Some(record)) => Resolution::Found {
            record: record.clone(),
            via: ResolvedVia::Fallback,
        },
        _ => Resolution::NotFound { requested: None },
    }
}

fn page_with_query(page: &str, key: &str, value: &str) -> String {
    let mut url = match Url::parse(PAGE_BASE).and_then(|base| base.join(page)) {
        Ok(url) => url,
        Err(_) => return page.to_string(),
    };
    url.query_pairs_mut().append_pair(key, value);
    match url.query() {
        Some(query) => format!("{page}?{query}"),
        None => page.to_string(),
    }
}

pub fn property_search_href(term: &str) -> String {
    page_with_query("property.html", "search", term.trim())
}

pub fn valuation_href(address: &str) -> String {
    page_with_query("home-valuation.html", "address", address.trim())
}

pub fn property_detail_href(slug: &str) -> String {
    page_with_query("property-detail.html", "id", slug)
}

/// Slug-path form used by directory cards and suggestions.
pub fn agent_profile_href(slug: &str) -> String {
    format!("agent/{slug}")
}

/// Legacy id form still used by the valuation page.
pub fn agent_legacy_href(id: &str) -> String {
    page_with_query("agent/index.html", "id", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DataStore {
        let props: Vec<Property> = serde_json::from_str(
            r#"[{"id":"prop-1","slug":"park-avenue","price":1,"address":"1 Park Ave, NY","beds":1,"baths":1,"status":"for-sale"},
                {"id":"prop-2","slug":"willow-creek","price":2,"address":"2 Willow, NY","beds":1,"baths":1,"status":"sold"}]"#,
        )
        .unwrap();
        let agents: Vec<Agent> = serde_json::from_str(
            r#"[{"id":"agent-1","slug":"sarah-jenkins","name":"Sarah Jenkins"},
                {"id":"agent-2","slug":"michael-chang","name":"Michael Chang"}]"#,
        )
        .unwrap();
        DataStore::new(props, agents).unwrap()
    }

    fn agent_slug(r: &Resolution<Agent>) -> Option<&str> {
        r.record().map(|a| a.slug.as_str())
    }

    #[test]
    fn parse_decodes_query_values() {
        let link = DeepLink::parse("property.html?search=Miami%20Beach&id=").unwrap();
        assert_eq!(link.search.as_deref(), Some("Miami Beach"));
        assert_eq!(link.id, None);
        assert_eq!(link.path_slug, None);

        let link = DeepLink::parse("https://raya.example/agent/sarah-jenkins").unwrap();
        assert_eq!(link.path_slug.as_deref(), Some("sarah-jenkins"));
    }

    #[test]
    fn initial_query_prefers_search_then_address_then_agent() {
        let link = DeepLink::parse("?agent=Sarah&address=12%20Elm").unwrap();
        assert_eq!(link.initial_query(), Some("12 Elm"));
        assert_eq!(link.agent_query(), Some("Sarah"));
        assert_eq!(DeepLink::default().initial_query(), None);
    }

    #[test]
    fn agent_resolution_order() {
        let store = store();
        let by_id = resolve_agent(&store, &DeepLink::parse("?id=agent-2").unwrap(), FallbackPolicy::FirstRecord);
        assert_eq!(agent_slug(&by_id), Some("michael-chang"));

        let legacy_slug = resolve_agent(&store, &DeepLink::parse("?id=sarah-jenkins").unwrap(), FallbackPolicy::FirstRecord);
        assert_eq!(agent_slug(&legacy_slug), Some("sarah-jenkins"));

        let path_wins = resolve_agent(
            &store,
            &DeepLink::parse("/agent/michael-chang?agent=sarah-jenkins").unwrap(),
            FallbackPolicy::FirstRecord,
        );
        assert!(matches!(path_wins, Resolution::Found { via: ResolvedVia::PathSlug, .. }));
        assert_eq!(agent_slug(&path_wins), Some("michael-chang"));
    }

    #[test]
    fn agent_directory_urls_fall_through_to_legacy_id() {
        let store = store();
        for input in ["agent/?id=agent-2", "/agent?id=agent-2", "/agent/index?id=agent-2"] {
            let link = DeepLink::parse(input).unwrap();
            assert_eq!(link.path_slug, None, "{input}");
            let found = resolve_agent(&store, &link, FallbackPolicy::NotFound);
            assert_eq!(found.record().map(|a| a.id.as_str()), Some("agent-2"), "{input}");
        }
    }

    #[test]
    fn path_slug_only_under_agent_directory() {
        assert_eq!(
            DeepLink::parse("/site/agent/sarah-jenkins/").unwrap().path_slug.as_deref(),
            Some("sarah-jenkins")
        );
        assert_eq!(DeepLink::parse("/sarah-jenkins").unwrap().path_slug, None);
        assert_eq!(DeepLink::parse("agent/index.html?id=agent-1").unwrap().path_slug, None);
    }

    #[test]
    fn unknown_path_slug_falls_through_to_query_id() {
        let store = store();
        let link = DeepLink::parse("/agent/retired-agent?id=agent-1").unwrap();
        let found = resolve_agent(&store, &link, FallbackPolicy::NotFound);
        assert!(matches!(found, Resolution::Found { via: ResolvedVia::IdParam, .. }));

        let missing = resolve_agent(
            &store,
            &DeepLink::parse("/agent/retired-agent?id=nobody").unwrap(),
            FallbackPolicy::FirstRecord,
        );
        assert_eq!(
            missing,
            Resolution::NotFound { requested: Some("retired-agent".to_string()) }
        );
    }

    #[test]
    fn unknown_identifier_never_falls_back() {
        let store = store();
        let link = DeepLink::parse("?id=does-not-exist").unwrap();
        assert_eq!(
            resolve_agent(&store, &link, FallbackPolicy::FirstRecord),
            Resolution::NotFound { requested: Some("does-not-exist".to_string()) }
        );
        assert!(resolve_property(&store, &link, FallbackPolicy::FirstRecord)
            .record()
            .is_none());
    }

    #[test]
    fn missing_identifier_follows_policy() {
        let store = store();
        let none = DeepLink::default();
        let first = resolve_property(&store, &none, FallbackPolicy::FirstRecord);
        assert!(matches!(first, Resolution::Found { via: ResolvedVia::Fallback, .. }));
        assert_eq!(
            resolve_property(&store, &none, FallbackPolicy::NotFound),
            Resolution::NotFound { requested: None }
        );
    }

    #[test]
    fn property_id_matches_slug_then_legacy_id() {
        let store = store();
        for input in ["?id=willow-creek", "?id=prop-2"] {
            let link = DeepLink::parse(input).unwrap();
            let found = resolve_property(&store, &link, FallbackPolicy::NotFound);
            assert_eq!(found.record().map(|p| p.id.as_str()), Some("prop-2"));
        }
    }

    #[test]
    fn hrefs_encode_terms() {
        assert_eq!(property_search_href("Miami Beach"), "property.html?search=Miami+Beach");
        assert_eq!(valuation_href("1 A&B St"), "home-valuation.html?address=1+A%26B+St");
        assert_eq!(property_detail_href("park-avenue"), "property-detail.html?id=park-avenue");
        assert_eq!(agent_legacy_href("agent-1"), "agent/index.html?id=agent-1");
        assert_eq!(
            valuation_address("125 Park Ave, New York, NY"),
            ("125 Park Ave".to_string(), "125 Park Ave, New York, NY".to_string())
        );
    }

    #[test]
    fn fallback_policy_parse() {
        assert_eq!(FallbackPolicy::parse("not_found"), Some(FallbackPolicy::NotFound));
        assert_eq!(FallbackPolicy::parse("first-record"), Some(FallbackPolicy::FirstRecord));
        assert_eq!(FallbackPolicy::parse("maybe"), None);
    }
}
