use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::deeplink::{self, DeepLink, FallbackPolicy, Resolution};
use crate::filter::{self, FilterCriteria, SortOrder};
use crate::model::RecordKind;
use crate::output::{OutputRecord, PageKind, PageOutput, PageState};
use crate::page::{AgentDirectoryPage, HomeSearch, HomeTab, ListingPage};
use crate::recent::KeyValueStorage;
use crate::render;
use crate::store::{self, DataSource, DataStore, Sources, StoreError};
use crate::suggest::SuggestionIndex;

pub const DEFAULT_PROPERTIES: &str = "./fixtures/properties.json";
pub const DEFAULT_AGENTS: &str = "./fixtures/agents.json";

#[derive(Clone, Debug)]
pub struct Options {
    pub properties: DataSource,
    pub agents: DataSource,
    /// Address the page was opened with (query string and path slug).
    pub page_url: Option<String>,
    pub fallback: FallbackPolicy,
    pub timeout_seconds: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            properties: DataSource::FilePath(DEFAULT_PROPERTIES.to_string()),
            agents: DataSource::FilePath(DEFAULT_AGENTS.to_string()),
            page_url: None,
            fallback: FallbackPolicy::default(),
            timeout_seconds: 10,
        }
    }
}

/// Which page to run and the interactions to replay on it.
#[derive(Clone, Debug)]
pub enum PageRequest {
    /// Listing page. A non-empty `criteria.search` is treated as a submitted
    /// search and replaces whatever the page address pre-populated.
    PropertyListing {
        criteria: FilterCriteria,
        sort: SortOrder,
    },
    AgentDirectory {
        name: Option<String>,
        location: Option<String>,
    },
    PropertyDetail,
    AgentProfile,
    Suggestions {
        query: String,
        agents: bool,
    },
    /// Home hero search. A non-blank query is submitted on the given tab.
    /// `strip_ticks` autoplay intervals are replayed on the featured strip,
    /// which holds still while `strip_hovered`.
    HomeSearch {
        query: String,
        tab: HomeTab,
        strip_ticks: u32,
        strip_hovered: bool,
    },
    /// Home valuation page; the address comes from the page URL.
    Valuation,
}

impl PageRequest {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::PropertyListing { .. } => PageKind::PropertyListing,
            Self::AgentDirectory { .. } => PageKind::AgentDirectory,
            Self::PropertyDetail => PageKind::PropertyDetail,
            Self::AgentProfile => PageKind::AgentProfile,
            Self::Suggestions { .. } => PageKind::Suggestions,
            Self::HomeSearch { .. } => PageKind::Home,
            Self::Valuation => PageKind::Valuation,
        }
    }

    /// Fixtures the page loads; the other side is left empty.
    fn sources(&self, options: &Options) -> Sources {
        let properties = Some(options.properties.clone());
        let agents = Some(options.agents.clone());
        match self {
            Self::PropertyListing { .. } | Self::PropertyDetail => Sources {
                properties,
                agents: None,
            },
            Self::AgentDirectory { .. } | Self::Valuation => Sources {
                properties: None,
                agents,
            },
            Self::AgentProfile | Self::Suggestions { .. } | Self::HomeSearch { .. } => {
                Sources { properties, agents }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid page url: {url}: {message}")]
    InvalidPageUrl { url: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct PageResult {
    pub started_at: Instant,
    pub elapsed: Duration,
    pub output: PageOutput,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
    link: DeepLink,
    client: reqwest::Client,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        let link = match options.page_url.as_deref() {
            Some(url) => DeepLink::parse(url).map_err(|message| RunnerError::InvalidPageUrl {
                url: url.to_string(),
                message,
            })?,
            None => DeepLink::default(),
        };
        let client = store::build_client(options.timeout_seconds)
            .map_err(|source| RunnerError::HttpClientBuild { source })?;
        Ok(Self {
            options,
            link,
            client,
        })
    }

    /// Loads the page's fixtures, then renders it. A load failure yields the
    /// error page rather than an `Err`.
    pub async fn run<S: KeyValueStorage>(&self, request: PageRequest, storage: S) -> PageResult {
        let started_at = Instant::now();
        let kind = request.kind();
        let sources = request.sources(&self.options);
        let output = match DataStore::load(&sources, &self.client).await {
            Ok(store) => self.render(&store, request, storage),
            Err(err) => load_error(kind, &err),
        };
        let elapsed = started_at.elapsed();
        info!(
            page = ?kind,
            state = ?output.state,
            results = output.result_count,
            elapsed_ms = elapsed.as_millis() as u64,
            "page rendered"
        );
        PageResult {
            started_at,
            elapsed,
            output,
        }
    }

    /// Renders against an already loaded snapshot.
    pub fn render<S: KeyValueStorage>(
        &self,
        store: &DataStore,
        request: PageRequest,
        storage: S,
    ) -> PageOutput {
        match request {
            PageRequest::PropertyListing { criteria, sort } => {
                property_listing(store, &self.link, criteria, sort, storage)
            }
            PageRequest::AgentDirectory { name, location } => {
                agent_directory(store, &self.link, name, location, storage)
            }
            PageRequest::PropertyDetail => property_detail(store, &self.link, self.options.fallback),
            PageRequest::AgentProfile => agent_profile(store, &self.link, self.options.fallback),
            PageRequest::Suggestions { query, agents } => {
                suggestions(store, &query, agents, storage)
            }
            PageRequest::HomeSearch {
                query,
                tab,
                strip_ticks,
                strip_hovered,
            } => home_search(store, &query, tab, (strip_ticks, strip_hovered), storage),
            PageRequest::Valuation => valuation(store, &self.link),
        }
    }
}

fn load_error(kind: PageKind, err: &StoreError) -> PageOutput {
    warn!(error = %err, "fixture load failed");
    let mut out = PageOutput::new(kind, PageState::LoadError);
    out.html = render::render_load_error(err.kind());
    out.message = Some(format!(
        "Unable to load {} data. Please try again later.",
        err.kind()
    ));
    out
}

fn listing_state(count: usize) -> PageState {
    if count == 0 {
        PageState::Empty
    } else {
        PageState::Ready
    }
}

fn property_listing<S: KeyValueStorage>(
    store: &DataStore,
    link: &DeepLink,
    criteria: FilterCriteria,
    sort: SortOrder,
    storage: S,
) -> PageOutput {
    let submitted = !criteria.search.trim().is_empty();
    let mut criteria = criteria;
    if !submitted {
        criteria.search = link.initial_query().unwrap_or_default().to_string();
    }
    let mut page = ListingPage::new(store, link, storage)
        .with_criteria(criteria)
        .with_sort(sort);
    if submitted {
        page.dispatch(crate::page::Event::SearchSubmit);
    }

    let view = page.view();
    let mut out = PageOutput::new(PageKind::PropertyListing, listing_state(view.result_count));
    out.records = page.visible().iter().map(OutputRecord::from).collect();
    out.result_count = view.result_count;
    out.count_label = view.count_label.clone();
    out.html = view.html.clone();
    out
}

fn agent_directory<S: KeyValueStorage>(
    store: &DataStore,
    link: &DeepLink,
    name: Option<String>,
    location: Option<String>,
    storage: S,
) -> PageOutput {
    let mut page = AgentDirectoryPage::new(store, link, storage);
    if let Some(name) = name {
        page.set_name(name);
        page.submit();
    }
    if let Some(location) = location {
        page.set_location(location);
    }

    let view = page.view();
    let mut out = PageOutput::new(PageKind::AgentDirectory, listing_state(view.result_count));
    out.records = page.visible().iter().map(OutputRecord::from).collect();
    out.result_count = view.result_count;
    out.count_label = view.count_label.clone();
    out.html = view.html.clone();
    out
}

fn not_found(kind: PageKind, record: RecordKind, requested: Option<String>) -> PageOutput {
    let mut out = PageOutput::new(kind, PageState::NotFound);
    out.html = render::render_not_found(record);
    out.message = Some(match requested {
        Some(id) => format!("{record} '{id}' not found"),
        None => format!("no {record} requested"),
    });
    out
}

fn property_detail(store: &DataStore, link: &DeepLink, policy: FallbackPolicy) -> PageOutput {
    let property = match deeplink::resolve_property(store, link, policy) {
        Resolution::Found { record, .. } => record,
        Resolution::NotFound { requested } => {
            return not_found(PageKind::PropertyDetail, RecordKind::Property, requested)
        }
    };
    let others = filter::other_listings(store.properties(), &property.slug);
    let page = render::render_property_detail(&property, &others);

    let mut out = PageOutput::new(PageKind::PropertyDetail, PageState::Ready);
    out.title = Some(page.title);
    out.meta_description = Some(page.meta_description);
    out.records = vec![OutputRecord::from(&property)];
    out.result_count = 1;
    out.html = page.body;
    out
}

fn agent_profile(store: &DataStore, link: &DeepLink, policy: FallbackPolicy) -> PageOutput {
    let agent = match deeplink::resolve_agent(store, link, policy) {
        Resolution::Found { record, .. } => record,
        Resolution::NotFound { requested } => {
            return not_found(PageKind::AgentProfile, RecordKind::Agent, requested)
        }
    };
    let listings = filter::listings_for_agent(store.properties(), &agent);
    let page = render::render_agent_profile(&agent, &listings);

    let mut out = PageOutput::new(PageKind::AgentProfile, PageState::Ready);
    out.title = Some(page.title);
    out.meta_description = Some(page.meta_description);
    out.records = std::iter::once(OutputRecord::from(&agent))
        .chain(listings.iter().map(OutputRecord::from))
        .collect();
    out.result_count = listings.len();
    out.count_label = format!("{} listings", listings.len());
    out.html = page.body;
    out
}

fn suggestions<S: KeyValueStorage>(
    store: &DataStore,
    query: &str,
    agents: bool,
    storage: S,
) -> PageOutput {
    let index = SuggestionIndex::build(store.properties(), store.agents());
    let recent = crate::recent::RecentSearches::new(storage, crate::recent::SEARCH_PAGE_CAP).list();
    let groups = if agents {
        index.agent_groups(query, &recent)
    } else {
        index.property_groups(query, &recent)
    };
    let mut out = PageOutput::new(PageKind::Suggestions, PageState::Ready);
    out.result_count = groups.iter().map(|g| g.items.len()).sum();
    out.html = render::render_suggestions(&groups);
    out.suggestions = groups;
    out
}

fn home_search<S: KeyValueStorage>(
    store: &DataStore,
    query: &str,
    tab: HomeTab,
    (ticks, hovered): (u32, bool),
    storage: S,
) -> PageOutput {
    let mut home = HomeSearch::new(store, storage);
    home.set_tab(tab);
    home.advance_strip(ticks, hovered);
    let groups = home.suggestions(query);
    let mut out = PageOutput::new(PageKind::Home, PageState::Ready);
    out.navigate_to = home.submit(query);
    out.records = home.featured().iter().map(OutputRecord::from).collect();
    out.result_count = groups.iter().map(|g| g.items.len()).sum();
    out.count_label = format!("Featured {}", home.strip().counter());
    out.html = render::render_featured_strip(home.featured(), home.strip());
    out.html.push_str(&render::render_suggestions(&groups));
    out.suggestions = groups;
    out
}

fn valuation(store: &DataStore, link: &DeepLink) -> PageOutput {
    let address = link.valuation_address();
    let agents: Vec<_> = store
        .agents()
        .iter()
        .take(render::valuation::VALUATION_AGENTS)
        .collect();
    let page = render::render_valuation(address.as_ref(), store.agents());

    let mut out = PageOutput::new(PageKind::Valuation, PageState::Ready);
    out.title = Some(page.title);
    out.meta_description = Some(page.meta_description);
    out.records = agents.into_iter().map(OutputRecord::from).collect();
    out.result_count = out.records.len();
    out.html = page.body;
    out
}
