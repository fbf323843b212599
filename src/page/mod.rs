use tracing::debug;

use crate::carousel::Carousel;
use crate::deeplink::{self, DeepLink};
use crate::filter::{self, FilterCriteria, SortOrder};
use crate::model::{Agent, Property};
use crate::recent::{KeyValueStorage, RecentSearches, HOME_CAP, SEARCH_PAGE_CAP};
use crate::render::{self, GridView};
use crate::store::DataStore;
use crate::suggest::{self, Suggestion, SuggestionGroup, SuggestionIndex};

/// One user interaction on a listing page.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    SearchInput(String),
    SearchSubmit,
    ToggleType(String),
    ToggleBeds(String),
    ToggleBaths(String),
    ToggleStatus(String),
    SetMinPrice(Option<u64>),
    SetMaxPrice(Option<u64>),
    SetSort(SortOrder),
    ResetFilters,
    SelectSuggestion(Suggestion),
}

/// Strips the currency sign, thousands separators and the open-ended `+`
/// from a price entry ("$500,000+" -> "500000").
pub fn clean_price(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '+'))
        .collect()
}

/// Value of a price dropdown entry. "0" on the min side and "any" on the max
/// side mean unbounded, as do blanks and anything unparsable.
pub fn price_bound(value: &str) -> Option<u64> {
    let cleaned = clean_price(value);
    if cleaned.eq_ignore_ascii_case("any") {
        return None;
    }
    cleaned.parse::<u64>().ok().filter(|v| *v > 0)
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: String) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Property listing page state. Every event re-filters and re-renders.
pub struct ListingPage<S: KeyValueStorage> {
    properties: Vec<Property>,
    index: SuggestionIndex,
    criteria: FilterCriteria,
    sort: SortOrder,
    recent: RecentSearches<S>,
    visible: Vec<Property>,
    view: GridView,
    navigate_to: Option<String>,
}

impl<S: KeyValueStorage> ListingPage<S> {
    /// Builds the page after load; the deep link seeds the search box.
    pub fn new(store: &DataStore, link: &DeepLink, storage: S) -> Self {
        let search = link.initial_query().unwrap_or_default().to_string();
        let mut page = Self {
            properties: store.properties().to_vec(),
            index: SuggestionIndex::build(store.properties(), store.agents()),
            criteria: FilterCriteria::with_search(search),
            sort: SortOrder::default(),
            recent: RecentSearches::new(storage, SEARCH_PAGE_CAP),
            visible: Vec::new(),
            view: render::render_property_grid(&[]),
            navigate_to: None,
        };
        page.refresh();
        page
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self.refresh();
        self
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self.refresh();
        self
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn visible(&self) -> &[Property] {
        &self.visible
    }

    pub fn view(&self) -> &GridView {
        &self.view
    }

    pub fn recent(&self) -> &RecentSearches<S> {
        &self.recent
    }

    /// Set when the last event was a record suggestion click.
    pub fn navigate_to(&self) -> Option<&str> {
        self.navigate_to.as_deref()
    }

    pub fn suggestions(&self) -> Vec<SuggestionGroup> {
        self.index
            .property_groups(&self.criteria.search, &self.recent.list())
    }

    pub fn dispatch(&mut self, event: Event) -> &GridView {
        self.navigate_to = None;
        match event {
            Event::SearchInput(text) => self.criteria.search = text,
            Event::SearchSubmit => {
                let term = self.criteria.search.clone();
                self.recent.record(&term);
            }
            Event::ToggleType(v) => toggle(&mut self.criteria.types, v),
            Event::ToggleBeds(v) => toggle(&mut self.criteria.beds, v),
            Event::ToggleBaths(v) => toggle(&mut self.criteria.baths, v),
            Event::ToggleStatus(v) => toggle(&mut self.criteria.statuses, v),
            Event::SetMinPrice(v) => self.criteria.min_price = v,
            Event::SetMaxPrice(v) => self.criteria.max_price = v,
            Event::SetSort(order) => self.sort = order,
            Event::ResetFilters => self.criteria.reset_filters(),
            Event::SelectSuggestion(s) => {
                let selection = suggest::select(&s);
                self.recent.record(&selection.input_text);
                self.criteria.search = selection.input_text;
                self.navigate_to = selection.navigate_to;
            }
        }
        self.refresh();
        &self.view
    }

    fn refresh(&mut self) {
        self.visible = filter::apply(&self.properties, &self.criteria, self.sort);
        self.view = render::render_property_grid(&self.visible);
    }
}

/// Agent directory: name and location inputs over the agent list.
pub struct AgentDirectoryPage<S: KeyValueStorage> {
    agents: Vec<Agent>,
    index: SuggestionIndex,
    name_query: String,
    location_query: String,
    recent: RecentSearches<S>,
    visible: Vec<Agent>,
    view: GridView,
}

impl<S: KeyValueStorage> AgentDirectoryPage<S> {
    pub fn new(store: &DataStore, link: &DeepLink, storage: S) -> Self {
        let mut page = Self {
            agents: store.agents().to_vec(),
            index: SuggestionIndex::build(store.properties(), store.agents()),
            name_query: link.agent_query().unwrap_or_default().to_string(),
            location_query: String::new(),
            recent: RecentSearches::new(storage, SEARCH_PAGE_CAP),
            visible: Vec::new(),
            view: render::render_agent_grid(&[]),
        };
        page.refresh();
        page
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn visible(&self) -> &[Agent] {
        &self.visible
    }

    pub fn view(&self) -> &GridView {
        &self.view
    }

    pub fn set_name(&mut self, text: impl Into<String>) -> &GridView {
        self.name_query = text.into();
        self.refresh();
        &self.view
    }

    pub fn set_location(&mut self, text: impl Into<String>) -> &GridView {
        self.location_query = text.into();
        self.refresh();
        &self.view
    }

    pub fn submit(&mut self) -> &GridView {
        let term = self.name_query.clone();
        self.recent.record(&term);
        self.refresh();
        &self.view
    }

    pub fn name_suggestions(&self) -> Vec<SuggestionGroup> {
        self.index.agent_groups(&self.name_query, &self.recent.list())
    }

    pub fn location_suggestions(&self) -> Vec<Suggestion> {
        self.index.locations(&self.location_query)
    }

    fn refresh(&mut self) {
        self.visible = filter::filter_agents(&self.agents, &self.name_query, &self.location_query);
        self.view = render::render_agent_grid(&self.visible);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HomeTab {
    #[default]
    Buy,
    Sell,
}

impl HomeTab {
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Buy => "City, Zip, Address, Property Name",
            Self::Sell => "Enter your home address",
        }
    }
}

/// Home page hero search: the active tab decides where a submit navigates.
/// Also owns the featured-listings strip, which loops on its own.
pub struct HomeSearch<S: KeyValueStorage> {
    tab: HomeTab,
    index: SuggestionIndex,
    recent: RecentSearches<S>,
    featured: Vec<Property>,
    strip: Carousel,
}

impl<S: KeyValueStorage> HomeSearch<S> {
    pub fn new(store: &DataStore, storage: S) -> Self {
        let featured: Vec<Property> = store
            .properties()
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect();
        let strip = Carousel::looping(featured.len());
        Self {
            tab: HomeTab::default(),
            index: SuggestionIndex::build(store.properties(), store.agents()),
            recent: RecentSearches::new(storage, HOME_CAP),
            featured,
            strip,
        }
    }

    pub fn featured(&self) -> &[Property] {
        &self.featured
    }

    pub fn strip(&self) -> &Carousel {
        &self.strip
    }

    /// Replays `ticks` autoplay intervals. A hovered strip holds still until
    /// the pointer leaves.
    pub fn advance_strip(&mut self, ticks: u32, hovered: bool) -> usize {
        if hovered {
            self.strip.pause();
        } else {
            self.strip.resume();
        }
        for _ in 0..ticks {
            self.strip.tick();
        }
        self.strip.index()
    }

    pub fn tab(&self) -> HomeTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: HomeTab) {
        self.tab = tab;
    }

    pub fn recent(&self) -> Vec<String> {
        self.recent.list()
    }

    pub fn suggestions(&self, query: &str) -> Vec<SuggestionGroup> {
        self.index.property_groups(query, &self.recent.list())
    }

    /// Records the term and returns the navigation target; blank input stays put.
    pub fn submit(&mut self, text: &str) -> Option<String> {
        let term = text.trim();
        if term.is_empty() {
            return None;
        }
        self.recent.record(term);
        let target = match self.tab {
            HomeTab::Buy => deeplink::property_search_href(term),
            HomeTab::Sell => deeplink::valuation_href(term),
        };
        debug!(tab = ?self.tab, %target, "home search submitted");
        Some(target)
    }

    /// Fills the input from a suggestion and records it as a recent search.
    pub fn select(&mut self, suggestion: &Suggestion) -> suggest::Selection {
        let selection = suggest::select(suggestion);
        self.recent.record(&selection.input_text);
        selection
    }
}
