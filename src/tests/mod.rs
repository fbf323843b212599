use crate::deeplink::{self, DeepLink, FallbackPolicy, Resolution, ResolvedVia};
use crate::filter::{self, FilterCriteria, SortOrder};
use crate::model::{Agent, Property};
use crate::output::PageState;
use crate::page::{Event, HomeSearch, ListingPage};
use crate::recent::{MemoryStorage, RecentSearches, SEARCH_PAGE_CAP};
use crate::render;
use crate::runner::{Options, PageRequest, Runner};
use crate::store::{DataSource, DataStore};

const PROPERTIES_JSON: &str = include_str!("../../fixtures/properties.json");
const AGENTS_JSON: &str = include_str!("../../fixtures/agents.json");

fn fixture_store() -> DataStore {
    let properties: Vec<Property> = serde_json::from_str(PROPERTIES_JSON).unwrap();
    let agents: Vec<Agent> = serde_json::from_str(AGENTS_JSON).unwrap();
    DataStore::new(properties, agents).unwrap()
}

fn with_beds(beds: &[u32]) -> Vec<Property> {
    let records: Vec<String> = beds
        .iter()
        .enumerate()
        .map(|(i, b)| {
            format!(
                r#"{{"id":"p{i}","slug":"home-{i}","price":{},"address":"{i} Main St, Austin, TX","beds":{b},"baths":{b},"type":"house","status":"for-sale"}}"#,
                100_000 + (i as u64) * 50_000
            )
        })
        .collect();
    let mut list: Vec<Property> =
        serde_json::from_str(&format!("[{}]", records.join(","))).unwrap();
    list.iter_mut().for_each(Property::normalize);
    list
}

fn beds_of(list: &[Property]) -> Vec<u32> {
    list.iter().map(|p| p.beds).collect()
}

fn set(values: &[&str]) -> std::collections::BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn bed_filter_uses_minimum_of_selected_values() {
    let homes = with_beds(&[2, 3, 4, 5, 6]);
    let three_or_five = FilterCriteria {
        beds: set(&["3", "5"]),
        ..FilterCriteria::default()
    };
    let three = FilterCriteria {
        beds: set(&["3"]),
        ..FilterCriteria::default()
    };
    let a = filter::apply(&homes, &three_or_five, SortOrder::PriceAsc);
    let b = filter::apply(&homes, &three, SortOrder::PriceAsc);
    assert_eq!(beds_of(&a), vec![3, 4, 5, 6]);
    assert_eq!(a, b);
}

#[test]
fn any_disables_bed_and_bath_constraints() {
    let homes = with_beds(&[2, 3, 4, 5, 6]);
    let criteria = FilterCriteria {
        beds: set(&["any", "5"]),
        baths: set(&["4", "any"]),
        ..FilterCriteria::default()
    };
    assert_eq!(filter::apply(&homes, &criteria, SortOrder::PriceAsc).len(), 5);
}

#[test]
fn price_sorts_are_mirror_images() {
    let store = fixture_store();
    let criteria = FilterCriteria::default();
    let asc = filter::apply(store.properties(), &criteria, SortOrder::PriceAsc);
    let mut desc = filter::apply(store.properties(), &criteria, SortOrder::PriceDesc);
    desc.reverse();
    assert_eq!(asc, desc);
    assert_eq!(asc.first().map(|p| p.id.as_str()), Some("prop-3"));
}

#[test]
fn empty_search_equals_no_search() {
    let store = fixture_store();
    let blank = FilterCriteria::with_search("");
    let spaces = FilterCriteria::with_search("   ");
    let none = FilterCriteria::default();
    let expected = filter::apply(store.properties(), &none, SortOrder::Newest);
    assert_eq!(filter::apply(store.properties(), &blank, SortOrder::Newest), expected);
    assert_eq!(filter::apply(store.properties(), &spaces, SortOrder::Newest), expected);
    assert_eq!(expected.len(), store.properties().len());
}

#[test]
fn recent_searches_dedupe_case_insensitively() {
    let mut recent = RecentSearches::new(MemoryStorage::new(), SEARCH_PAGE_CAP);
    for term in ["Miami", "miami", "Austin"] {
        recent.record(term);
    }
    assert_eq!(recent.list(), vec!["Austin".to_string(), "miami".to_string()]);
}

#[test]
fn recent_searches_keep_the_newest_up_to_cap() {
    let mut recent = RecentSearches::new(MemoryStorage::new(), 5);
    for term in ["a", "b", "c", "d", "e", "f"] {
        recent.record(term);
    }
    assert_eq!(recent.list(), vec!["f", "e", "d", "c", "b"]);
}

#[test]
fn no_matches_renders_empty_state_with_zero_count() {
    let store = fixture_store();
    let criteria = FilterCriteria {
        min_price: Some(50_000_000),
        ..FilterCriteria::default()
    };
    let matched = filter::apply(store.properties(), &criteria, SortOrder::Newest);
    let view = render::render_property_grid(&matched);
    assert_eq!(view.result_count, 0);
    assert!(view.is_empty());
    assert!(view.html.contains("data-state=\"empty\""));
}

#[test]
fn agent_id_param_resolves_exact_record() {
    let store = fixture_store();
    let link = DeepLink::parse("agent/index.html?id=agent-2").unwrap();
    match deeplink::resolve_agent(&store, &link, FallbackPolicy::FirstRecord) {
        Resolution::Found { record, via } => {
            assert_eq!(record.id, "agent-2");
            assert_eq!(via, ResolvedVia::IdParam);
        }
        Resolution::NotFound { .. } => panic!("agent-2 should resolve"),
    }
}

#[test]
fn unknown_ids_are_not_found_on_both_detail_pages() {
    let store = fixture_store();
    let link = DeepLink::parse("?id=does-not-exist").unwrap();
    let agent = deeplink::resolve_agent(&store, &link, FallbackPolicy::FirstRecord);
    let property = deeplink::resolve_property(&store, &link, FallbackPolicy::FirstRecord);
    assert!(agent.record().is_none());
    assert!(property.record().is_none());
}

#[test]
fn missing_id_follows_fallback_policy() {
    let store = fixture_store();
    let link = DeepLink::parse("property-detail.html").unwrap();
    let first = deeplink::resolve_property(&store, &link, FallbackPolicy::FirstRecord);
    assert_eq!(first.record().map(|p| p.id.as_str()), Some("prop-1"));
    let strict = deeplink::resolve_property(&store, &link, FallbackPolicy::NotFound);
    assert!(matches!(strict, Resolution::NotFound { requested: None }));
}

#[test]
fn listing_page_search_from_url_then_submit_records_history() {
    let store = fixture_store();
    let link = DeepLink::parse("property.html?search=Miami").unwrap();
    let mut page = ListingPage::new(&store, &link, MemoryStorage::new());
    assert_eq!(page.criteria().search, "Miami");
    assert_eq!(page.view().result_count, 1);

    page.dispatch(Event::SearchInput("manhattan".to_string()));
    let view = page.dispatch(Event::SearchSubmit);
    assert_eq!(view.result_count, 2);
    assert_eq!(page.recent().list(), vec!["manhattan".to_string()]);
}

#[test]
fn agent_with_only_dangling_listings_has_empty_portfolio() {
    let store = fixture_store();
    let agent = store.agent_by_slug("dana-whitfield").unwrap();
    let listings = filter::listings_for_agent(store.properties(), agent);
    assert!(listings.is_empty());
    let page = render::render_agent_profile(agent, &listings);
    assert!(page
        .body
        .contains("Dana Whitfield currently has no active exclusive listings."));
}

#[test]
fn home_featured_strip_pauses_while_hovered() {
    let store = fixture_store();
    let mut home = HomeSearch::new(&store, MemoryStorage::new());
    let ids: Vec<&str> = home.featured().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["prop-1", "prop-4"]);
    assert_eq!(home.advance_strip(3, false), 1);
    assert_eq!(home.advance_strip(5, true), 1);
    assert!(home.strip().is_paused());
    assert_eq!(home.advance_strip(1, false), 0);
    let html = render::render_featured_strip(home.featured(), home.strip());
    assert!(html.contains("translateX(0%)"));
    assert!(html.contains("<div class=\"carousel-counter\">1/2</div>"));
}

#[tokio::test]
async fn runner_home_reports_strip_position() {
    let result = fixture_runner(None, FallbackPolicy::FirstRecord)
        .run(
            PageRequest::HomeSearch {
                query: String::new(),
                tab: Default::default(),
                strip_ticks: 1,
                strip_hovered: false,
            },
            MemoryStorage::new(),
        )
        .await;
    assert_eq!(result.output.count_label, "Featured 2/2");
    assert_eq!(result.output.records.len(), 2);
    assert!(result.output.html.contains("translateX(-100%)"));
    assert!(result.output.navigate_to.is_none());
}

fn fixture_runner(url: Option<&str>, fallback: FallbackPolicy) -> Runner {
    Runner::new(Options {
        properties: DataSource::FilePath(
            concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/properties.json").to_string(),
        ),
        agents: DataSource::FilePath(
            concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/agents.json").to_string(),
        ),
        page_url: url.map(str::to_string),
        fallback,
        timeout_seconds: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn runner_renders_property_detail_from_fixture_files() {
    let result = fixture_runner(
        Some("property-detail.html?id=schnoor-road-ct"),
        FallbackPolicy::FirstRecord,
    )
    .run(PageRequest::PropertyDetail, MemoryStorage::new())
    .await;
    assert_eq!(result.output.state, PageState::Ready);
    assert!(result
        .output
        .title
        .as_deref()
        .unwrap_or_default()
        .contains("Schnoor Road"));
}

#[tokio::test]
async fn runner_reports_unknown_agent_as_not_found() {
    let result = fixture_runner(Some("agent/index.html?id=does-not-exist"), FallbackPolicy::FirstRecord)
        .run(PageRequest::AgentProfile, MemoryStorage::new())
        .await;
    assert_eq!(result.output.state, PageState::NotFound);
    assert!(result.output.is_failure());
    assert!(result.output.html.contains("Agent Not Found"));
}

#[tokio::test]
async fn runner_filters_listing_with_submitted_search() {
    let result = fixture_runner(None, FallbackPolicy::FirstRecord)
        .run(
            PageRequest::PropertyListing {
                criteria: FilterCriteria {
                    statuses: set(&["for-sale"]),
                    ..FilterCriteria::with_search("manhattan")
                },
                sort: SortOrder::PriceDesc,
            },
            MemoryStorage::new(),
        )
        .await;
    assert_eq!(result.output.state, PageState::Ready);
    assert_eq!(result.output.result_count, 2);
}

#[tokio::test]
async fn runner_directory_filters_by_location() {
    let result = fixture_runner(None, FallbackPolicy::FirstRecord)
        .run(
            PageRequest::AgentDirectory {
                name: None,
                location: Some("miami".to_string()),
            },
            MemoryStorage::new(),
        )
        .await;
    assert_eq!(result.output.result_count, 1);
    assert_eq!(result.output.count_label, "1 Agents found");
}
