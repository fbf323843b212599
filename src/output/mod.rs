pub mod report;

use serde::Serialize;

use crate::deeplink;
use crate::model::{Agent, Property};
use crate::render::format_price;
use crate::suggest::SuggestionGroup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    PropertyListing,
    AgentDirectory,
    PropertyDetail,
    AgentProfile,
    Suggestions,
    Home,
    Valuation,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PropertyListing => "property_listing",
            Self::AgentDirectory => "agent_directory",
            Self::PropertyDetail => "property_detail",
            Self::AgentProfile => "agent_profile",
            Self::Suggestions => "suggestions",
            Self::Home => "home",
            Self::Valuation => "valuation",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    Ready,
    Empty,
    NotFound,
    LoadError,
}

impl PageState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Empty => "empty",
            Self::NotFound => "not_found",
            Self::LoadError => "load_error",
        }
    }
}

/// Flattened listing row for text and JSON output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputRecord {
    Property {
        slug: String,
        title: String,
        address: String,
        price: u64,
        status: String,
        beds: u32,
        baths: f64,
        sqft: u64,
        property_type: String,
        featured: bool,
        href: String,
    },
    Agent {
        slug: String,
        name: String,
        title: String,
        location: Option<String>,
        phone: String,
        email: String,
        href: String,
    },
}

impl From<&Property> for OutputRecord {
    fn from(p: &Property) -> Self {
        Self::Property {
            slug: p.slug.clone(),
            title: p.title.clone(),
            address: p.address.clone(),
            price: p.price,
            status: p.status.slug().to_string(),
            beds: p.beds,
            baths: p.baths,
            sqft: p.sqft,
            property_type: p.property_type_label(),
            featured: p.featured,
            href: deeplink::property_detail_href(&p.slug),
        }
    }
}

impl From<&Agent> for OutputRecord {
    fn from(a: &Agent) -> Self {
        Self::Agent {
            slug: a.slug.clone(),
            name: a.name.clone(),
            title: a.title.clone(),
            location: a.location.clone(),
            phone: a.phone.clone(),
            email: a.email.clone(),
            href: deeplink::agent_profile_href(&a.slug),
        }
    }
}

/// Everything one page request produced.
#[derive(Clone, Debug, Serialize)]
pub struct PageOutput {
    pub page: PageKind,
    pub state: PageState,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub result_count: usize,
    pub count_label: String,
    pub records: Vec<OutputRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<SuggestionGroup>,
    pub navigate_to: Option<String>,
    pub message: Option<String>,
    #[serde(skip)]
    pub html: String,
}

impl PageOutput {
    pub fn new(page: PageKind, state: PageState) -> Self {
        Self {
            page,
            state,
            title: None,
            meta_description: None,
            result_count: 0,
            count_label: String::new(),
            records: Vec::new(),
            suggestions: Vec::new(),
            navigate_to: None,
            message: None,
            html: String::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.state, PageState::NotFound | PageState::LoadError)
    }
}

fn record_line(record: &OutputRecord) -> String {
    match record {
        OutputRecord::Property {
            price,
            status,
            beds,
            baths,
            address,
            href,
            ..
        } => format!(
            "{:<12} {:<12} {}bd/{}ba  {}  {}",
            format_price(*price),
            status,
            beds,
            baths,
            address,
            href
        ),
        OutputRecord::Agent {
            name,
            title,
            location,
            href,
            ..
        } => format!(
            "{:<24} {:<28} {:<16} {}",
            name,
            title,
            location.as_deref().unwrap_or("-"),
            href
        ),
    }
}

pub fn render_text(output: &PageOutput) -> Vec<u8> {
    let mut out = String::new();
    if let Some(title) = output.title.as_deref() {
        out.push_str(title);
        out.push('\n');
    }
    if let Some(message) = output.message.as_deref() {
        out.push_str(message);
        out.push('\n');
    }
    for r in &output.records {
        out.push_str(&record_line(r));
        out.push('\n');
    }
    for group in &output.suggestions {
        out.push_str(&format!("[{}]\n", group.heading));
        for item in &group.items {
            match item.target() {
                Some(target) => out.push_str(&format!("  {}  -> {}\n", item.display_text(), target)),
                None => out.push_str(&format!("  {}\n", item.display_text())),
            }
        }
    }
    if !output.count_label.is_empty() {
        out.push_str(&output.count_label);
        out.push('\n');
    }
    if let Some(target) = output.navigate_to.as_deref() {
        out.push_str(&format!("navigate: {target}\n"));
    }
    out.into_bytes()
}

pub fn render_json(output: &PageOutput) -> Vec<u8> {
    serde_json::to_vec_pretty(output).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(output: &PageOutput) -> Vec<u8> {
    report::render_html(output)
}

pub fn render(output: &PageOutput, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(output),
        OutputFormat::Json => render_json(output),
        OutputFormat::Html => render_html(output),
    }
}
