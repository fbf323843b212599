pub mod detail;
pub mod profile;
pub mod valuation;

use serde::Serialize;

use crate::carousel::Carousel;
use crate::deeplink;
use crate::model::{Agent, ListingStatus, Property, RecordKind};
use crate::suggest::SuggestionGroup;

pub use detail::render_property_detail;
pub use profile::render_agent_profile;
pub use valuation::render_valuation;

pub const NO_PROPERTIES: &str = "No properties found matching your search. Try adjusting the filters.";
pub const NO_AGENTS: &str = "No agents found matching your search.";

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Thousands-separated integer ("1234567" -> "1,234,567").
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_price(value: u64) -> String {
    format!("${}", format_number(value))
}

/// Badge text, icon and class for a listing status. Pending shares the
/// coming-soon styling; unknown statuses keep their raw text and get no class.
pub fn status_badge(status: &ListingStatus) -> (String, &'static str, &'static str) {
    let (icon, class) = match status {
        ListingStatus::ForSale => ("fa-circle-check", "for-sale"),
        ListingStatus::ComingSoon => ("fa-clock", "coming-soon"),
        ListingStatus::Sold => ("fa-lock", "sold"),
        ListingStatus::Pending => ("fa-hourglass-half", "coming-soon"),
        ListingStatus::Other(_) => ("", ""),
    };
    (status.label().to_string(), icon, class)
}

pub fn status_tag(status: &ListingStatus) -> String {
    let (text, icon, class) = status_badge(status);
    let class = if class.is_empty() {
        "status-tag".to_string()
    } else {
        format!("status-tag {class}")
    };
    format!(
        r#"<span class="{class}">{} <i class="fa-solid {icon}"></i></span>"#,
        escape_html(&text)
    )
}

/// Result of one full grid rebuild.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub html: String,
    pub result_count: usize,
    pub count_label: String,
}

impl GridView {
    pub fn is_empty(&self) -> bool {
        self.result_count == 0
    }
}

fn empty_state(icon: &str, message: &str) -> String {
    format!(
        "<div class=\"empty-state\" data-state=\"empty\">\n  <i class=\"fa-solid {icon}\"></i>\n  <p>{}</p>\n</div>\n",
        escape_html(message)
    )
}

fn photo_slider(property: &Property) -> String {
    let slider = Carousel::card(property.photos.len());
    let alt = escape_html(&property.title);
    let mut out = String::new();
    out.push_str("    <div class=\"image-slider\">\n");
    for (i, src) in property.photos.iter().enumerate() {
        let class = if i == slider.index() { "active" } else { "" };
        out.push_str(&format!(
            "      <img src=\"{}\" alt=\"{alt}\" class=\"{class}\" />\n",
            escape_html(src)
        ));
    }
    out.push_str("    </div>\n");
    out.push_str("    <button class=\"slider-btn prev\"><i class=\"fa-solid fa-chevron-left\"></i></button>\n");
    out.push_str("    <button class=\"slider-btn next\"><i class=\"fa-solid fa-chevron-right\"></i></button>\n");
    out.push_str(&format!(
        "    <div class=\"slider-counter\">{}</div>\n",
        slider.counter()
    ));
    out
}

pub fn specs_line(property: &Property) -> String {
    format!(
        "{} Beds &nbsp; {} Baths &nbsp; {} Sq. Ft.",
        property.beds,
        property.baths,
        format_number(property.sqft)
    )
}

/// One `listing-card`. `extra_class` is appended for carousel strips.
pub fn render_property_card(property: &Property, extra_class: Option<&str>) -> String {
    let class = match extra_class {
        Some(extra) => format!("listing-card {extra}"),
        None => "listing-card".to_string(),
    };
    let mut out = String::new();
    out.push_str(&format!(
        "<div class=\"{class}\" data-slug=\"{}\">\n",
        escape_html(&property.slug)
    ));
    out.push_str("  <div class=\"card-image-wrapper\">\n");
    out.push_str(&photo_slider(property));
    out.push_str(&format!("    {}\n", status_tag(&property.status)));
    out.push_str("  </div>\n");
    out.push_str("  <div class=\"card-content\">\n");
    out.push_str(&format!(
        "    <h3 class=\"card-price\">{}</h3>\n",
        format_price(property.price)
    ));
    out.push_str(&format!(
        "    <div class=\"card-specs\">{} | <strong>{}</strong></div>\n",
        specs_line(property),
        escape_html(&property.property_type_label())
    ));
    out.push_str(&format!(
        "    <div class=\"card-address\">{}</div>\n",
        escape_html(&property.address)
    ));
    out.push_str(&format!(
        "    <a href=\"#\" class=\"email-agent-btn\" data-agent=\"{}\" data-address=\"{}\">Contact Agent</a>\n",
        escape_html(&property.agent.name),
        escape_html(&property.address)
    ));
    out.push_str(&format!(
        "    <a href=\"{}\" class=\"view-detail-link\">View Details</a>\n",
        escape_html(&deeplink::property_detail_href(&property.slug))
    ));
    out.push_str("  </div>\n");
    out.push_str("</div>\n");
    out
}

/// Clears and rebuilds the property grid; the count is the bare number.
pub fn render_property_grid(properties: &[Property]) -> GridView {
    let html = if properties.is_empty() {
        empty_state("fa-house-circle-xmark", NO_PROPERTIES)
    } else {
        properties
            .iter()
            .map(|p| render_property_card(p, None))
            .collect()
    };
    GridView {
        html,
        result_count: properties.len(),
        count_label: properties.len().to_string(),
    }
}

pub fn render_agent_card(agent: &Agent) -> String {
    agent_card(agent, &deeplink::agent_profile_href(&agent.slug))
}

/// Agent card whose "View Profile" button points at `profile_href`.
fn agent_card(agent: &Agent, profile_href: &str) -> String {
    let (sold, active, experience) = agent.stat_labels();
    let mut out = String::new();
    out.push_str(&format!(
        "<div class=\"agent-card-static\" data-slug=\"{}\">\n",
        escape_html(&agent.slug)
    ));
    out.push_str("  <div class=\"agent-card-header\">\n");
    out.push_str(&format!(
        "    <div class=\"agent-image-wrapper\"><img src=\"{}\" alt=\"{}\" /></div>\n",
        escape_html(&agent.photo),
        escape_html(&agent.name)
    ));
    out.push_str("    <div class=\"agent-info\">\n");
    out.push_str(&format!("      <h3>{}</h3>\n", escape_html(&agent.name)));
    out.push_str(&format!(
        "      <p class=\"agent-title\">{}</p>\n",
        escape_html(&agent.title)
    ));
    out.push_str(&format!(
        "      <div class=\"contact-row\"><i class=\"fa-solid fa-phone\"></i> {}</div>\n",
        escape_html(&agent.phone)
    ));
    out.push_str(&format!(
        "      <div class=\"contact-row\"><i class=\"fa-solid fa-envelope\"></i> {}</div>\n",
        escape_html(&agent.email)
    ));
    out.push_str("    </div>\n");
    out.push_str("  </div>\n");
    out.push_str("  <div class=\"agent-stats-row\">\n");
    for (value, label) in [(sold, "Sold"), (active, "Active"), (experience, "Experience")] {
        out.push_str(&format!(
            "    <div class=\"stat-item\"><span class=\"stat-value\">{}</span><span class=\"stat-label\">{label}</span></div>\n",
            escape_html(&value)
        ));
    }
    out.push_str("  </div>\n");
    out.push_str("  <div class=\"agent-actions\">\n");
    out.push_str(&format!(
        "    <button class=\"btn-contact-agent\" data-agent=\"{}\">Contact</button>\n",
        escape_html(&agent.name)
    ));
    out.push_str(&format!(
        "    <a href=\"{}\" class=\"btn-view-profile\">View Profile</a>\n",
        escape_html(profile_href)
    ));
    out.push_str("  </div>\n");
    out.push_str("</div>\n");
    out
}

pub fn render_agent_grid(agents: &[Agent]) -> GridView {
    let html = if agents.is_empty() {
        empty_state("fa-user-slash", NO_AGENTS)
    } else {
        agents.iter().map(render_agent_card).collect()
    };
    GridView {
        html,
        result_count: agents.len(),
        count_label: format!("{} Agents found", agents.len()),
    }
}

/// Shown instead of any content when a fixture failed to load.
pub fn render_load_error(kind: RecordKind) -> String {
    format!(
        "<div class=\"load-error\" data-state=\"error\">\n  <i class=\"fa-solid fa-triangle-exclamation\"></i>\n  <p>Unable to load {kind} data. Please try again later.</p>\n</div>\n"
    )
}

/// Detail page body for an identifier that resolved to nothing.
pub fn render_not_found(kind: RecordKind) -> String {
    let (heading, what, href, back) = match kind {
        RecordKind::Property => ("Property Not Found", "property", "property.html", "Back To Listings"),
        RecordKind::Agent => ("Agent Not Found", "agent", "index.html", "Return to Home"),
    };
    format!(
        "<div class=\"not-found\" data-state=\"not-found\">\n  <h1>{heading}</h1>\n  <p>We couldn't find the {what} you're looking for.</p>\n  <a href=\"{href}\">{back}</a>\n</div>\n"
    )
}

/// Home page featured-listings strip. The track is offset to the active
/// slide; the counter sits under it.
pub fn render_featured_strip(featured: &[Property], strip: &Carousel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<section class=\"featured-strip\" data-autoplay=\"{}\" data-paused=\"{}\">\n",
        strip.autoplay().map(|d| d.as_millis()).unwrap_or(0),
        strip.is_paused()
    ));
    out.push_str(&format!(
        "  <div class=\"carousel-track\" style=\"transform: translateX({}%)\">\n",
        strip.translate_percent()
    ));
    for (i, property) in featured.iter().enumerate() {
        let class = if i == strip.index() {
            "carousel-card active"
        } else {
            "carousel-card"
        };
        out.push_str(&render_property_card(property, Some(class)));
    }
    out.push_str("  </div>\n");
    out.push_str(&format!(
        "  <div class=\"carousel-counter\">{}</div>\n</section>\n",
        strip.counter()
    ));
    out
}

/// Suggestion dropdown markup. Record suggestions carry their navigation
/// target; plain strings carry only the fill-in text.
pub fn render_suggestions(groups: &[SuggestionGroup]) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"search-suggestions\">\n");
    for group in groups {
        out.push_str(&format!(
            "  <div class=\"suggestion-group\">\n    <div class=\"suggestion-heading\">{}</div>\n",
            escape_html(group.heading)
        ));
        for item in &group.items {
            let text = escape_html(&item.display_text());
            match item.target() {
                Some(href) => out.push_str(&format!(
                    "    <a class=\"suggestion-item\" href=\"{}\">{text}</a>\n",
                    escape_html(&href)
                )),
                None => out.push_str(&format!(
                    "    <div class=\"suggestion-item\" data-fill=\"{text}\">{text}</div>\n"
                )),
            }
        }
        out.push_str("  </div>\n");
    }
    out.push_str("</div>\n");
    out
}
