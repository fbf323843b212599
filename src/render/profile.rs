use super::detail::DetailPage;
use super::{escape_html, format_price, status_tag};
use crate::contact;
use crate::deeplink;
use crate::model::{Agent, Property};

const BIO_EXCERPT_CHARS: usize = 150;

/// Social rows shown on the profile, in display order.
const SOCIAL_PLATFORMS: [(&str, &str, &str); 2] = [
    ("linkedin", "fa-brands fa-linkedin-in", "Linkedin"),
    ("instagram", "fa-brands fa-instagram", "Instagram"),
];

fn social_links(agent: &Agent) -> String {
    let mut out = String::from("  <div class=\"agent-socials\">\n");
    for (platform, icon, label) in SOCIAL_PLATFORMS {
        if let Some(href) = agent.social_link(platform) {
            out.push_str(&format!(
                "    <div class=\"social-link-row\"><a href=\"{}\" target=\"_blank\"><i class=\"{icon}\"></i> <span>{label}</span></a></div>\n",
                escape_html(href)
            ));
        }
    }
    out.push_str("    <div class=\"social-link-row\"><a href=\"#\" target=\"_blank\"><i class=\"fa-solid fa-link\"></i> <span>View Agent Website</span></a></div>\n");
    out.push_str("  </div>\n");
    out
}

/// Portfolio badge class keyed off the status text.
fn portfolio_class(listing: &Property) -> &'static str {
    let slug = listing.status.slug().to_lowercase();
    if slug.contains("sold") {
        "sold"
    } else if slug.contains("soon") {
        "coming-soon"
    } else {
        "for-sale"
    }
}

fn portfolio_card(listing: &Property) -> String {
    let photo = listing.photos.first().map(String::as_str).unwrap_or_default();
    format!(
        "    <a class=\"portfolio-card {}\" href=\"../{}\">\n      <img src=\"{}\" alt=\"{}\" />\n      {}\n      <span class=\"portfolio-price\">{}</span>\n      <span class=\"portfolio-address\">{}</span>\n    </a>\n",
        portfolio_class(listing),
        escape_html(&deeplink::property_detail_href(&listing.slug)),
        escape_html(photo),
        escape_html(&listing.title),
        status_tag(&listing.status),
        format_price(listing.price),
        escape_html(&listing.address)
    )
}

fn portfolio(agent: &Agent, listings: &[Property]) -> String {
    let mut out = format!(
        "  <section class=\"agent-listings\">\n    <h2>Listings by {} (<span class=\"listing-count\">{}</span>)</h2>\n",
        escape_html(&agent.name),
        listings.len()
    );
    if listings.is_empty() {
        out.push_str(&format!(
            "    <div class=\"empty-state\" data-state=\"empty\"><i class=\"fa-solid fa-house-chimney\"></i><p>{} currently has no active exclusive listings.</p></div>\n",
            escape_html(&agent.name)
        ));
    } else {
        for listing in listings {
            out.push_str(&portfolio_card(listing));
        }
    }
    out.push_str("  </section>\n");
    out
}

/// Agent profile page with the agent's portfolio.
pub fn render_agent_profile(agent: &Agent, listings: &[Property]) -> DetailPage {
    let title = if agent.title.trim().is_empty() {
        format!("{} | Raya Homes", agent.name)
    } else {
        format!("{} | {} | Raya Homes", agent.name, agent.title)
    };
    let meta_description = format!(
        "Meet {}, {} at Raya Homes. {}",
        agent.name,
        agent.title,
        agent.bio_excerpt(BIO_EXCERPT_CHARS)
    );
    let (sold, active, experience) = agent.stat_labels();

    let mut body = format!(
        "<article class=\"agent-profile\" data-slug=\"{}\">\n",
        escape_html(&agent.slug)
    );
    body.push_str(&format!(
        "  <img class=\"agent-image\" src=\"{}\" alt=\"{}\" />\n  <h1>{}</h1>\n  <p class=\"agent-title\">{}</p>\n",
        escape_html(&agent.photo),
        escape_html(&agent.name),
        escape_html(&agent.name),
        escape_html(&agent.title)
    ));
    body.push_str(&format!(
        "  <p class=\"agent-office\">{}</p>\n  <p class=\"agent-license\">{}</p>\n  <p class=\"agent-bio\">{}</p>\n",
        escape_html(&agent.office),
        escape_html(&agent.license),
        escape_html(&agent.bio)
    ));
    body.push_str(&format!(
        "  <div class=\"agent-contact\"><span class=\"agent-phone\">{}</span> <a href=\"mailto:{}\">{}</a></div>\n",
        escape_html(&agent.phone),
        escape_html(&agent.email),
        escape_html(&agent.email)
    ));
    body.push_str("  <div class=\"agent-stats-row\">\n");
    for (value, label) in [(sold, "Sold"), (active, "Active"), (experience, "Experience")] {
        body.push_str(&format!(
            "    <div class=\"stat-item\"><span class=\"stat-value\">{}</span><span class=\"stat-label\">{label}</span></div>\n",
            escape_html(&value)
        ));
    }
    body.push_str("  </div>\n");
    body.push_str(&social_links(agent));
    body.push_str(&format!(
        "  <div class=\"contact-modal-heading\">{}</div>\n",
        escape_html(&contact::modal_heading(&agent.name))
    ));
    body.push_str(&portfolio(agent, listings));
    body.push_str("</article>\n");

    DetailPage {
        title,
        meta_description,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(json: &str) -> Agent {
        let mut a: Agent = serde_json::from_str(json).unwrap();
        a.normalize();
        a
    }

    #[test]
    fn empty_portfolio_shows_placeholder() {
        let a = agent(r#"{"id":"agent-3","name":"Dana Whitfield","title":"Associate","bio":"Short."}"#);
        let page = render_agent_profile(&a, &[]);
        assert!(page
            .body
            .contains("Dana Whitfield currently has no active exclusive listings."));
        assert!(page.body.contains("<span class=\"listing-count\">0</span>"));
        assert_eq!(page.meta_description, "Meet Dana Whitfield, Associate at Raya Homes. Short.");
        assert!(!page.body.contains("Linkedin"));
        assert!(page.body.contains("View Agent Website"));
    }

    #[test]
    fn socials_only_render_when_present() {
        let a = agent(
            r#"{"id":"agent-1","name":"Sarah Jenkins","socialLinks":{"instagram":"https://instagram.example/sarah"}}"#,
        );
        let page = render_agent_profile(&a, &[]);
        assert!(page.body.contains("Instagram"));
        assert!(!page.body.contains("Linkedin"));
        assert!(page.body.contains("Contact Sarah Jenkins"));
        assert_eq!(page.title, "Sarah Jenkins | Raya Homes");
    }

    #[test]
    fn portfolio_cards_link_to_property_detail() {
        let a = agent(r#"{"id":"agent-2","name":"Michael Chang"}"#);
        let mut listing: Property = serde_json::from_str(
            r#"{"id":"prop-5","slug":"schnoor-road","price":539900,"address":"9 Schnoor Rd, CT","beds":2,"baths":1,"status":"sold"}"#,
        )
        .unwrap();
        listing.normalize();
        let page = render_agent_profile(&a, &[listing]);
        assert!(page.body.contains("portfolio-card sold"));
        assert!(page.body.contains("../property-detail.html?id=schnoor-road"));
        assert!(page.body.contains("$539,900"));
    }
}
