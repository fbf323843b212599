use super::detail::DetailPage;
use super::{agent_card, escape_html};
use crate::deeplink;
use crate::model::Agent;

/// Agents featured beside a valuation request.
pub const VALUATION_AGENTS: usize = 2;

/// Home valuation page. `address` is `(short, full)`; without one the
/// address block is left out. The first two agents are offered, linked by
/// legacy id.
pub fn render_valuation(address: Option<&(String, String)>, agents: &[Agent]) -> DetailPage {
    let mut body = String::new();
    body.push_str("<section class=\"valuation-hero\">\n");
    match address {
        Some((short, full)) => {
            body.push_str(&format!(
                "  <input id=\"searchInput\" type=\"text\" value=\"{}\" />\n",
                escape_html(full)
            ));
            body.push_str(&format!(
                "  <h1 id=\"propertyAddressTitle\">{}</h1>\n",
                escape_html(short)
            ));
            body.push_str(&format!(
                "  <p id=\"propertyAddressFull\">{}</p>\n",
                escape_html(full)
            ));
        }
        None => body.push_str("  <input id=\"searchInput\" type=\"text\" value=\"\" />\n"),
    }
    body.push_str("</section>\n");

    body.push_str("<section id=\"valuationAgentGrid\" class=\"agent-grid\">\n");
    for agent in agents.iter().take(VALUATION_AGENTS) {
        body.push_str(&agent_card(agent, &deeplink::agent_legacy_href(&agent.id)));
    }
    body.push_str("</section>\n");

    let title = match address {
        Some((short, _)) => format!("Home Valuation for {short} | Raya Homes"),
        None => "Home Valuation | Raya Homes".to_string(),
    };
    let meta_description = match address {
        Some((_, full)) => format!("Request a free home valuation for {full} from a Raya Homes agent."),
        None => "Request a free home valuation from a Raya Homes agent.".to_string(),
    };
    DetailPage {
        title,
        meta_description,
        body,
    }
}
