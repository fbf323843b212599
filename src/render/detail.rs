use serde::Serialize;

use super::{escape_html, format_number, format_price, render_property_card, specs_line, status_tag};
use crate::carousel::Carousel;
use crate::contact;
use crate::model::{Property, Scalar};

/// Number of thumbnails beside the hero image.
const THUMBNAILS: usize = 3;

/// A rendered detail page: document title, meta description and body markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailPage {
    pub title: String,
    pub meta_description: String,
    pub body: String,
}

type Row = (&'static str, Option<String>);

fn text(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn scalar(value: &Option<Scalar>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
}

fn list(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

fn yes_no(flag: bool) -> Option<String> {
    Some(if flag { "Yes" } else { "No" }.to_string())
}

/// A `<dl>` of the rows that have a value; nothing when none do.
fn section(id: &str, heading: &str, rows: &[Row]) -> String {
    let present: Vec<_> = rows
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| (label, v)))
        .collect();
    if present.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!(
        "  <section class=\"detail-section\" id=\"{id}\">\n    <h2>{}</h2>\n    <dl>\n",
        escape_html(heading)
    ));
    for (label, value) in present {
        out.push_str(&format!(
            "      <dt>{}</dt><dd>{}</dd>\n",
            escape_html(label),
            escape_html(value)
        ));
    }
    out.push_str("    </dl>\n  </section>\n");
    out
}

fn gallery(property: &Property) -> String {
    let hero = Carousel::lightbox(property.photos.len(), 0);
    let alt = escape_html(&property.title);
    let mut out = String::new();
    out.push_str("  <div class=\"detail-gallery\">\n");
    if let Some(first) = property.photos.get(hero.index()) {
        out.push_str(&format!(
            "    <img class=\"gallery-hero\" src=\"{}\" alt=\"{alt}\" />\n",
            escape_html(first)
        ));
    }
    for photo in property.photos.iter().skip(1).take(THUMBNAILS) {
        out.push_str(&format!(
            "    <img class=\"gallery-thumb\" src=\"{}\" alt=\"{alt}\" />\n",
            escape_html(photo)
        ));
    }
    out.push_str(&format!(
        "    <div class=\"hero-counter\">{}</div>\n    <button class=\"btn-see-all\">See all {} photos</button>\n",
        hero.counter(),
        property.photos.len()
    ));
    out.push_str("  </div>\n");
    out
}

fn listing_strip(property: &Property) -> String {
    let phone = &property.agent.phone;
    let mut out = String::from("  <div class=\"listing-strip\">\n");
    if let Some(listed_by) = text(&property.listed_by) {
        out.push_str(&format!(
            "    <span class=\"listed-by\">{} {}</span>\n",
            escape_html(&listed_by),
            escape_html(phone)
        ));
    }
    if let Some(brokerage) = text(&property.brokerage) {
        out.push_str(&format!(
            "    <span class=\"brokerage\">{} \u{2022} {}</span>\n",
            escape_html(&brokerage),
            escape_html(phone)
        ));
    }
    if let Some(source) = text(&property.source) {
        out.push_str(&format!(
            "    <span class=\"mls-source\">Source: {}</span>\n",
            escape_html(&source)
        ));
    }
    if let Some(mls) = text(&property.mls) {
        out.push_str(&format!(
            "    <span class=\"mls-number\">MLS# {}</span>\n",
            escape_html(&mls)
        ));
    }
    if let Some(date) = property.listing_date {
        out.push_str(&format!(
            "    <span class=\"listing-updated\">Updated: {}</span>\n",
            date.format("%b %-d, %Y")
        ));
    }
    out.push_str("  </div>\n");
    out
}

fn description(property: &Property) -> String {
    let Some(body) = text(&property.description) else {
        return String::new();
    };
    let mut out = String::from("  <div class=\"description\">\n");
    for paragraph in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        out.push_str(&format!("    <p>{}</p>\n", escape_html(paragraph)));
    }
    out.push_str("  </div>\n");
    out
}

fn listing_agent(property: &Property) -> String {
    let agent = &property.agent;
    if agent.name.trim().is_empty() {
        return String::new();
    }
    let mut out = String::from("  <div class=\"listing-agent-card\">\n");
    if let Some(photo) = agent.photo.as_deref().filter(|p| !p.trim().is_empty()) {
        out.push_str(&format!(
            "    <img src=\"{}\" alt=\"{}\" />\n",
            escape_html(photo),
            escape_html(&agent.name)
        ));
    }
    out.push_str(&format!(
        "    <h3>{}</h3>\n    <span class=\"agent-phone\">{}</span>\n    <a href=\"mailto:{}\">{}</a>\n",
        escape_html(&agent.name),
        escape_html(&agent.phone),
        escape_html(&agent.email),
        escape_html(&agent.email)
    ));
    out.push_str("  </div>\n");
    out
}

fn contact_form(property: &Property) -> String {
    format!(
        "  <form class=\"contact-form\" id=\"contactForm\">\n    <input name=\"name\" />\n    <input name=\"email\" />\n    <input name=\"phone\" />\n    <textarea name=\"message\">{}</textarea>\n    <button type=\"submit\">Send Message</button>\n  </form>\n",
        escape_html(&contact::inquiry_message(&property.address))
    )
}

fn new_listings(others: &[Property]) -> String {
    if others.is_empty() {
        return String::new();
    }
    let mut out = String::from("  <div class=\"new-listings-track\">\n");
    for other in others {
        out.push_str(&render_property_card(other, Some("carousel-card")));
    }
    out.push_str("  </div>\n");
    out
}

/// Full property page. `others` feeds the "New Listings" strip.
pub fn render_property_detail(property: &Property, others: &[Property]) -> DetailPage {
    let title = format!("{} | Raya Homes", property.address);
    let meta_description = format!(
        "{} bed, {} bath home at {}. Listed at {} by Raya Homes.",
        property.beds,
        property.baths,
        property.address,
        format_price(property.price)
    );

    let facts = &property.facts;
    let interior = &property.interior;
    let exterior = &property.exterior;
    let structure = &property.structure;
    let financials = &property.financials;

    let mut body = String::new();
    body.push_str(&format!(
        "<article class=\"property-detail\" data-slug=\"{}\">\n",
        escape_html(&property.slug)
    ));
    body.push_str(&gallery(property));
    body.push_str(&format!(
        "  <h1 class=\"property-price\">{}</h1>\n  {}\n  <div class=\"property-specs\">{} | <strong>{}</strong></div>\n  <div class=\"property-address\">{}</div>\n",
        format_price(property.price),
        status_tag(&property.status),
        specs_line(property),
        escape_html(&property.property_type_label()),
        escape_html(&property.address)
    ));
    body.push_str(&listing_strip(property));
    body.push_str(&description(property));
    body.push_str(&section(
        "home-facts",
        "Home Facts",
        &[
            ("Property Type", Some(property.property_type_label())),
            ("Year Built", scalar(&facts.year_built)),
            ("Heating", scalar(&facts.heating)),
            ("Cooling", scalar(&facts.cooling)),
            ("Garage", scalar(&facts.garage)),
            ("Lot Size", scalar(&facts.lot_size)),
        ],
    ));
    body.push_str(&section(
        "interior",
        "Rooms & Interior",
        &[
            ("Bedrooms", Some(property.beds.to_string())),
            ("Bathrooms", Some(property.baths.to_string())),
            ("Full Bathrooms", property.baths_full.map(|v| v.to_string())),
            ("Half Bathrooms", property.baths_half.map(|v| v.to_string())),
            ("Living Area", scalar(&interior.living_area)),
            ("Basement", scalar(&interior.basement)),
            ("Fireplaces", scalar(&interior.fireplaces)),
            ("Total Structure Area", scalar(&interior.total_structure_area)),
            ("Total Livable Area", scalar(&interior.total_livable_area)),
            ("Finished Above Ground", scalar(&interior.finished_above_ground)),
            ("Finished Below Ground", scalar(&interior.finished_below_ground)),
            ("Flooring", scalar(&interior.flooring)),
            ("Laundry", scalar(&interior.laundry)),
            ("Appliances", list(&interior.appliances)),
            ("Interior Features", list(&interior.features)),
        ],
    ));
    body.push_str(&section(
        "exterior",
        "Parking & Exterior",
        &[
            ("Parking Spaces", scalar(&exterior.parking_spaces)),
            ("Attached Garage Spaces", scalar(&exterior.attached_garage_spaces)),
            ("Parking Features", scalar(&exterior.parking_features)),
            ("Levels", scalar(&exterior.levels)),
            ("Patio", scalar(&exterior.patio)),
            ("Exterior Features", scalar(&exterior.exterior_features)),
            ("Pool Features", scalar(&exterior.pool_features)),
            ("Fencing", scalar(&exterior.fencing)),
            ("Has View", yes_no(exterior.has_view)),
        ],
    ));
    body.push_str(&section(
        "structure",
        "Construction",
        &[
            ("Build Area", scalar(&structure.build_area)),
            ("Year Built", scalar(&structure.year_built)),
            ("Sub Type", scalar(&structure.sub_type)),
            ("Home Type", scalar(&structure.home_type)),
            ("Architectural Style", scalar(&structure.architectural_style)),
            ("Property Subtype", scalar(&structure.property_subtype)),
            ("Materials", scalar(&structure.materials)),
            ("Foundation", scalar(&facts.foundation)),
            (
                "Roof",
                scalar(&structure.roof).or_else(|| scalar(&exterior.roof)),
            ),
            ("New Construction", yes_no(structure.new_construction)),
        ],
    ));
    body.push_str(&section(
        "lot",
        "Lot",
        &[
            ("Lot Size", scalar(&facts.lot_size)),
            ("Lot Features", scalar(&property.lot.features)),
            ("Parcel Number", scalar(&property.lot.parcel_number)),
            ("Zoning", scalar(&property.lot.zoning)),
            ("Special Conditions", scalar(&property.lot.special_conditions)),
        ],
    ));
    body.push_str(&section(
        "utilities",
        "Utilities",
        &[
            ("Water", scalar(&property.utilities.water)),
            ("Sewer", scalar(&property.utilities.sewer)),
            ("Utilities", scalar(&property.utilities.utilities)),
        ],
    ));
    body.push_str(&section(
        "schools",
        "Schools",
        &[
            ("Elementary", text(&property.schools.elementary)),
            ("Middle", text(&property.schools.middle)),
            ("High", text(&property.schools.high)),
        ],
    ));
    body.push_str(&section(
        "financials",
        "Finances & Disclosures",
        &[
            ("Price", financials.price.map(format_price)),
            ("Annual Tax", financials.tax_annual.map(format_price)),
            ("HOA Fee", scalar(&financials.hoa_fee)),
            ("HOA Services", scalar(&financials.hoa_services)),
            (
                "Price per Sq. Ft.",
                property.price_per_sqft.map(|v| format!("${v}/sqft")),
            ),
            (
                "Tax Assessed Value",
                financials
                    .tax_assessed_value
                    .map(|v| format!("${}", format_number(v))),
            ),
            ("MLS #", text(&property.mls)),
            ("MLS Status", text(&property.mls_status)),
        ],
    ));
    body.push_str(&listing_agent(property));
    body.push_str(&contact_form(property));
    body.push_str(&new_listings(others));
    body.push_str("</article>\n");

    DetailPage {
        title,
        meta_description,
        body,
    }
}
