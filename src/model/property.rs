use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{slugify, Scalar, PLACEHOLDER_PHOTO};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListingStatus {
    ForSale,
    ComingSoon,
    Sold,
    Pending,
    Other(String),
}

impl ListingStatus {
    /// Accepts both the slug form ("coming-soon") and the label form
    /// ("Coming Soon") found in older fixtures.
    pub fn parse(value: &str) -> Self {
        let key = value.trim().to_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "for-sale" => Self::ForSale,
            "coming-soon" => Self::ComingSoon,
            "sold" => Self::Sold,
            "pending" => Self::Pending,
            _ => Self::Other(value.trim().to_string()),
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::ForSale => "for-sale",
            Self::ComingSoon => "coming-soon",
            Self::Sold => "sold",
            Self::Pending => "pending",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::ForSale => "For Sale",
            Self::ComingSoon => "Coming Soon",
            Self::Sold => "Sold",
            Self::Pending => "Pending",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ListingStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ListingStatus> for String {
    fn from(value: ListingStatus) -> Self {
        value.slug().to_string()
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Facts {
    pub property_type: Option<String>,
    pub year_built: Option<Scalar>,
    pub heating: Option<Scalar>,
    pub cooling: Option<Scalar>,
    pub garage: Option<Scalar>,
    pub lot_size: Option<Scalar>,
    pub foundation: Option<Scalar>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interior {
    pub living_area: Option<Scalar>,
    pub basement: Option<Scalar>,
    pub fireplaces: Option<Scalar>,
    pub total_structure_area: Option<Scalar>,
    pub total_livable_area: Option<Scalar>,
    pub finished_above_ground: Option<Scalar>,
    pub finished_below_ground: Option<Scalar>,
    pub flooring: Option<Scalar>,
    pub laundry: Option<Scalar>,
    pub appliances: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Exterior {
    pub parking_spaces: Option<Scalar>,
    pub attached_garage_spaces: Option<Scalar>,
    pub parking_features: Option<Scalar>,
    pub levels: Option<Scalar>,
    pub patio: Option<Scalar>,
    pub exterior_features: Option<Scalar>,
    pub pool_features: Option<Scalar>,
    pub fencing: Option<Scalar>,
    pub roof: Option<Scalar>,
    pub has_view: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Structure {
    pub build_area: Option<Scalar>,
    pub year_built: Option<Scalar>,
    pub sub_type: Option<Scalar>,
    pub home_type: Option<Scalar>,
    pub architectural_style: Option<Scalar>,
    pub property_subtype: Option<Scalar>,
    pub materials: Option<Scalar>,
    pub roof: Option<Scalar>,
    pub new_construction: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lot {
    pub features: Option<Scalar>,
    pub parcel_number: Option<Scalar>,
    pub zoning: Option<Scalar>,
    pub special_conditions: Option<Scalar>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Financials {
    pub price: Option<u64>,
    pub tax_annual: Option<u64>,
    pub hoa_fee: Option<Scalar>,
    pub hoa_services: Option<Scalar>,
    pub tax_assessed_value: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schools {
    pub elementary: Option<String>,
    pub middle: Option<String>,
    pub high: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Utilities {
    pub water: Option<Scalar>,
    pub sewer: Option<Scalar>,
    pub utilities: Option<Scalar>,
}

/// Contact summary embedded in each property record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingAgent {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub photo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub price: u64,
    pub address: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub beds: u32,
    pub baths: f64,
    #[serde(default)]
    pub sqft: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub status: ListingStatus,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub listing_date: Option<NaiveDate>,

    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub listed_by: Option<String>,
    #[serde(default)]
    pub brokerage: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub mls: Option<String>,
    #[serde(default)]
    pub mls_status: Option<String>,
    #[serde(default)]
    pub map_embed: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub price_per_sqft: Option<u64>,
    #[serde(default)]
    pub baths_full: Option<u32>,
    #[serde(default)]
    pub baths_half: Option<u32>,

    #[serde(default)]
    pub facts: Facts,
    #[serde(default)]
    pub interior: Interior,
    #[serde(default)]
    pub exterior: Exterior,
    #[serde(default)]
    pub structure: Structure,
    #[serde(default)]
    pub lot: Lot,
    #[serde(default)]
    pub financials: Financials,
    #[serde(default)]
    pub schools: Schools,
    #[serde(default)]
    pub utilities: Utilities,
    #[serde(default)]
    pub agent: ListingAgent,
}

impl Property {
    /// Fills the optional fields every render path relies on. Runs once at load.
    pub fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
        self.slug = self.slug.trim().to_string();
        if self.slug.is_empty() {
            self.slug = slugify(&self.id);
        }
        if self.photos.is_empty() {
            self.photos.push(PLACEHOLDER_PHOTO.to_string());
        }
        let (street, rest) = split_address(&self.address);
        if self.title.trim().is_empty() {
            self.title = street.to_string();
        }
        if self.location.trim().is_empty() {
            self.location = rest.to_string();
        }
        if self.facts.property_type.is_none() && !self.kind.is_empty() {
            self.facts.property_type = Some(type_label(&self.kind));
        }
    }

    /// Case-insensitive substring match against address, title and location.
    /// `needle` must already be lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.address.to_lowercase().contains(needle)
            || self.title.to_lowercase().contains(needle)
            || self.location.to_lowercase().contains(needle)
    }

    pub fn property_type_label(&self) -> String {
        self.facts
            .property_type
            .clone()
            .unwrap_or_else(|| type_label(&self.kind))
    }
}

fn split_address(address: &str) -> (&str, &str) {
    match address.split_once(',') {
        Some((street, rest)) => (street.trim(), rest.trim()),
        None => (address.trim(), ""),
    }
}

/// "single-family" -> "Single Family", "co-op" stays hyphenated as "Co-op".
fn type_label(kind: &str) -> String {
    if kind.eq_ignore_ascii_case("co-op") {
        return "Co-op".to_string();
    }
    kind.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
