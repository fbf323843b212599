pub mod agent;
pub mod property;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use agent::{Agent, AgentStats};
pub use property::{
    Exterior, Facts, Financials, Interior, ListingAgent, ListingStatus, Lot, Property, Schools,
    Structure, Utilities,
};

/// Image used when a record ships without any photo.
pub const PLACEHOLDER_PHOTO: &str = "imgs/no-image.avif";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Property,
    Agent,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display-only value from the fixtures. The JSON files mix strings and
/// numbers for the same field ("yearBuilt": 2018 vs "2018"), so detail
/// sub-records accept either and only ever print them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(true) => f.write_str("Yes"),
            Self::Flag(false) => f.write_str("No"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Lower-case, hyphen-separated form of free text ("Sarah Jenkins" -> "sarah-jenkins").
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Sarah  Jenkins"), "sarah-jenkins");
        assert_eq!(slugify("  450 Alton Rd., Miami "), "450-alton-rd-miami");
        assert_eq!(slugify("prop-1"), "prop-1");
    }

    #[test]
    fn scalar_accepts_strings_numbers_and_flags() {
        let values: Vec<Scalar> = serde_json::from_str(r#"["Central", 2018, true]"#).unwrap();
        let shown: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        assert_eq!(shown, vec!["Central", "2018", "Yes"]);
    }
}
