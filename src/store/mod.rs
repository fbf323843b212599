use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{Agent, Property, RecordKind};

/// Where a fixture array comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    FilePath(String),
    Url(String),
    Inline(String),
}

impl DataSource {
    /// `http(s)://` values are fetched, everything else is read from disk.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::FilePath(trimmed.to_string())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::FilePath(path) => path.clone(),
            Self::Url(url) => url.clone(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {kind} data: {path}: {source}")]
    Read {
        kind: RecordKind,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {kind} data: {url}: {source}")]
    Fetch {
        kind: RecordKind,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{kind} data request returned status {status}: {url}")]
    HttpStatus {
        kind: RecordKind,
        url: String,
        status: u16,
    },

    #[error("failed to parse {kind} data from {origin}: {source}")]
    Parse {
        kind: RecordKind,
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} slug '{slug}'")]
    DuplicateSlug { kind: RecordKind, slug: String },
}

impl StoreError {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Read { kind, .. }
            | Self::Fetch { kind, .. }
            | Self::HttpStatus { kind, .. }
            | Self::Parse { kind, .. }
            | Self::DuplicateSlug { kind, .. } => *kind,
        }
    }
}

/// Which fixtures a page needs. `None` leaves that side empty.
#[derive(Clone, Debug, Default)]
pub struct Sources {
    pub properties: Option<DataSource>,
    pub agents: Option<DataSource>,
}

pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.max(1)))
        .build()
}

/// Reads one JSON array. A non-success HTTP status counts as a load failure.
pub async fn fetch_records<T: DeserializeOwned>(
    kind: RecordKind,
    source: &DataSource,
    client: &reqwest::Client,
) -> Result<Vec<T>, StoreError> {
    let body = match source {
        DataSource::Inline(json) => json.clone(),
        DataSource::FilePath(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| StoreError::Read {
                    kind,
                    path: path.clone(),
                    source,
                })?
        }
        DataSource::Url(url) => {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|source| StoreError::Fetch {
                    kind,
                    url: url.clone(),
                    source,
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(StoreError::HttpStatus {
                    kind,
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(|source| StoreError::Fetch {
                kind,
                url: url.clone(),
                source,
            })?
        }
    };
    let origin = source.describe();
    serde_json::from_str(&body).map_err(|source| StoreError::Parse {
        kind,
        origin,
        source,
    })
}

/// Immutable snapshot of the fixtures for one page.
#[derive(Clone, Debug, Default)]
pub struct DataStore {
    properties: Vec<Property>,
    agents: Vec<Agent>,
}

impl DataStore {
    /// Normalizes every record and rejects duplicate slugs.
    pub fn new(mut properties: Vec<Property>, mut agents: Vec<Agent>) -> Result<Self, StoreError> {
        properties.iter_mut().for_each(Property::normalize);
        agents.iter_mut().for_each(Agent::normalize);
        ensure_unique(RecordKind::Property, properties.iter().map(|p| p.slug.as_str()))?;
        ensure_unique(RecordKind::Agent, agents.iter().map(|a| a.slug.as_str()))?;
        Ok(Self { properties, agents })
    }

    /// Loads both fixtures concurrently; the page proceeds only when both succeed.
    pub async fn load(sources: &Sources, client: &reqwest::Client) -> Result<Self, StoreError> {
        let properties = async {
            match sources.properties.as_ref() {
                Some(src) => fetch_records::<Property>(RecordKind::Property, src, client).await,
                None => Ok(Vec::new()),
            }
        };
        let agents = async {
            match sources.agents.as_ref() {
                Some(src) => fetch_records::<Agent>(RecordKind::Agent, src, client).await,
                None => Ok(Vec::new()),
            }
        };
        let (properties, agents) = futures::try_join!(properties, agents)?;
        info!(
            properties = properties.len(),
            agents = agents.len(),
            "fixtures loaded"
        );
        Self::new(properties, agents)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn property_by_slug(&self, slug: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.slug == slug)
    }

    pub fn property_by_id(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn agent_by_slug(&self, slug: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.slug == slug)
    }

    pub fn agent_by_id(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }
}

fn ensure_unique<'a>(
    kind: RecordKind,
    slugs: impl Iterator<Item = &'a str>,
) -> Result<(), StoreError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for slug in slugs {
        if !seen.insert(slug) {
            debug!(%kind, slug, "duplicate slug rejected");
            return Err(StoreError::DuplicateSlug {
                kind,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROPS: &str = r#"[
        {"id":"p1","slug":"one","price":10,"address":"1 A St, X","beds":1,"baths":1,"status":"for-sale"},
        {"id":"p2","price":20,"address":"2 B St, Y","beds":2,"baths":2,"status":"sold"}
    ]"#;

    #[test]
    fn data_source_parse_detects_urls() {
        assert_eq!(
            DataSource::parse("https://example.com/props.json"),
            DataSource::Url("https://example.com/props.json".to_string())
        );
        assert_eq!(
            DataSource::parse(" ./fixtures/properties.json "),
            DataSource::FilePath("./fixtures/properties.json".to_string())
        );
    }

    #[tokio::test]
    async fn load_inline_sources_normalizes_records() {
        let client = reqwest::Client::new();
        let sources = Sources {
            properties: Some(DataSource::Inline(PROPS.to_string())),
            agents: None,
        };
        let store = DataStore::load(&sources, &client).await.unwrap();
        assert_eq!(store.properties().len(), 2);
        assert!(store.agents().is_empty());
        assert_eq!(store.property_by_slug("p2").map(|p| p.id.as_str()), Some("p2"));
        assert_eq!(store.property_by_id("p1").map(|p| p.slug.as_str()), Some("one"));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let client = reqwest::Client::new();
        let err = fetch_records::<Property>(
            RecordKind::Property,
            &DataSource::FilePath("./does/not/exist.json".to_string()),
            &client,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert_eq!(err.kind(), RecordKind::Property);
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let client = reqwest::Client::new();
        let err = fetch_records::<Property>(
            RecordKind::Property,
            &DataSource::Inline("{not json".to_string()),
            &client,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    /// Answers every connection with a bare 404.
    async fn not_found_server() -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                    .await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn http_error_status_is_reported() {
        let addr = not_found_server().await;
        let client = build_client(5).unwrap();
        let sources = Sources {
            properties: Some(DataSource::Url(format!("http://{addr}/properties.json"))),
            agents: None,
        };
        let err = DataStore::load(&sources, &client).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::HttpStatus {
                status: 404,
                kind: RecordKind::Property,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let mut props: Vec<Property> = serde_json::from_str(PROPS).unwrap();
        props[1].slug = "one".to_string();
        let err = DataStore::new(props, Vec::new()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSlug { ref slug, .. } if slug == "one"));
    }
}
