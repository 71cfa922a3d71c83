use std::future::Future;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ListError;

const USER_AGENT: &str = "customer-list-core/0.1";

/// Somewhere a list can get fresh records from
pub trait RecordSource: Send + Sync + 'static {
    type Record: Send + Sync + 'static;

    fn fetch(&self) -> impl Future<Output = Result<Vec<Self::Record>, ListError>> + Send;
}

/// Payload shapes accepted from files and endpoints
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordPayload<R> {
    List(Vec<R>),
    Wrapped { customers: Vec<R> },
}

/// Parse either a bare JSON array or `{"customers": [...]}`
pub fn parse_records<R: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<R>, ListError> {
    match serde_json::from_slice::<RecordPayload<R>>(bytes)? {
        RecordPayload::List(records) | RecordPayload::Wrapped { customers: records } => {
            Ok(records)
        }
    }
}

/// Fixed set of records, cloned on every fetch
#[derive(Debug, Clone)]
pub struct StaticSource<R> {
    records: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R> RecordSource for StaticSource<R>
where
    R: Clone + Send + Sync + 'static,
{
    type Record = R;

    fn fetch(&self) -> impl Future<Output = Result<Vec<R>, ListError>> + Send {
        let records = self.records.clone();
        async move { Ok(records) }
    }
}

/// Records stored as JSON on disk
#[derive(Debug)]
pub struct JsonFileSource<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl<R> RecordSource for JsonFileSource<R>
where
    R: DeserializeOwned + Send + Sync + 'static,
{
    type Record = R;

    fn fetch(&self) -> impl Future<Output = Result<Vec<R>, ListError>> + Send {
        let path = self.path.clone();
        async move {
            log::debug!("Reading records from {}", path.display());
            let bytes = tokio::fs::read(&path).await?;
            let records = parse_records(&bytes)?;
            log::debug!("Read {} records from {}", records.len(), path.display());
            Ok(records)
        }
    }
}

/// Records served as JSON over HTTP
#[derive(Debug)]
pub struct HttpSource<R> {
    url: String,
    client: reqwest::Client,
    _record: PhantomData<fn() -> R>,
}

impl<R> HttpSource<R> {
    pub fn new(url: impl Into<String>) -> Result<Self, ListError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
            _record: PhantomData,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<R> RecordSource for HttpSource<R>
where
    R: DeserializeOwned + Send + Sync + 'static,
{
    type Record = R;

    fn fetch(&self) -> impl Future<Output = Result<Vec<R>, ListError>> + Send {
        let request = self.client.get(&self.url);
        let url = self.url.clone();
        async move {
            log::debug!("Fetching records from {}", url);
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ListError::Source(format!(
                    "{} returned status {}",
                    url, status
                )));
            }
            let bytes = response.bytes().await?;
            parse_records(&bytes)
        }
    }
}
