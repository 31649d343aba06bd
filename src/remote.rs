use std::collections::BTreeMap;
use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com/gists";
pub const DEFAULT_FILE_NAME: &str = "file1.txt";

const GITHUB_JSON: &str = "application/vnd.github+json";
const GIST_DESCRIPTION: &str = "gist";

/// Where the armored blob lives.
pub trait RemoteStore: Send + Sync {
    /// Returns the text content of the blob file in gist `gist_id`.
    fn fetch(&self, gist_id: &str) -> impl Future<Output = Result<String>> + Send;

    /// Replaces the blob file's content, authenticating with `token`.
    fn patch(
        &self,
        gist_id: &str,
        content: &str,
        token: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Serialize)]
struct PatchBody<'a> {
    description: &'a str,
    public: bool,
    files: BTreeMap<&'a str, FileContent<'a>>,
}

#[derive(Serialize)]
struct FileContent<'a> {
    content: &'a str,
}

#[derive(Clone)]
pub struct GistClient {
    http: reqwest::Client,
    base_url: Url,
    file_name: String,
}

impl GistClient {
    pub fn new(base_url: &str, file_name: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Transport(format!("invalid API base {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Transport(format!("invalid API base {}", base_url)));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GistClient {
            http,
            base_url,
            file_name: file_name.into(),
        })
    }

    /// `{base}/{gist_id}`, with the id confined to a single path segment.
    fn gist_url(&self, gist_id: &str) -> Result<Url> {
        let well_formed = !gist_id.is_empty()
            && gist_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(Error::InvalidGistId(gist_id.to_owned()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidGistId(gist_id.to_owned()))?
            .pop_if_empty()
            .push(gist_id);
        Ok(url)
    }

    fn content_of(&self, document: &Value) -> Result<String> {
        document
            .get("files")
            .and_then(|files| files.get(&self.file_name))
            .and_then(|file| file.get("content"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::RemoteFormat(format!("gist has no content for {}", self.file_name))
            })
    }
}

impl RemoteStore for GistClient {
    async fn fetch(&self, gist_id: &str) -> Result<String> {
        let url = self.gist_url(gist_id)?;
        debug!("GET {}", url);
        let body = self
            .http
            .get(url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let document: Value =
            serde_json::from_slice(&body).map_err(|e| Error::RemoteFormat(e.to_string()))?;
        self.content_of(&document)
    }

    async fn patch(&self, gist_id: &str, content: &str, token: &str) -> Result<()> {
        let url = self.gist_url(gist_id)?;
        let body = PatchBody {
            description: GIST_DESCRIPTION,
            public: true,
            files: BTreeMap::from([(self.file_name.as_str(), FileContent { content })]),
        };
        debug!("PATCH {}", url);
        self.http
            .patch(url)
            .header(ACCEPT, GITHUB_JSON)
            .header(AUTHORIZATION, format!("token {}", token))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
