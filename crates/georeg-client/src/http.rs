//! Thin JSON transport to the classification backend.
//!
//! No retries and no reshaping: a non-2xx response surfaces its body
//! verbatim, and a batch failure discards the whole batch.

use std::path::Path;
use std::time::Duration;

use georeg_core::route::{BatchPlan, Mode, SinglePlan};
use georeg_core::verdict::{BatchOutcome, Verdict};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading upload file: {0}")]
    Io(#[from] std::io::Error),
}

/// Default per-request deadline. The backend runs retrieval plus LLM
/// inference per row, so batches need headroom.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// One retrieved document from the search debug endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchDoc {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// An entry in the backend's law knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LawEntry {
    pub file_path: String,
    pub law_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub article_or_section: Option<String>,
}

/// Metadata accompanying a law upload.
#[derive(Debug, Clone)]
pub struct LawMeta {
    pub law_name: String,
    pub region: String,
    pub source: String,
    pub article_or_section: Option<String>,
}

/// HTTP client for the classification backend's JSON endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing
    /// slash).
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request deadline.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a single-artifact classification per the routed plan.
    ///
    /// Dispatches `/classify` or `/classify_auto` according to the plan's
    /// derived mode; auto mode omits `rule_hits` from the body.
    pub async fn classify(&self, plan: &SinglePlan) -> Result<Verdict, ApiError> {
        let body = match plan.mode {
            Mode::ExplicitSignals => json!({
                "feature_text": &plan.feature_text,
                "rule_hits": &plan.rule_hits,
                "regions": &plan.regions,
            }),
            Mode::AutoDetect => json!({
                "feature_text": &plan.feature_text,
                "regions": &plan.regions,
            }),
        };
        self.post_json(plan.endpoint(), &body).await
    }

    /// Run a batch classification per the routed plan.
    pub async fn batch_classify(&self, plan: &BatchPlan) -> Result<BatchOutcome, ApiError> {
        let body = json!({
            "rows": &plan.rows,
            "k": plan.k,
            "csv": plan.csv,
            "regions": &plan.regions,
        });
        let outcome: BatchOutcome = self.post_json(plan.endpoint(), &body).await?;
        info!(rows = outcome.rows.len(), csv = outcome.csv.is_some(), "batch complete");
        Ok(outcome)
    }

    /// Preview raw retrieval for a query.
    pub async fn search(&self, query: &str, k: u32, mmr: bool) -> Result<Vec<SearchDoc>, ApiError> {
        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(default)]
            docs: Vec<SearchDoc>,
        }
        let body = json!({ "query": query, "k": k, "mmr": mmr });
        let resp: SearchResponse = self.post_json("/search", &body).await?;
        Ok(resp.docs)
    }

    /// List the backend's law knowledge base.
    pub async fn laws(&self) -> Result<Vec<LawEntry>, ApiError> {
        #[derive(Deserialize)]
        struct LawsResponse {
            #[serde(default)]
            laws: Vec<LawEntry>,
        }
        let url = format!("{}/laws", self.base_url);
        info!(url = %url, "listing laws");
        let resp = self.client.get(&url).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<LawsResponse>().await?.laws)
    }

    /// Upload one law document with its metadata.
    pub async fn upload_law(&self, file: &Path, meta: &LawMeta) -> Result<(), ApiError> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.txt".to_string());
        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("law_name", meta.law_name.clone())
            .text("region", meta.region.clone())
            .text("source", meta.source.clone());
        if let Some(article) = &meta.article_or_section {
            form = form.text("article_or_section", article.clone());
        }

        let url = format!("{}/laws/upload", self.base_url);
        info!(url = %url, law = %meta.law_name, "uploading law");
        let resp = self.client.post(&url).multipart(form).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Remove one law document from the knowledge base.
    pub async fn delete_law(&self, file_path: &str) -> Result<(), ApiError> {
        let url = format!("{}/laws/delete", self.base_url);
        info!(url = %url, file_path = %file_path, "deleting law");
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "file_path": file_path }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// One-shot backend availability check.
    pub async fn health(&self) -> Result<bool, ApiError> {
        #[derive(Deserialize)]
        struct Health {
            ok: bool,
        }
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<Health>().await?.ok)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        info!(url = %url, "sending request");
        let resp = self.client.post(&url).json(body).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
