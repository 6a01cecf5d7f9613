//! # REST backend
//! Talks to the hosted document database over HTTP:
//!
//! - `GET  {base}/documents/{path}` — point read (404 means absent)
//! - `GET  {base}/documents/{collection}:list` — namespace listing
//! - `POST {base}/documents:commit` — atomic batch commit
//!
//! Requests carry the project api key; once the user signs in, the identity
//! provider's access token rides along as a bearer header so the backend can
//! enforce its per-user rules.

use std::cell::RefCell;

use crate::model::{CollectionPath, DocPath, Document, Fields, WriteBatch};
use crate::{DocumentStore, StoreError};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
}

pub struct RestStore {
    client: reqwest::Client,
    config: RestConfig,
    access_token: RefCell<Option<String>>,
}

impl RestStore {
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            access_token: RefCell::new(None),
        }
    }

    /// Attach (or drop) the signed-in user's access token.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.borrow_mut() = token;
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("apikey", &self.config.api_key);
        match self.access_token.borrow().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), suffix)
    }
}

#[derive(serde::Deserialize)]
struct WireDocument {
    path: String,
    fields: Fields,
}

#[derive(serde::Deserialize)]
struct ListResponse {
    documents: Vec<WireDocument>,
}

#[derive(serde::Serialize)]
struct CommitRequest {
    writes: WriteBatch,
}

impl DocumentStore for RestStore {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let request = self.client.get(self.url(&format!("documents/{path}")));
        let response = self.authorize(request).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let wire: WireDocument = response.error_for_status()?.json().await?;
        Ok(Some(Document::new(path.clone(), wire.fields)))
    }

    async fn list_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        let request = self
            .client
            .get(self.url(&format!("documents/{collection}:list")));
        let response = self.authorize(request).send().await?;
        let listing: ListResponse = response.error_for_status()?.json().await?;
        listing
            .documents
            .into_iter()
            .map(|wire| Ok(Document::new(DocPath::parse(&wire.path)?, wire.fields)))
            .collect()
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.url("documents:commit"))
            .json(&CommitRequest { writes: batch });
        let response = self.authorize(request).send().await?;
        if response.status() == reqwest::StatusCode::PRECONDITION_FAILED {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::FailedPrecondition(message));
        }
        response.error_for_status()?;
        Ok(())
    }
}
