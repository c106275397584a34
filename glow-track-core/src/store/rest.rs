//! HTTP-backed library store.
//!
//! Talks JSON to a sync server: `GET /v1/users/{id}/library` returns the
//! stored document (404 when the user has never saved), and `PUT` to the
//! same path stores a payload the server merges at the top level.

use serde_json::Value;

use super::{LibraryStore, StoreError, StoredLibrary};

#[derive(Debug, Clone)]
pub struct RestLibraryStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestLibraryStore {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn library_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/users/{}/library",
            self.base_url.trim_end_matches('/'),
            user_id
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

impl LibraryStore for RestLibraryStore {
    async fn get(&self, user_id: &str) -> Result<Option<Value>, StoreError> {
        let response = self
            .authorize(self.client.get(self.library_url(user_id)))
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }

        let value = response
            .json()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, user_id: &str, payload: &StoredLibrary) -> Result<(), StoreError> {
        let response = self
            .authorize(self.client.put(self.library_url(user_id)))
            .query(&[("merge", "true")])
            .json(payload)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_url() {
        let store = RestLibraryStore::new("https://sync.example.com/", None);
        assert_eq!(
            store.library_url("u1"),
            "https://sync.example.com/v1/users/u1/library"
        );
    }
}
