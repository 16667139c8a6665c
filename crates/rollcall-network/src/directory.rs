//! Directory resolver.
//!
//! Looks a credential up in the remote holder directory. Every call issues
//! exactly one request: no retry, no cache, so a card presented twice in a
//! row is looked up twice.

#![allow(async_fn_in_trait)]

use crate::client::ClientConfig;
use crate::error::{NetworkError, Result};
use rollcall_core::constants::{DIRECTORY_FILTER_FIELD, DIRECTORY_FILTER_PARAM, DIRECTORY_PATH};
use rollcall_core::{CredentialId, HolderRecord};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

/// Directory of credential holders.
pub trait HolderDirectory: Send + Sync {
    /// Resolve a credential to its holder.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::NotFound` if no holder matches, or a request
    /// failure if the directory cannot be queried.
    async fn resolve(&self, id: &CredentialId) -> Result<HolderRecord>;
}

/// One page of directory search results.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryPage {
    #[serde(default)]
    total_items: i64,

    // Only the first item is ever read; the rest stay undecoded.
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

impl DirectoryPage {
    fn into_first_entry(self) -> Result<DirectoryEntry> {
        let total_items = self.total_items;
        let first = self.items.into_iter().next().ok_or_else(|| {
            NetworkError::Malformed(format!("totalItems is {total_items} but no items returned"))
        })?;
        serde_json::from_value(first).map_err(|e| NetworkError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    id: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    surname: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    curso: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl From<DirectoryEntry> for HolderRecord {
    fn from(entry: DirectoryEntry) -> Self {
        HolderRecord::new(entry.id, entry.name, entry.surname, &entry.curso)
    }
}

/// HTTP client for the holder directory collection.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    http: reqwest::Client,
    url: String,
}

impl DirectoryResolver {
    /// Create a resolver with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Setup` if the client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?, config))
    }

    /// Create a resolver sharing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            url: config.url(DIRECTORY_PATH),
        }
    }

    /// Directory filter selecting the holder of `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_core::CredentialId;
    /// use rollcall_network::DirectoryResolver;
    ///
    /// let id: CredentialId = "04abcdef".parse().unwrap();
    /// assert_eq!(DirectoryResolver::filter_for(&id), "rfid_uid~'04ABCDEF'");
    /// ```
    pub fn filter_for(id: &CredentialId) -> String {
        format!("{DIRECTORY_FILTER_FIELD}~'{id}'")
    }

    /// Collection URL queried by this resolver.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HolderDirectory for DirectoryResolver {
    async fn resolve(&self, id: &CredentialId) -> Result<HolderRecord> {
        let filter = Self::filter_for(id);
        debug!(url = %self.url, %filter, "Querying directory");

        let response = self
            .http
            .get(&self.url)
            .query(&[(DIRECTORY_FILTER_PARAM, filter.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let page: DirectoryPage =
            serde_json::from_str(&body).map_err(|e| NetworkError::Malformed(e.to_string()))?;

        if page.total_items <= 0 {
            return Err(NetworkError::NotFound {
                credential: id.to_string(),
            });
        }

        let holder = HolderRecord::from(page.into_first_entry()?);
        info!(
            credential = %id,
            holder = holder.holder_id(),
            name = %holder.full_name(),
            cohort = holder.cohort(),
            "Holder resolved"
        );
        Ok(holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_decoding_first_item() {
        let body = r#"{
            "page": 1, "perPage": 30, "totalItems": 2, "totalPages": 1,
            "items": [
                {"id": "a1", "name": "Ana", "surname": "Paz", "curso": "5º A", "rfid_uid": "04ABCDEF"},
                {"id": "b2", "name": "Beto", "surname": "Gil", "curso": "6 B"}
            ]
        }"#;
        let page: DirectoryPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_items, 2);

        let holder = HolderRecord::from(page.into_first_entry().unwrap());
        assert_eq!(holder.holder_id(), "a1");
        assert_eq!(holder.cohort(), "5\u{00B0} A");
    }

    #[test]
    fn test_page_decoding_missing_fields_default() {
        let page: DirectoryPage = serde_json::from_str(r#"{"items": [{"id": "x"}]}"#).unwrap();
        assert_eq!(page.total_items, 0);
        let entry = page.into_first_entry().unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.curso, "");
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let body = r#"{"totalItems": 1, "items": [{"id": "x", "name": null, "surname": "Paz", "curso": null}]}"#;
        let entry = serde_json::from_str::<DirectoryPage>(body)
            .unwrap()
            .into_first_entry()
            .unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.surname, "Paz");
        assert_eq!(entry.curso, "");
    }

    #[test]
    fn test_first_entry_without_id_is_rejected() {
        let page: DirectoryPage =
            serde_json::from_str(r#"{"totalItems": 1, "items": [{"name": "Ana"}]}"#).unwrap();
        assert!(matches!(
            page.into_first_entry(),
            Err(NetworkError::Malformed(_))
        ));
    }

    #[test]
    fn test_later_items_are_not_decoded() {
        let body = r#"{"totalItems": 2, "items": [{"id": "a1"}, {"name": "no id", "curso": 7}]}"#;
        let page: DirectoryPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.into_first_entry().unwrap().id, "a1");
    }

    #[test]
    fn test_url() {
        let config = ClientConfig {
            base_url: "http://10.56.2.3:8090".to_string(),
            ..ClientConfig::default()
        };
        let resolver = DirectoryResolver::new(&config).unwrap();
        assert_eq!(
            resolver.url(),
            "http://10.56.2.3:8090/api/collections/students/records"
        );
    }
}
