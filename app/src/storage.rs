use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::CONFIG;
use crate::error::StorageError;

const GCS_API_BASE: &str = "https://storage.googleapis.com";
const SIDECAR_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// One object listed from the store, addressed by its `/bucket/object` path.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub path: String,
    pub size: Option<u64>,
    pub updated: Option<String>,
}

/// Client for the object-storage sidecar: uploads and listings go straight
/// to the storage API with a sidecar-issued token, URL signing goes through
/// the sidecar itself.
pub struct ObjectStorageClient {
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct CredentialResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    signed_url: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ListedObject>,
}

#[derive(Deserialize)]
struct ListedObject {
    name: String,
    // the storage API reports sizes as decimal strings
    size: Option<String>,
    updated: Option<String>,
}

impl ObjectStorageClient {
    pub fn new() -> Self {
        ObjectStorageClient {
            http: reqwest::Client::new(),
        }
    }

    async fn access_token(&self) -> Result<String, StorageError> {
        let resp = self
            .http
            .get(format!("{}/credential", CONFIG.storage_sidecar_url()))
            .timeout(SIDECAR_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StorageError::Sidecar(resp.status().as_u16()));
        }
        Ok(resp.json::<CredentialResponse>().await?.access_token)
    }

    fn base_path(&self) -> Result<String, StorageError> {
        CONFIG
            .first_object_search_path()
            .ok_or_else(StorageError::NotConfigured)
    }

    pub async fn save_file(
        &self,
        content: &[u8],
        object_path: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let full_path = format!("{}/{}", self.base_path()?, object_path);
        let (bucket, object) = parse_object_path(&full_path)?;

        let token = self.access_token().await?;
        let url = format!("{}/upload/storage/v1/b/{}/o", GCS_API_BASE, bucket);
        let resp = self
            .http
            .post(url)
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(content.to_vec())
            .timeout(SIDECAR_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StorageError::Upstream(resp.status().as_u16()));
        }
        Ok(full_path)
    }

    /// Lists objects under `prefix`, most recently updated first.
    pub async fn list_files(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let full_prefix = format!("{}/{}", self.base_path()?, prefix);
        let (bucket, object_prefix) = parse_object_path(&full_prefix)?;

        let token = self.access_token().await?;
        let url = format!("{}/storage/v1/b/{}/o", GCS_API_BASE, bucket);
        let resp = self
            .http
            .get(url)
            .query(&[("prefix", object_prefix.as_str())])
            .bearer_auth(token)
            .timeout(SIDECAR_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StorageError::Upstream(resp.status().as_u16()));
        }

        let listing: ListResponse = resp.json().await?;
        let mut files: Vec<StoredObject> = listing
            .items
            .into_iter()
            .map(|item| StoredObject {
                path: format!("/{}/{}", bucket, item.name),
                size: item.size.and_then(|s| s.parse().ok()),
                updated: item.updated,
            })
            .collect();
        files.sort_by(|a, b| b.updated.cmp(&a.updated));
        Ok(files)
    }

    /// Resolves a time-limited signed URL through the sidecar.
    pub async fn signed_url(
        &self,
        object_path: &str,
        ttl_sec: i64,
    ) -> Result<String, StorageError> {
        let (bucket, object) = parse_object_path(object_path)?;
        let expires_at = (Utc::now() + Duration::seconds(ttl_sec))
            .naive_utc()
            .format("%Y-%m-%dT%H:%M:%S%.6fZ")
            .to_string();

        let resp = self
            .http
            .post(format!(
                "{}/object-storage/signed-object-url",
                CONFIG.storage_sidecar_url()
            ))
            .json(&json!({
                "bucket_name": bucket,
                "object_name": object,
                "method": "GET",
                "expires_at": expires_at,
            }))
            .timeout(SIDECAR_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StorageError::Sidecar(resp.status().as_u16()));
        }
        Ok(resp.json::<SignedUrlResponse>().await?.signed_url)
    }

    pub fn public_url(&self, object_path: &str) -> Result<String, StorageError> {
        let (bucket, object) = parse_object_path(object_path)?;
        Ok(format!("{}/{}/{}", GCS_API_BASE, bucket, object))
    }
}

/// Splits a virtual `/bucket/object...` path into bucket and object name.
pub(crate) fn parse_object_path(path: &str) -> Result<(String, String), StorageError> {
    let normalized = if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{}", path)
    };

    let mut parts = normalized.splitn(3, '/');
    parts.next(); // leading empty segment
    let bucket = parts.next().filter(|s| !s.is_empty());
    let object = parts.next().filter(|s| !s.is_empty());
    match (bucket, object) {
        (Some(bucket), Some(object)) => Ok((bucket.to_owned(), object.to_owned())),
        _ => Err(StorageError::InvalidPath(path.to_owned())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_bucket_and_object() {
        let (bucket, object) = parse_object_path("/my-bucket/public/webcam/frame.jpg").unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(object, "public/webcam/frame.jpg");
    }

    #[test]
    fn parse_normalizes_missing_slash() {
        let (bucket, object) = parse_object_path("my-bucket/frame.jpg").unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(object, "frame.jpg");
    }

    #[test]
    fn parse_rejects_bucket_only() {
        assert!(parse_object_path("/my-bucket").is_err());
        assert!(parse_object_path("/").is_err());
        assert!(parse_object_path("").is_err());
    }
}
