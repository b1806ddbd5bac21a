//! HTTP 存储客户端
//!
//! 协议:
//! - `POST   {base}/v1/session`              `{email, password}` → `{session_id}`
//! - `GET    {base}/v1/files`                → `{"files": {handle: {"t": 0, "a": {"n": name}}}}`
//! - `GET    {base}/v1/files/{handle}/content` → 原始字节
//! - `DELETE {base}/v1/session`

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::error_classifier::network_error;
use crate::core::error::StorageError;
use crate::core::models::{Credentials, RemoteNode, Session};
use crate::core::traits::StorageBackend;

const USER_AGENT: &str = concat!("cloud-cad-viewer/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    session_id: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    files: HashMap<String, serde_json::Value>,
}

pub struct HttpStorageClient {
    client: reqwest::Client,
    base: Url,
}

impl HttpStorageClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        // join() 需要以 '/' 结尾的基地址
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StorageError> {
        self.base
            .join(path)
            .map_err(|e| StorageError::Decode(format!("invalid endpoint {path}: {e}")))
    }

    fn content_url(&self, remote_id: &str) -> Result<Url, StorageError> {
        let mut url = self.endpoint("v1/files")?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Decode("remote URL cannot be a base".to_string()))?
            .push(remote_id)
            .push("content");
        Ok(url)
    }

    async fn status_error(response: reqwest::Response) -> StorageError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StorageError::Status {
            status,
            body: body.chars().take(200).collect(),
        }
    }
}

/// 解析单条列表记录; "a" 或 "n" 缺失时名称为 None
fn node_from_listing(handle: String, data: &serde_json::Value) -> RemoteNode {
    let name = data
        .get("a")
        .and_then(|a| a.get("n"))
        .and_then(|n| n.as_str())
        .map(str::to_string);
    RemoteNode {
        id: Some(handle),
        name,
    }
}

#[async_trait]
impl StorageBackend for HttpStorageClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, StorageError> {
        let response = self
            .client
            .post(self.endpoint("v1/session")?)
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            let reason = if body.trim().is_empty() {
                "email or password not accepted".to_string()
            } else {
                body
            };
            return Err(StorageError::InvalidCredentials(reason));
        }
        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }

        let data: LoginResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Decode(format!("login response: {e}")))?;
        Ok(Session::new(data.session_id, credentials.email.clone()))
    }

    async fn list_files(&self, session: &Session) -> Result<Vec<RemoteNode>, StorageError> {
        let response = self
            .client
            .get(self.endpoint("v1/files")?)
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(network_error)?;

        match response.status().as_u16() {
            401 => return Err(StorageError::Unauthorized),
            s if !(200..300).contains(&s) => return Err(Self::status_error(response).await),
            _ => {}
        }

        let data: ListResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Decode(format!("file listing: {e}")))?;

        Ok(data
            .files
            .into_iter()
            .map(|(handle, value)| node_from_listing(handle, &value))
            .collect())
    }

    async fn download(
        &self,
        session: &Session,
        remote_id: &str,
        dest: &Path,
    ) -> Result<u64, StorageError> {
        let response = self
            .client
            .get(self.content_url(remote_id)?)
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(network_error)?;

        match response.status().as_u16() {
            401 => return Err(StorageError::Unauthorized),
            404 => return Err(StorageError::NotFound(remote_id.to_string())),
            s if !(200..300).contains(&s) => return Err(Self::status_error(response).await),
            _ => {}
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(network_error)?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    async fn logout(&self, session: &Session) -> Result<(), StorageError> {
        let response = self
            .client
            .delete(self.endpoint("v1/session")?)
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(network_error)?;

        if response.status().is_success() || response.status().as_u16() == 401 {
            Ok(())
        } else {
            Err(Self::status_error(response).await)
        }
    }
}
