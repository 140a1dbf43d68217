//! services/api/src/adapters/blob.rs
//!
//! HTTP client for the external blob upload gateway. The gateway issues
//! signed, single-use upload slots, redeems upload tokens into durable file
//! references, and serves the uploaded bytes back over the returned URL.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use article_simplifier_core::domain::{FileAttachment, UploadSlot};
use article_simplifier_core::ports::{BlobGateway, PortError, PortResult};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Deserialize)]
struct UploadSlotBody {
    url: String,
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveUploadBody<'a> {
    file_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentBody {
    url: String,
    file_name: String,
    content_type: String,
    byte_size: i64,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A gateway adapter that implements the `BlobGateway` port over HTTP.
#[derive(Clone)]
pub struct HttpBlobGateway {
    client: Client,
    base_url: String,
}

impl HttpBlobGateway {
    /// Creates a new `HttpBlobGateway` rooted at the gateway's base URL.
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn gateway_error(e: reqwest::Error) -> PortError {
    PortError::Unexpected(format!("blob gateway request failed: {e}"))
}

//=========================================================================================
// `BlobGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl BlobGateway for HttpBlobGateway {
    async fn issue_upload_slot(&self) -> PortResult<UploadSlot> {
        let body: UploadSlotBody = self
            .client
            .post(format!("{}/uploads", self.base_url))
            .send()
            .await
            .map_err(gateway_error)?
            .error_for_status()
            .map_err(gateway_error)?
            .json()
            .await
            .map_err(gateway_error)?;

        Ok(UploadSlot {
            upload_url: body.url,
            upload_token: body.token,
        })
    }

    async fn resolve_upload(&self, token: &str, file_name: &str) -> PortResult<FileAttachment> {
        let response = self
            .client
            .post(format!("{}/uploads/{token}/resolve", self.base_url))
            .json(&ResolveUploadBody { file_name })
            .send()
            .await
            .map_err(gateway_error)?;

        // A token the gateway does not recognize (or has already redeemed)
        // comes back as 404 and must surface as NotFound, not a server fault.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PortError::NotFound(format!("upload token {token} unknown")));
        }

        let body: AttachmentBody = response
            .error_for_status()
            .map_err(gateway_error)?
            .json()
            .await
            .map_err(gateway_error)?;

        Ok(FileAttachment {
            url: body.url,
            file_name: body.file_name,
            content_type: body.content_type,
            byte_size: body.byte_size,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> PortResult<Bytes> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(gateway_error)?
            .error_for_status()
            .map_err(gateway_error)?
            .bytes()
            .await
            .map_err(gateway_error)
    }
}
