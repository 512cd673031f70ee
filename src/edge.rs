use std::collections::BTreeMap;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dispatch::JobDispatcher;
use crate::foundation::error::{AvatrError, AvatrResult};
use crate::keys::mint_key;
use crate::schema::AvatarRequest;
use crate::store::ObjectStore;

/// Incoming edge request envelope. The body payload arrives base64-encoded.
#[derive(Clone, Debug, Deserialize)]
pub struct EdgeRequest {
    #[serde(default)]
    pub uri: String,
    pub body: Option<EdgeBody>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EdgeBody {
    pub data: String,
}

/// Outgoing edge response envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeResponse {
    pub status: u16,
    #[serde(rename = "statusDescription")]
    pub status_description: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl EdgeResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status: 200,
            status_description: "OK".to_string(),
            headers: BTreeMap::new(),
            body: Some(body),
        }
    }

    pub fn bad_request() -> Self {
        Self {
            status: 400,
            status_description: "Bad Request".to_string(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn server_error() -> Self {
        Self {
            status: 500,
            status_description: "Internal Server Error".to_string(),
            headers: BTreeMap::new(),
            body: None,
        }
    }
}

/// Validate a request, mint a key, and dispatch the job.
///
/// Returns immediately with the minted key; rendering happens asynchronously
/// and the asset appears at the key eventually. Any validation failure is a
/// 400 before anything touches the store or the dispatcher; mint exhaustion
/// and dispatch failure are 500s.
pub async fn handle(
    req: &EdgeRequest,
    store: &dyn ObjectStore,
    dispatcher: &dyn JobDispatcher,
) -> EdgeResponse {
    let request = match decode_request(req) {
        Ok(r) => r,
        Err(err) => {
            debug!(uri = %req.uri, error = %err, "rejected avatar request");
            return EdgeResponse::bad_request();
        }
    };

    let key = match mint_key(store).await {
        Ok(k) => k,
        Err(err) => {
            warn!(error = %err, "key minting failed");
            return EdgeResponse::server_error();
        }
    };

    if let Err(err) = dispatcher.invoke_async(request.into_job(key.clone())).await {
        warn!(%key, error = %err, "job dispatch failed");
        return EdgeResponse::server_error();
    }

    info!(%key, "avatar job dispatched");
    EdgeResponse::ok(key)
}

fn decode_request(req: &EdgeRequest) -> AvatrResult<AvatarRequest> {
    let body = req
        .body
        .as_ref()
        .ok_or_else(|| AvatrError::validation("request has no body"))?;
    let raw = base64::engine::general_purpose::STANDARD
        .decode(&body.data)
        .map_err(|e| AvatrError::validation(format!("body is not valid base64: {e}")))?;
    AvatarRequest::from_slice(&raw)
}
