// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! AWS Signature Version 4 for JSON 1.1 `POST /` requests.
//!
//! The canonical request always has path `/`, an empty query string and the
//! signed header set `content-type;host;x-amz-date[;x-amz-security-token];x-amz-target`.

use chrono::{DateTime, Utc};
use hex::encode as hex_encode;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::ServiceError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub(crate) const SERVICE: &str = "logs";
pub(crate) const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Headers produced by signing, to be attached to the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Signature {
    pub amz_date: String,
    pub authorization: String,
    pub security_token: Option<String>,
}

/// Inputs that identify a single request.
pub(crate) struct SigningRequest<'a> {
    /// `Host` header value, including a non-default port.
    pub host: &'a str,
    /// Full `X-Amz-Target` value.
    pub target: &'a str,
    pub body: &'a [u8],
}

pub(crate) fn sign(
    credentials: &Credentials,
    region: &str,
    request: &SigningRequest<'_>,
    now: DateTime<Utc>,
) -> Result<Signature, ServiceError> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{date}/{region}/{SERVICE}/aws4_request");

    let mut headers: Vec<(&str, &str)> = vec![
        ("content-type", CONTENT_TYPE),
        ("host", request.host),
        ("x-amz-date", amz_date.as_str()),
        ("x-amz-target", request.target),
    ];
    if let Some(token) = credentials.session_token.as_deref() {
        headers.push(("x-amz-security-token", token));
    }
    headers.sort_by(|a, b| a.0.cmp(b.0));

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{}\n", value.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "POST\n/\n\n{canonical_headers}\n{signed_headers}\n{}",
        sha256_hex(request.body)
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let key = signing_key(&credentials.secret_access_key, &date, region, SERVICE)?;
    let signature = hex_encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    let credential = format!("{}/{scope}", credentials.access_key_id);
    Ok(Signature {
        authorization: format!(
            "{ALGORITHM} Credential={credential}, \
             SignedHeaders={signed_headers}, Signature={signature}"
        ),
        amz_date,
        security_token: credentials.session_token.clone(),
    })
}

fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, ServiceError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ServiceError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ServiceError::InvalidConfig(format!("unusable signing key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(hasher.finalize())
}
