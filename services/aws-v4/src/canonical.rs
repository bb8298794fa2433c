// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Canonical request of SigV4.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use http::header;
use http::HeaderValue;
use percent_encoding::utf8_percent_encode;
use sigv4_core::hash::hex_sha256;
use sigv4_core::time::{format_iso8601, parse_iso8601, parse_rfc1123, Clock, DateTime};
use sigv4_core::{Error, Result, SigningRequest};
use std::fmt::Write;

/// Canonical request together with the pieces the signer reuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// The full canonical request string.
    pub canonical_request: String,
    /// Signed headers: `host;x-amz-date`.
    pub signed_headers: String,
    /// Hex encoded SHA256 of the payload, or the `x-amz-content-sha256` value.
    pub payload_hash: String,
}

/// Insert headers required for signing and return the signing time.
///
/// - `host` from the URI authority if absent
/// - the signing time is taken from `x-amz-date` if present, otherwise from a
///   legacy `date` header (signed as is), otherwise from `clock`, in which
///   case `x-amz-date` is inserted
/// - `x-amz-security-token` is set to the credential's session token, or
///   removed if the credential has none
pub fn canonicalize_header(
    req: &mut SigningRequest,
    cred: &Credential,
    clock: &dyn Clock,
) -> Result<DateTime> {
    // Insert HOST header if not present.
    if req.headers.get(header::HOST).is_none() {
        if let Some(host) = req.authority_host() {
            req.headers.insert(header::HOST, HeaderValue::try_from(host)?);
        }
    }

    let now = if let Some(v) = req.header_get(X_AMZ_DATE)? {
        parse_iso8601(v.trim())?
    } else if let Some(v) = req.header_get(header::DATE.as_str())? {
        parse_rfc1123(v)?
    } else {
        let now = clock.now().map_err(|e| {
            Error::clock_unavailable("failed to read the signing time").with_source(e)
        })?;
        req.headers
            .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);
        now
    };

    match &cred.session_token {
        Some(token) => {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to valid leaking.
            value.set_sensitive(true);

            req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
        // A token left by an earlier signing must not be signed again.
        None => {
            req.headers.remove(X_AMZ_SECURITY_TOKEN);
        }
    }

    Ok(now)
}

/// Build the canonical request.
///
/// ```text
/// GET
/// /
/// foo=Zoo&foo=aha
/// date:Mon, 09 Sep 2011 23:36:00 GMT
/// host:host.foo.com
///
/// date;host
/// e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
/// ```
pub fn canonical_request_string(req: &SigningRequest, body: &[u8]) -> Result<CanonicalRequest> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method)?;
    // Insert encoded path
    writeln!(f, "{}", canonical_uri(req)?)?;
    // Insert query
    writeln!(f, "{}", canonical_query(&req.query))?;

    // Insert signed headers
    let headers = req.header_to_vec_sorted(|k| *k != header::AUTHORIZATION)?;
    for (name, value) in headers.iter() {
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");
    writeln!(f, "{signed_headers}")?;

    let payload_hash = match req.header_get(X_AMZ_CONTENT_SHA_256)? {
        Some(v) => v.to_string(),
        None => hex_sha256(body),
    };
    write!(f, "{payload_hash}")?;

    Ok(CanonicalRequest {
        canonical_request: f,
        signed_headers,
        payload_hash,
    })
}

fn canonical_uri(req: &SigningRequest) -> Result<String> {
    if req.path.is_empty() {
        return Ok("/".to_string());
    }

    let path = req.path_percent_decoded()?;
    Ok(utf8_percent_encode(&path, &AWS_URI_ENCODE_SET).to_string())
}

fn canonical_query(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    // Sort by encoded name, then by encoded value.
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
