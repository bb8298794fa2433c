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

use crate::canonical::{canonical_request_string, canonicalize_header};
use crate::constants::AWS4_HMAC_SHA256;
use crate::scope::{resolve_service_region, CredentialScope};
use crate::signing_key::SigningKeyCache;
use crate::string_to_sign::string_to_sign;
use crate::{Config, Credential};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use sigv4_core::hash::hex_hmac_sha256;
use sigv4_core::time::{format_iso8601, format_rfc1123, Clock, SystemClock};
use sigv4_core::{Error, Result, SignRequest, SigningCredential, SigningRequest};
use std::sync::Arc;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The signing time is the request's `x-amz-date` if present, else its
/// `date` header (RFC 1123, signed as is), else the clock, in which case
/// `x-amz-date` is added.
///
/// Signing also sets `x-amz-security-token` to the credential's session
/// token (removing a stale one when there is none), adds `host` if absent
/// and sets `Authorization`. Nothing is changed when signing fails.
#[derive(Debug)]
pub struct RequestSigner {
    service: Option<String>,
    region: Option<String>,

    clock: Arc<dyn Clock>,
    cache: Arc<SigningKeyCache>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl RequestSigner {
    /// Create a new AWS V4 signer from config.
    pub fn new(config: Config) -> Self {
        Self {
            service: config.service,
            region: config.region,

            clock: Arc::new(SystemClock),
            cache: Arc::new(SigningKeyCache::new(config.signing_key_cache_capacity)),
        }
    }

    /// Specify the clock used to take the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Share a signing key cache with other signers.
    pub fn with_signing_key_cache(mut self, cache: Arc<SigningKeyCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the service name used in the credential scope instead of parsing
    /// it from the request host.
    pub fn set_service_name(&mut self, service: &str) {
        self.service = Some(service.to_string());
    }

    /// Set the region name used in the credential scope instead of parsing
    /// it from the request host.
    pub fn set_region_name(&mut self, region: &str) {
        self.region = Some(region.to_string());
    }

    /// The explicitly set service name, if any.
    pub fn service_name(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// The explicitly set region name, if any.
    pub fn region_name(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The signing key cache used by this signer.
    pub fn signing_key_cache(&self) -> &Arc<SigningKeyCache> {
        &self.cache
    }

    /// Sign the request in place.
    pub fn sign<B: AsRef<[u8]>>(
        &self,
        req: &mut http::Request<B>,
        cred: &Credential,
    ) -> Result<SigningOutput> {
        let signing_req = SigningRequest::new(req.method(), req.uri(), req.headers())?;
        let (signing_req, output) = self.calculate(signing_req, req.body().as_ref(), cred)?;

        *req.headers_mut() = signing_req.into_headers();
        Ok(output)
    }

    /// Sign request parts in place, `body` is the payload sent with them.
    pub fn sign_parts(
        &self,
        parts: &mut Parts,
        body: &[u8],
        cred: &Credential,
    ) -> Result<SigningOutput> {
        let signing_req = SigningRequest::build(parts)?;
        let (signing_req, output) = self.calculate(signing_req, body, cred)?;

        signing_req.apply(parts);
        Ok(output)
    }

    fn calculate(
        &self,
        mut signing_req: SigningRequest,
        body: &[u8],
        cred: &Credential,
    ) -> Result<(SigningRequest, SigningOutput)> {
        if !cred.is_valid() {
            return Err(Error::missing_credentials(
                "access key id and secret access key must not be empty",
            ));
        }

        let host = signing_req.host()?;
        let (service, region) = resolve_service_region(
            self.service.as_deref(),
            self.region.as_deref(),
            host.as_deref(),
        )?;

        // canonicalize context
        let now = canonicalize_header(&mut signing_req, cred, self.clock.as_ref())?;
        let creq = canonical_request_string(&signing_req, body)?;
        debug!("calculated canonical request: {}", creq.canonical_request);

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = CredentialScope::new(now, &region, &service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &creq.canonical_request)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = self.cache.derive_signing_key(
            &cred.secret_access_key,
            &scope.date,
            &scope.region,
            &scope.service,
        );
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            AWS4_HMAC_SHA256, cred.access_key_id, scope, creq.signed_headers, signature
        ))?;
        authorization.set_sensitive(true);
        signing_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        let output = SigningOutput {
            timestamp: format_iso8601(now),
            http_date: format_rfc1123(now),
            region: scope.region.clone(),
            service: scope.service.clone(),
            scope: scope.to_string(),
            canonical_request: creq.canonical_request,
            signed_headers: creq.signed_headers,
            payload_hash: creq.payload_hash,
            string_to_sign,
            signature,
        };
        Ok((signing_req, output))
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;
    type Output = SigningOutput;

    fn sign_request(
        &self,
        req: &mut Parts,
        body: &[u8],
        credential: &Self::Credential,
    ) -> Result<SigningOutput> {
        self.sign_parts(req, body, credential)
    }
}

/// Everything calculated while signing a request.
///
/// Returned for inspection only: none of it is attached to the request
/// besides what ends up in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    /// Signing time in compact ISO 8601: `20110909T233600Z`.
    pub timestamp: String,
    /// Signing time in RFC 1123: `Fri, 09 Sep 2011 23:36:00 GMT`.
    pub http_date: String,
    /// Resolved region.
    pub region: String,
    /// Resolved service.
    pub service: String,
    /// Credential scope: `20110909/us-east-1/host/aws4_request`.
    pub scope: String,
    /// The canonical request.
    pub canonical_request: String,
    /// Signed headers: `date;host`.
    pub signed_headers: String,
    /// Payload hash used in the canonical request.
    pub payload_hash: String,
    /// The string to sign.
    pub string_to_sign: String,
    /// Hex encoded signature.
    pub signature: String,
}
