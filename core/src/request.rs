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

use crate::{Error, Result};
use http::header::HeaderName;
use http::uri::Authority;
use http::HeaderMap;
use http::Method;
use http::Uri;

/// Signing context for request.
///
/// Built from [`http::request::Parts`] without touching them: headers are
/// copied in, mutated while signing, and only written back by
/// [`SigningRequest::apply`] once signing has succeeded.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP authority, absent for origin-form URIs like `/path?query`.
    pub authority: Option<Authority>,
    /// HTTP path, still percent-encoded.
    pub path: String,
    /// HTTP query parameters, percent-decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from the request's method, uri and headers.
    pub fn new(method: &Method, uri: &Uri, headers: &HeaderMap) -> Result<Self> {
        let query = match uri.query() {
            Some(q) => parse_query(q)?,
            None => Vec::new(),
        };

        Ok(SigningRequest {
            method: method.clone(),
            authority: uri.authority().cloned(),
            path: uri.path().to_string(),
            query,
            headers: headers.clone(),
        })
    }

    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &http::request::Parts) -> Result<Self> {
        Self::new(&parts.method, &parts.uri, &parts.headers)
    }

    /// Apply the signed headers back to http::request::Parts.
    ///
    /// Method and URI are never changed by header based signing, so only
    /// headers are returned.
    pub fn apply(self, parts: &mut http::request::Parts) {
        parts.headers = self.into_headers();
    }

    /// Consume the signing context, returning its headers.
    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }

    /// Host of this request: the `host` header if present, otherwise
    /// [`SigningRequest::authority_host`].
    pub fn host(&self) -> Result<Option<String>> {
        if let Some(v) = self.headers.get(http::header::HOST) {
            return Ok(Some(v.to_str()?.to_string()));
        }
        Ok(self.authority_host())
    }

    /// `host[:port]` of the URI authority, without any userinfo.
    pub fn authority_host(&self) -> Option<String> {
        self.authority.as_ref().map(|a| match a.port_u16() {
            Some(port) => format!("{}:{port}", a.host()),
            None => a.host().to_string(),
        })
    }

    /// Get the path percent decoded.
    ///
    /// Returns an error if the path contains malformed percent-encoding.
    pub fn path_percent_decoded(&self) -> Result<String> {
        percent_decode(&self.path)
    }

    /// Get header value by name.
    ///
    /// Returns `None` if header not found.
    #[inline]
    pub fn header_get(&self, key: &str) -> Result<Option<&str>> {
        match self.headers.get(key) {
            Some(v) => Ok(Some(v.to_str()?)),
            None => Ok(None),
        }
    }

    /// Normalize header value.
    ///
    /// Leading and trailing whitespace is removed and every internal run of
    /// whitespace becomes a single space.
    pub fn header_value_normalize(v: &str) -> String {
        let mut s = String::with_capacity(v.len());
        for (idx, word) in v.split_ascii_whitespace().enumerate() {
            if idx != 0 {
                s.push(' ');
            }
            s.push_str(word);
        }
        s
    }

    /// Collect headers as `(name, value)` sorted by name.
    ///
    /// Names are lowercase, repeated headers are joined by `,` in insertion
    /// order and every value is normalized. Headers rejected by `include` are
    /// skipped.
    pub fn header_to_vec_sorted(
        &self,
        include: impl Fn(&HeaderName) -> bool,
    ) -> Result<Vec<(String, String)>> {
        let mut headers = Vec::with_capacity(self.headers.keys_len());
        for name in self.headers.keys().filter(|k| include(*k)) {
            let mut value = String::new();
            for (idx, v) in self.headers.get_all(name).iter().enumerate() {
                if idx != 0 {
                    value.push(',');
                }
                value.push_str(&Self::header_value_normalize(v.to_str()?));
            }
            headers.push((name.as_str().to_lowercase(), value));
        }
        headers.sort_unstable();

        Ok(headers)
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(headers: &[(String, String)], sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        for (idx, (k, v)) in headers.iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(k);
            s.push_str(sep);
            s.push_str(v);
        }

        s
    }
}

/// Parse a raw query string into decoded pairs.
///
/// A parameter without `=` yields an empty value; empty segments (`a&&b`)
/// are skipped.
pub fn parse_query(query: &str) -> Result<Vec<(String, String)>> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((percent_decode(k)?, percent_decode(v)?))
        })
        .collect()
}

/// Strictly percent decode input.
///
/// Unlike [`percent_encoding::percent_decode_str`], a `%` that is not
/// followed by two hex digits is an error, as is a result that is not UTF-8.
pub fn percent_decode(input: &str) -> Result<String> {
    let bs = input.as_bytes();
    for (idx, _) in bs.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let valid = bs
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(Error::malformed_request(format!(
                "invalid percent-encoding at offset {idx} in {input:?}"
            )));
        }
    }

    percent_encoding::percent_decode_str(input)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|e| {
            Error::malformed_request(format!("percent-decoded {input:?} is not utf-8"))
                .with_source(e)
        })
}
