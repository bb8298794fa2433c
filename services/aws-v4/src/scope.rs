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

use crate::constants::{AWS4_REQUEST, GLOBAL_ENDPOINT_REGION};
use sigv4_core::time::{format_date, DateTime};
use sigv4_core::{Error, Result};
use std::fmt::{Display, Formatter};

const AMAZONAWS_SUFFIXES: [&str; 2] = [".amazonaws.com", ".amazonaws.com.cn"];

/// Credential scope binds a signature to a date, region and service.
///
/// Displayed as `20110909/us-east-1/host/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    /// Short date: `20110909`.
    pub date: String,
    /// Lowercase region.
    pub region: String,
    /// Lowercase service.
    pub service: String,
}

impl CredentialScope {
    /// Create a scope for the signing time, region and service.
    pub fn new(time: DateTime, region: &str, service: &str) -> Self {
        Self {
            date: format_date(time),
            region: region.to_lowercase(),
            service: service.to_lowercase(),
        }
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.region, self.service, AWS4_REQUEST
        )
    }
}

/// Resolve `(service, region)` from the overrides, falling back to the host.
///
/// The host is only parsed when at least one of them is missing.
pub fn resolve_service_region(
    service: Option<&str>,
    region: Option<&str>,
    host: Option<&str>,
) -> Result<(String, String)> {
    if let (Some(service), Some(region)) = (service, region) {
        return Ok((service.to_string(), region.to_string()));
    }

    let host = host.ok_or_else(|| {
        Error::malformed_request(
            "request has no host to resolve service and region from, set them explicitly",
        )
    })?;
    let (host_service, host_region) = parse_host(host)?;

    Ok((
        service.map(str::to_string).unwrap_or(host_service),
        region.map(str::to_string).unwrap_or(host_region),
    ))
}

/// Parse `(service, region)` from an AWS endpoint host.
///
/// - `<service>.<region>.amazonaws.com` gives `(service, region)`
/// - `<service>.amazonaws.com` is a global endpoint in `us-east-1`
///
/// Ports are ignored and `.amazonaws.com.cn` is accepted as well.
pub fn parse_host(host: &str) -> Result<(String, String)> {
    let name = match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    };
    let name = name.trim_end_matches('.').to_lowercase();

    let prefix = AMAZONAWS_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .ok_or_else(|| {
            Error::malformed_request(format!(
                "host {host} is not an AWS endpoint, set service and region explicitly"
            ))
        })?;

    let labels: Vec<&str> = prefix.split('.').collect();
    match labels.as_slice() {
        [service] if !service.is_empty() => {
            Ok((service.to_string(), GLOBAL_ENDPOINT_REGION.to_string()))
        }
        [service, region] if !service.is_empty() && !region.is_empty() => {
            Ok((service.to_string(), region.to_string()))
        }
        _ => Err(Error::malformed_request(format!(
            "host {host} is not in <service>.<region>.amazonaws.com form"
        ))),
    }
}
