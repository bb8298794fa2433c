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

use crate::constants::DEFAULT_SIGNING_KEY_CACHE_CAPACITY;

/// Config for the SigV4 request signer.
#[derive(Clone, Debug)]
pub struct Config {
    /// `service` will be used as the signing service name:
    ///
    /// - this field if it's `is_some`
    /// - otherwise parsed from the request host: `<service>.<region>.amazonaws.com`
    pub service: Option<String>,
    /// `region` will be used as the signing region:
    ///
    /// - this field if it's `is_some`
    /// - otherwise parsed from the request host: `<service>.<region>.amazonaws.com`
    pub region: Option<String>,
    /// Maximum number of derived key stages kept by the signing key cache.
    ///
    /// Each distinct (secret, date, region, service) chain takes up to four
    /// entries. Default to [`DEFAULT_SIGNING_KEY_CACHE_CAPACITY`].
    pub signing_key_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: None,
            region: None,
            signing_key_cache_capacity: DEFAULT_SIGNING_KEY_CACHE_CAPACITY,
        }
    }
}

impl Config {
    /// Set the signing service name.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Set the signing key cache capacity.
    pub fn with_signing_key_cache_capacity(mut self, capacity: usize) -> Self {
        self.signing_key_cache_capacity = capacity;
        self
    }
}
