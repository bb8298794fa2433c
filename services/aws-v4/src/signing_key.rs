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

use crate::constants::{AWS4_REQUEST, DEFAULT_SIGNING_KEY_CACHE_CAPACITY};
use log::debug;
use sigv4_core::hash::{hex_sha256, hmac_sha256};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Mutex;

/// Cache of derived SigV4 signing keys.
///
/// A signing key is derived through four HMAC stages:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// Every stage is cached on its own under the inputs consumed so far, so
/// the `kDate` of a secret is shared by all regions and services signed on
/// that date.
///
/// The cache holds at most `capacity` stages. When a derivation would grow
/// it beyond that, the whole cache is cleared and only the current chain is
/// kept. A capacity below four disables caching.
pub struct SigningKeyCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<StageKey, Vec<u8>>,
    computed: usize,
}

/// Inputs consumed up to a stage, kept apart so that no two distinct
/// inputs can map onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StageKey {
    fingerprint: String,
    date: String,
    region: Option<String>,
    service: Option<String>,
    signing: bool,
}

impl Default for SigningKeyCache {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNING_KEY_CACHE_CAPACITY)
    }
}

impl Debug for SigningKeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl SigningKeyCache {
    /// Create a new cache holding at most `capacity` key stages.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::default(),
        }
    }

    /// Derive the signing key for `(secret, date, region, service)`.
    ///
    /// `date` is the short form: `20110909`.
    pub fn derive_signing_key(
        &self,
        secret: &str,
        date: &str,
        region: &str,
        service: &str,
    ) -> Vec<u8> {
        // Never keep the raw secret around as a map key.
        let fingerprint = hex_sha256(secret.as_bytes());
        let stage = |r: Option<&str>, s: Option<&str>, signing: bool| StageKey {
            fingerprint: fingerprint.clone(),
            date: date.to_string(),
            region: r.map(str::to_string),
            service: s.map(str::to_string),
            signing,
        };
        let stages = [
            (stage(None, None, false), date),
            (stage(Some(region), None, false), region),
            (stage(Some(region), Some(service), false), service),
            (stage(Some(region), Some(service), true), AWS4_REQUEST),
        ];

        let mut state = self.state.lock().expect("lock poisoned");

        let mut key = format!("AWS4{secret}").into_bytes();
        let mut chain = Vec::with_capacity(stages.len());
        let mut missing = 0;
        for (cache_key, input) in stages.iter() {
            key = match state.entries.get(cache_key) {
                Some(v) => v.clone(),
                None => {
                    missing += 1;
                    hmac_sha256(&key, input.as_bytes())
                }
            };
            chain.push(key.clone());
        }
        state.computed += missing;

        if missing == 0 || self.capacity < stages.len() {
            return key;
        }

        if state.entries.len() + missing > self.capacity {
            debug!(
                "signing key cache is full with {} entries, clearing",
                state.entries.len()
            );
            state.entries.clear();
        }
        for ((cache_key, _), value) in stages.into_iter().zip(chain) {
            state.entries.insert(cache_key, value);
        }

        key
    }

    /// Maximum number of key stages kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of key stages currently cached.
    pub fn len(&self) -> usize {
        self.state.lock().expect("lock poisoned").entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of HMAC stages computed by this cache so far.
    ///
    /// Stays unchanged across a fully cached derivation.
    pub fn computed_stages(&self) -> usize {
        self.state.lock().expect("lock poisoned").computed
    }

    /// Drop every cached stage.
    pub fn clear(&self) {
        self.state.lock().expect("lock poisoned").entries.clear();
    }
}
