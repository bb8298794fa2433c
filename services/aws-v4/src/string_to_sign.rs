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

use crate::constants::AWS4_HMAC_SHA256;
use crate::scope::CredentialScope;
use sigv4_core::hash::hex_sha256;
use sigv4_core::time::{format_iso8601, DateTime};
use sigv4_core::Result;
use std::fmt::Write;

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(
    now: DateTime,
    scope: &CredentialScope,
    canonical_request: &str,
) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{}", format_iso8601(now))?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}
