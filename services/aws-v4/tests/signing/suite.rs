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

use crate::{init_logger, suite_credential, suite_signer};
use anyhow::{anyhow, Result};
use http::header;
use pretty_assertions::assert_eq;
use sigv4_aws_v4::{Config, RequestSigner};
use sigv4_core::time::FixedClock;
use sigv4_core::ErrorKind;
use std::fs;
use std::path::PathBuf;
use test_case::test_case;

fn testdata(name: &str, ext: &str) -> Result<String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata/aws-sig-v4-test-suite")
        .join(format!("{name}.{ext}"));
    let content = fs::read_to_string(&path)
        .map_err(|e| anyhow!("read {} failed: {e}", path.display()))?;
    Ok(content.replace('\r', ""))
}

/// Parse a raw `.req` file:
///
/// ```text
/// POST /?foo=bar http/1.1
/// Date:Mon, 09 Sep 2011 23:36:00 GMT
/// Host:host.foo.com
///
/// <body>
/// ```
fn parse_request(raw: &str) -> Result<http::Request<Vec<u8>>> {
    let (head, body) = raw.split_once("\n\n").unwrap_or((raw, ""));
    let mut lines = head.lines();

    let request_line = lines.next().ok_or_else(|| anyhow!("empty request"))?;
    let mut parts = request_line.split(' ');
    let method = parts.next().ok_or_else(|| anyhow!("missing method"))?;
    let target = parts.next().ok_or_else(|| anyhow!("missing target"))?;

    let mut builder = http::Request::builder().method(method).uri(target);
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| anyhow!("invalid header line: {line}"))?;
        builder = builder.header(name, value);
    }

    Ok(builder.body(body.as_bytes().to_vec())?)
}

#[test_case("get-vanilla")]
#[test_case("get-vanilla-query-order-key-case")]
#[test_case("get-vanilla-query-order-value")]
#[test_case("get-vanilla-empty-query-key")]
#[test_case("get-space")]
#[test_case("get-utf8")]
#[test_case("get-header-key-duplicate")]
#[test_case("get-header-value-order")]
#[test_case("get-header-value-trim")]
#[test_case("post-header-key-case")]
#[test_case("post-header-key-sort")]
#[test_case("post-vanilla")]
#[test_case("post-vanilla-query")]
#[test_case("post-x-www-form-urlencoded")]
fn test_aws_sig_v4_suite(name: &str) -> Result<()> {
    init_logger();

    let mut req = parse_request(&testdata(name, "req")?)?;
    let output = suite_signer().sign(&mut req, &suite_credential())?;

    assert_eq!(output.canonical_request, testdata(name, "creq")?);
    assert_eq!(output.string_to_sign, testdata(name, "sts")?);
    assert_eq!(
        req.headers()[header::AUTHORIZATION].to_str()?,
        testdata(name, "authz")?
    );

    // Legacy `Date` headers are signed as is and give the signing time.
    assert!(req.headers().get("x-amz-date").is_none());
    Ok(())
}

#[test]
fn test_suite_is_deterministic() -> Result<()> {
    let signer = suite_signer();
    let raw = testdata("get-vanilla", "req")?;

    let mut first = parse_request(&raw)?;
    let mut second = parse_request(&raw)?;
    let a = signer.sign(&mut first, &suite_credential())?;
    let b = signer.sign(&mut second, &suite_credential())?;

    assert_eq!(a, b);
    assert_eq!(
        a.signature,
        "b27ccfbfa7df52a200ff74193ca6e32d4b48b8856fab7ebf1c595d0670a7e470"
    );
    assert_eq!(first.headers(), second.headers());
    Ok(())
}

#[test]
fn test_suite_host_needs_explicit_scope() -> Result<()> {
    let mut req = parse_request(&testdata("get-vanilla", "req")?)?;
    let before = req.headers().clone();

    let signer = RequestSigner::new(Config::default())
        .with_clock(FixedClock::new(crate::suite_time()));
    let err = signer.sign(&mut req, &suite_credential()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedRequest);
    assert_eq!(req.headers(), &before);
    Ok(())
}
