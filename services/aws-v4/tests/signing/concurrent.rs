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
use http::header;
use pretty_assertions::assert_eq;
use sigv4_aws_v4::{Credential, SigningOutput};
use std::thread;

fn request(idx: usize) -> http::Request<Vec<u8>> {
    http::Request::put(format!("http://host.foo.com/object-{idx}?part={idx}"))
        .header(header::DATE, "Mon, 09 Sep 2011 23:36:00 GMT")
        .body(format!("content of {idx}").into_bytes())
        .unwrap()
}

fn credential(idx: usize) -> Credential {
    // Two secrets so threads race on both hits and misses.
    if idx % 2 == 0 {
        suite_credential()
    } else {
        Credential::new("AKIDEXAMPLE", "another-secret").with_session_token("token")
    }
}

#[test]
fn test_concurrent_signing_matches_sequential() {
    init_logger();

    let expected: Vec<SigningOutput> = (0..16)
        .map(|idx| {
            suite_signer()
                .sign(&mut request(idx), &credential(idx))
                .unwrap()
        })
        .collect();

    let signer = suite_signer();
    let actual: Vec<SigningOutput> = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|idx| {
                let signer = &signer;
                s.spawn(move || signer.sign(&mut request(idx), &credential(idx)).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(actual, expected);
    // One date, one region, one service and two secrets.
    assert_eq!(signer.signing_key_cache().len(), 8);
}
