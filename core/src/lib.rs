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

//! Core components for signing HTTP requests.
//!
//! This crate provides the service-agnostic building blocks used by the
//! SigV4 signer: error types, hashing, time and clock handling, and the
//! mutable request view that signers work on.
//!
//! ## Overview
//!
//! - **SigningRequest**: a copy of the request's method, path, decoded query and headers.
//!   Signers mutate it freely and only write it back once signing succeeds.
//! - **Clock**: the injectable time source. [`time::SystemClock`] in production,
//!   [`time::FixedClock`] in tests.
//! - **Traits**: [`SigningCredential`] for credentials and [`SignRequest`] for signers.
//!
//! ## Example
//!
//! ```
//! use sigv4_core::{Result, SignRequest, SigningCredential, SigningRequest};
//! use http::request::Parts;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct BearerSigner;
//!
//! impl SignRequest for BearerSigner {
//!     type Credential = MyCredential;
//!     type Output = ();
//!
//!     fn sign_request(&self, req: &mut Parts, _: &[u8], cred: &MyCredential) -> Result<()> {
//!         let mut signed = SigningRequest::build(req)?;
//!         signed.headers.insert(
//!             http::header::AUTHORIZATION,
//!             format!("Bearer {}", cred.token).parse()?,
//!         );
//!         signed.apply(req);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let (mut parts, body) = http::Request::builder()
//!     .uri("https://example.com")
//!     .body(Vec::<u8>::new())
//!     .unwrap()
//!     .into_parts();
//! let cred = MyCredential { token: "token".to_string() };
//! BearerSigner.sign_request(&mut parts, &body, &cred)?;
//! assert_eq!(parts.headers["authorization"], "Bearer token");
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod api;
pub use api::{SignRequest, SigningCredential};
mod request;
pub use request::{parse_query, percent_decode, SigningRequest};
