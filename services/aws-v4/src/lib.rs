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

//! AWS SigV4 request signer.
//!
//! Signs `http` requests in place with the `Authorization` header described in
//! [Signature Version 4](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html).
//!
//! ```
//! use sigv4_aws_v4::{Config, Credential, RequestSigner};
//!
//! # fn main() -> sigv4_core::Result<()> {
//! let signer = RequestSigner::new(Config::default());
//! let cred = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! let mut req = http::Request::get("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08")
//!     .body(Vec::<u8>::new())
//!     .expect("request must be valid");
//! let output = signer.sign(&mut req, &cred)?;
//!
//! assert_eq!(output.service, "iam");
//! assert_eq!(output.region, "us-east-1");
//! assert!(req.headers().contains_key("authorization"));
//! # Ok(())
//! # }
//! ```

pub mod constants;

mod config;
pub use config::Config;
mod credential;
pub use credential::Credential;

pub mod canonical;
pub use canonical::CanonicalRequest;
pub mod scope;
pub use scope::CredentialScope;
mod string_to_sign;
pub use string_to_sign::string_to_sign;
mod signing_key;
pub use signing_key::SigningKeyCache;

mod sign_request;
pub use sign_request::RequestSigner;
pub use sign_request::SigningOutput;
