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

use crate::Result;
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential carries everything needed to sign.
    ///
    /// Expiry is the caller's concern: implementations should not reject
    /// a credential only because it has expired.
    fn is_valid(&self) -> bool;
}

/// SignRequest is the trait used by signer to sign the request.
///
/// Signing is a synchronous computation: implementations must not perform
/// I/O or block.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Intermediate artifacts produced while signing, returned to the caller
    /// for inspection.
    type Output;

    /// Sign the request in place.
    ///
    /// `body` is the payload that will be sent with `req`. On error `req`
    /// must be left unmodified.
    fn sign_request(
        &self,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: &Self::Credential,
    ) -> Result<Self::Output>;
}
