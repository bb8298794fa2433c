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

use std::fmt;
use thiserror::Error;

/// The error type for signing operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request cannot be signed: invalid percent-encoding in path or query,
    /// unparseable `x-amz-date`, or a host that region/service can't be
    /// derived from.
    MalformedRequest,

    /// Access key or secret key is empty.
    MissingCredentials,

    /// The injected clock failed to produce a timestamp.
    ClockUnavailable,

    /// Unexpected errors (formatting failures and the like).
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// Convenience constructors
impl Error {
    /// Create a malformed request error
    pub fn malformed_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedRequest, message)
    }

    /// Create a missing credentials error
    pub fn missing_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredentials, message)
    }

    /// Create a clock unavailable error
    pub fn clock_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClockUnavailable, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedRequest => write!(f, "malformed request"),
            ErrorKind::MissingCredentials => write!(f, "missing credentials"),
            ErrorKind::ClockUnavailable => write!(f, "clock unavailable"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::malformed_request(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
