// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Deribit WebSocket client error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::common::{consts::DERIBIT_RETRYABLE_ERROR_CODES, rpc::DeribitJsonRpcError};

/// Error types for the Deribit WebSocket client.
///
/// Every layer returns these unchanged; nothing is retried or downgraded.
#[derive(Debug, Clone, Error)]
pub enum DeribitWsError {
    /// Transport-level failure: handshake refused, socket closed, read timeout, write failure.
    #[error("Connection error: {0}")]
    Connection(String),
    /// Inbound payload is not a well-formed JSON-RPC envelope, or a result has an
    /// unexpected shape.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The `public/auth` handshake was rejected by Deribit.
    #[error("Authentication error: {0}")]
    Authentication(DeribitJsonRpcError),
    /// Error returned by Deribit for a method call (JSON-RPC error response).
    #[error("Deribit error {code}: {message}")]
    DeribitError {
        /// The error code from Deribit.
        code: i64,
        /// The error message from Deribit.
        message: String,
        /// Additional error data from Deribit.
        data: Option<serde_json::Value>,
    },
    /// A caller-supplied parameter failed local validation. Nothing was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The session was closed.
    #[error("Not connected")]
    NotConnected,
}

impl DeribitWsError {
    /// Returns the upstream error code for [`Self::DeribitError`] and [`Self::Authentication`].
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::DeribitError { code, .. } => Some(*code),
            Self::Authentication(error) => Some(error.code),
            _ => None,
        }
    }

    /// Returns whether the error is a Deribit code that is usually transient.
    ///
    /// The client itself never retries; this is for callers that apply their own policy.
    #[must_use]
    pub fn is_retryable_code(&self) -> bool {
        matches!(
            self,
            Self::DeribitError { code, .. } if DERIBIT_RETRYABLE_ERROR_CODES.contains(code)
        )
    }
}

impl From<tungstenite::Error> for DeribitWsError {
    fn from(error: tungstenite::Error) -> Self {
        Self::Connection(error.to_string())
    }
}

impl From<serde_json::Error> for DeribitWsError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Result type alias for Deribit WebSocket operations.
pub type DeribitWsResult<T> = Result<T, DeribitWsError>;
