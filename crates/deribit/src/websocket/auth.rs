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

//! Authentication handshake types and token bookkeeping for Deribit WebSocket sessions.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::common::credential::Credential;

/// Grant type used for the session handshake.
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Authentication request parameters for the `client_credentials` grant.
///
/// Borrows from the [`Credential`] so the secret is never copied out of its zeroized storage.
#[derive(Clone, Copy, Serialize)]
pub struct DeribitAuthParams<'a> {
    /// Grant type (always `client_credentials`).
    pub grant_type: &'static str,
    /// Client ID (API key).
    pub client_id: &'a str,
    /// Client secret (API secret).
    pub client_secret: &'a str,
}

impl Debug for DeribitAuthParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(DeribitAuthParams))
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl<'a> DeribitAuthParams<'a> {
    /// Creates `client_credentials` parameters borrowing from a credential.
    #[must_use]
    pub fn client_credentials(credential: &'a Credential) -> Self {
        Self {
            grant_type: GRANT_TYPE_CLIENT_CREDENTIALS,
            client_id: credential.client_id(),
            client_secret: credential.client_secret(),
        }
    }
}

/// Authentication response result.
#[derive(Debug, Clone, Deserialize)]
pub struct DeribitAuthResult {
    /// Access token.
    pub access_token: String,
    /// Token expiration time in seconds.
    pub expires_in: u64,
    /// Refresh token.
    pub refresh_token: String,
    /// Granted scope.
    pub scope: String,
    /// Token type (bearer).
    #[serde(default)]
    pub token_type: String,
    /// Enabled features.
    #[serde(default)]
    pub enabled_features: Vec<String>,
}

/// Tokens granted by a successful handshake.
///
/// Deribit authorizes the connection itself, so private calls on the same session do not need
/// to carry the access token. The state is kept for inspection only and is never refreshed.
#[derive(Clone)]
pub struct AuthState {
    /// Access token for API requests.
    pub access_token: String,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: String,
    /// Token expiration time in seconds from authentication.
    pub expires_in: u64,
    /// Timestamp when tokens were obtained (Unix milliseconds).
    pub obtained_at: u64,
    /// Scope granted for this session.
    pub scope: String,
}

impl Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(AuthState))
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .field("scope", &self.scope)
            .finish()
    }
}

impl AuthState {
    /// Creates a new [`AuthState`] from an authentication result.
    #[must_use]
    pub fn from_auth_result(result: &DeribitAuthResult, obtained_at: u64) -> Self {
        Self {
            access_token: result.access_token.clone(),
            refresh_token: result.refresh_token.clone(),
            expires_in: result.expires_in,
            obtained_at,
            scope: result.scope.clone(),
        }
    }

    /// Returns the expiration timestamp in Unix milliseconds.
    #[must_use]
    pub fn expires_at_ms(&self) -> u64 {
        self.obtained_at
            .saturating_add(self.expires_in.saturating_mul(1000))
    }

    /// Returns whether the token is expired or within 60 seconds of expiry.
    #[must_use]
    pub fn is_expired(&self, current_time_ms: u64) -> bool {
        current_time_ms.saturating_add(60_000) >= self.expires_at_ms()
    }

    /// Returns whether the granted scope contains `token` (e.g. `trade:read_write`).
    #[must_use]
    pub fn has_scope(&self, token: &str) -> bool {
        self.scope.split_whitespace().any(|s| s == token)
    }
}
