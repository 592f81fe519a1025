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

//! Configuration for Deribit WebSocket sessions.

use crate::{
    common::{
        consts::{
            DERIBIT_API_KEY_ENV, DERIBIT_API_SECRET_ENV, DERIBIT_DEFAULT_TIMEOUT_SECS,
            DERIBIT_TESTNET_API_KEY_ENV, DERIBIT_TESTNET_API_SECRET_ENV,
        },
        credential::Credential,
        urls::get_ws_url,
    },
    websocket::error::{DeribitWsError, DeribitWsResult},
};

/// Configuration for a [`DeribitSession`](crate::websocket::session::DeribitSession).
#[derive(Clone, Debug)]
pub struct DeribitSessionConfig {
    /// Connect to the test endpoint instead of production.
    pub use_testnet: bool,
    /// Optional WebSocket URL override.
    pub base_url_ws: Option<String>,
    /// Client id; falls back to the environment when `None`.
    pub api_key: Option<String>,
    /// Client secret; falls back to the environment when `None`.
    pub api_secret: Option<String>,
    /// Handshake and per-frame read timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for DeribitSessionConfig {
    fn default() -> Self {
        Self {
            use_testnet: true,
            base_url_ws: None,
            api_key: None,
            api_secret: None,
            timeout_secs: Some(DERIBIT_DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DeribitSessionConfig {
    /// Creates a configuration with explicit credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>, use_testnet: bool) -> Self {
        Self {
            use_testnet,
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Default::default()
        }
    }

    /// Returns the WebSocket URL, preferring the override.
    #[must_use]
    pub fn ws_url(&self) -> String {
        self.base_url_ws
            .clone()
            .unwrap_or_else(|| get_ws_url(self.use_testnet).to_string())
    }

    /// Returns the environment variable names holding the credentials.
    #[must_use]
    pub const fn credential_env_vars(&self) -> (&'static str, &'static str) {
        if self.use_testnet {
            (DERIBIT_TESTNET_API_KEY_ENV, DERIBIT_TESTNET_API_SECRET_ENV)
        } else {
            (DERIBIT_API_KEY_ENV, DERIBIT_API_SECRET_ENV)
        }
    }

    /// Resolves the credential from explicit values, then from environment variables.
    ///
    /// Mainnet reads `DERIBIT_API_KEY` and `DERIBIT_API_SECRET`; testnet reads
    /// `DERIBIT_TESTNET_API_KEY` and `DERIBIT_TESTNET_API_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] if either value cannot be resolved.
    pub fn credential(&self) -> DeribitWsResult<Credential> {
        self.resolve_credential(|key| std::env::var(key).ok())
    }

    fn resolve_credential<F>(&self, lookup: F) -> DeribitWsResult<Credential>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (key_env, secret_env) = self.credential_env_vars();
        let resolve = |value: &Option<String>, env: &str| {
            value
                .clone()
                .or_else(|| lookup(env))
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    DeribitWsError::InvalidArgument(format!(
                        "Missing credential: set it explicitly or via {env}"
                    ))
                })
        };

        let api_key = resolve(&self.api_key, key_env)?;
        let api_secret = resolve(&self.api_secret, secret_env)?;

        Ok(Credential::new(api_key, api_secret))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_default_config() {
        let config = DeribitSessionConfig::default();

        assert!(config.use_testnet);
        assert_eq!(config.ws_url(), "wss://test.deribit.com/ws/api/v2");
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[rstest]
    fn test_ws_url_live_and_override() {
        let mut config = DeribitSessionConfig::new("key", "secret", false);
        assert_eq!(config.ws_url(), "wss://www.deribit.com/ws/api/v2");

        config.base_url_ws = Some("ws://127.0.0.1:9000/ws/api/v2".to_string());
        assert_eq!(config.ws_url(), "ws://127.0.0.1:9000/ws/api/v2");
    }

    #[rstest]
    fn test_credential_explicit_values_win() {
        let config = DeribitSessionConfig::new("explicit_key", "explicit_secret", true);
        let credential = config
            .resolve_credential(|_| Some("from_env".to_string()))
            .unwrap();

        assert_eq!(credential.client_id(), "explicit_key");
        assert_eq!(credential.client_secret(), "explicit_secret");
    }

    #[rstest]
    #[case(true, "DERIBIT_TESTNET_API_KEY", "DERIBIT_TESTNET_API_SECRET")]
    #[case(false, "DERIBIT_API_KEY", "DERIBIT_API_SECRET")]
    fn test_credential_from_environment(
        #[case] use_testnet: bool,
        #[case] key_env: &'static str,
        #[case] secret_env: &'static str,
    ) {
        let config = DeribitSessionConfig {
            use_testnet,
            ..Default::default()
        };
        let credential = config
            .resolve_credential(|name| {
                if name == key_env {
                    Some("env_key".to_string())
                } else if name == secret_env {
                    Some("env_secret".to_string())
                } else {
                    None
                }
            })
            .unwrap();

        assert_eq!(credential.client_id(), "env_key");
        assert_eq!(credential.client_secret(), "env_secret");
    }

    #[rstest]
    fn test_credential_missing_secret() {
        let config = DeribitSessionConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        let err = config.resolve_credential(|_| None).unwrap_err();

        match err {
            DeribitWsError::InvalidArgument(msg) => {
                assert!(msg.contains("DERIBIT_TESTNET_API_SECRET"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn test_credential_rejects_blank_values() {
        let config = DeribitSessionConfig::new("  ", "secret", true);
        let err = config.resolve_credential(|_| None).unwrap_err();

        assert!(matches!(err, DeribitWsError::InvalidArgument(_)));
    }
}
