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

//! Authenticated JSON-RPC session over a single Deribit connection.
//!
//! A [`DeribitSession`] only exists once the `public/auth` handshake succeeded. Construction
//! fails with [`DeribitWsError::Authentication`] when Deribit rejects the credentials, and the
//! connection is closed before the error is returned.
//!
//! Every [`DeribitSession::invoke`] is a strict round-trip: encode, send, read the next frame,
//! decode. The transport sits behind an async mutex that is held for the whole round-trip, so
//! callers sharing one session (for example through an `Arc`) are served one at a time and a
//! response can never be handed to the wrong request.

use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use super::{
    auth::{AuthState, DeribitAuthParams, DeribitAuthResult},
    error::{DeribitWsError, DeribitWsResult},
    transport::{DeribitTransport, DeribitWsTransport},
};
use crate::{
    common::{
        consts::METHOD_AUTH,
        credential::Credential,
        rpc::{DeribitJsonRpcResponse, decode_response, encode_request},
        time::unix_time_millis,
    },
    config::DeribitSessionConfig,
};

/// Authenticated session owning one Deribit connection.
pub struct DeribitSession<T = DeribitWsTransport> {
    url: String,
    is_testnet: bool,
    transport: tokio::sync::Mutex<Option<T>>,
    auth_state: Option<AuthState>,
}

impl<T> Debug for DeribitSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(DeribitSession))
            .field("url", &self.url)
            .field("is_testnet", &self.is_testnet)
            .field(
                "is_connected",
                &self
                    .transport
                    .try_lock()
                    .map(|t| t.is_some())
                    .unwrap_or(true),
            )
            .field("auth_state", &self.auth_state)
            .finish()
    }
}

impl DeribitSession<DeribitWsTransport> {
    /// Connects to the configured endpoint and authenticates.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The credential cannot be resolved ([`DeribitWsError::InvalidArgument`]).
    /// - The WebSocket handshake fails ([`DeribitWsError::Connection`]).
    /// - Deribit rejects the credentials ([`DeribitWsError::Authentication`]).
    pub async fn connect(config: &DeribitSessionConfig) -> DeribitWsResult<Self> {
        let credential = config.credential()?;
        let url = config.ws_url();

        tracing::info!("Connecting to Deribit WebSocket: {url}");
        let transport = DeribitWsTransport::connect(&url, config.timeout_secs).await?;

        Self::with_transport(transport, &credential, url, config.use_testnet).await
    }
}

impl<T: DeribitTransport> DeribitSession<T> {
    /// Authenticates over an already opened transport.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::Authentication`] carrying the upstream error if the handshake
    /// is rejected, or the transport/decode error that interrupted it.
    pub async fn with_transport(
        mut transport: T,
        credential: &Credential,
        url: impl Into<String>,
        is_testnet: bool,
    ) -> DeribitWsResult<Self> {
        let url = url.into();

        let auth_state = match authenticate(&mut transport, credential).await {
            Ok(state) => state,
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    tracing::debug!("Error closing connection after failed auth: {close_err}");
                }
                return Err(e);
            }
        };

        tracing::info!(
            client_id = %credential.masked_client_id(),
            "Authenticated Deribit session on {url}"
        );

        Ok(Self {
            url,
            is_testnet,
            transport: tokio::sync::Mutex::new(Some(transport)),
            auth_state,
        })
    }

    /// Sends one JSON-RPC call and returns its `result`.
    ///
    /// `params` must serialize to a JSON object. Concurrent calls on the same session wait for
    /// each other.
    ///
    /// A [`DeribitWsError::Connection`] failure (including a read timeout) closes the session,
    /// since an unread response may still arrive on the socket. Dropping the returned future
    /// before it completes does the same. Later calls then fail with
    /// [`DeribitWsError::NotConnected`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `method` or `params` are invalid ([`DeribitWsError::InvalidArgument`], nothing sent).
    /// - The session was closed ([`DeribitWsError::NotConnected`]).
    /// - The connection fails ([`DeribitWsError::Connection`]).
    /// - The response is malformed ([`DeribitWsError::Decode`]).
    /// - Deribit reports an error ([`DeribitWsError::DeribitError`]).
    pub async fn invoke<P>(&self, method: &str, params: &P) -> DeribitWsResult<Value>
    where
        P: Serialize + ?Sized,
    {
        let payload = encode_request(method, params)?;

        let mut guard = self.transport.lock().await;
        // Held outside the slot until the response is read, so a cancelled call drops it
        let mut transport = guard.take().ok_or(DeribitWsError::NotConnected)?;

        tracing::debug!(method = %method, "Sending request");
        let response = match round_trip(&mut transport, payload).await {
            Ok(response) => {
                *guard = Some(transport);
                response
            }
            Err(DeribitWsError::Connection(reason)) => {
                drop(guard);
                tracing::warn!(
                    method = %method,
                    "Connection failed during request, closing session: {reason}"
                );
                if let Err(close_err) = transport.close().await {
                    tracing::debug!("Error closing connection: {close_err}");
                }
                return Err(DeribitWsError::Connection(reason));
            }
            Err(e) => {
                *guard = Some(transport);
                return Err(e);
            }
        };
        drop(guard);

        response.into_result().inspect_err(|e| {
            if let DeribitWsError::DeribitError {
                code,
                message,
                data,
            } = e
            {
                tracing::warn!(
                    method = %method,
                    error_code = code,
                    error_message = %message,
                    error_data = ?data,
                    "Deribit RPC error response"
                );
            }
        })
    }

    /// Closes the connection.
    ///
    /// Later calls to [`Self::invoke`] fail with [`DeribitWsError::NotConnected`]. Closing twice
    /// is a no-op. Dropping the session without closing it also releases the connection.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::Connection`] if the close handshake fails; the connection is
    /// released either way.
    pub async fn close(&self) -> DeribitWsResult<()> {
        let transport = self.transport.lock().await.take();

        match transport {
            Some(mut transport) => {
                tracing::info!("Closing Deribit WebSocket: {}", self.url);
                transport.close().await
            }
            None => Ok(()),
        }
    }

    /// Returns whether the connection is still held (not closed and not failed).
    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_some()
    }
}

impl<T> DeribitSession<T> {
    /// Returns the WebSocket URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns whether the session targets the test endpoint.
    #[must_use]
    pub fn is_testnet(&self) -> bool {
        self.is_testnet
    }

    /// Returns the tokens granted at authentication, when the result had the standard shape.
    #[must_use]
    pub fn auth_state(&self) -> Option<&AuthState> {
        self.auth_state.as_ref()
    }
}

/// Sends one frame and decodes the next frame read back.
async fn round_trip<T: DeribitTransport>(
    transport: &mut T,
    payload: String,
) -> DeribitWsResult<DeribitJsonRpcResponse> {
    transport.send(payload).await?;
    let text = transport.receive().await?;
    decode_response(&text)
}

/// Performs the `public/auth` handshake.
///
/// Any response without an `error` member authenticates the session.
async fn authenticate<T: DeribitTransport>(
    transport: &mut T,
    credential: &Credential,
) -> DeribitWsResult<Option<AuthState>> {
    let params = DeribitAuthParams::client_credentials(credential);
    let payload = encode_request(METHOD_AUTH, &params)?;

    tracing::debug!(
        client_id = %credential.masked_client_id(),
        "Sending authentication request"
    );
    let response = round_trip(transport, payload).await?;

    if let Some(error) = response.error {
        tracing::error!(
            error_code = error.code,
            error_message = %error.message,
            "Authentication failed"
        );
        return Err(DeribitWsError::Authentication(error));
    }

    let obtained_at = u64::try_from(unix_time_millis()).unwrap_or_default();
    let auth_state = response
        .result
        .and_then(|result| serde_json::from_value::<DeribitAuthResult>(result).ok())
        .map(|result| AuthState::from_auth_result(&result, obtained_at));

    if auth_state.is_none() {
        tracing::debug!("Authentication result has no token details");
    }

    Ok(auth_state)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
    };

    use async_trait::async_trait;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::common::testing::load_test_json;

    #[derive(Clone, Debug, Default)]
    struct ScriptedTransport {
        sent: Arc<Mutex<Vec<String>>>,
        responses: Arc<Mutex<VecDeque<DeribitWsResult<String>>>>,
        closed: Arc<AtomicBool>,
        stall_when_empty: Arc<AtomicBool>,
    }

    impl ScriptedTransport {
        fn with_responses<I>(responses: I) -> Self
        where
            I: IntoIterator<Item = DeribitWsResult<String>>,
        {
            let transport = Self::default();
            transport.responses.lock().unwrap().extend(responses);
            transport
        }

        fn sent(&self) -> Vec<Value> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|s| serde_json::from_str(s).unwrap())
                .collect()
        }

        fn remaining(&self) -> usize {
            self.responses.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DeribitTransport for ScriptedTransport {
        async fn send(&mut self, payload: String) -> DeribitWsResult<()> {
            self.sent.lock().unwrap().push(payload);
            Ok(())
        }

        async fn receive(&mut self) -> DeribitWsResult<String> {
            let next = self.responses.lock().unwrap().pop_front();
            if next.is_none() && self.stall_when_empty.load(Ordering::Relaxed) {
                std::future::pending::<()>().await;
            }
            next.unwrap_or_else(|| Err(DeribitWsError::Connection("no response".to_string())))
        }

        async fn close(&mut self) -> DeribitWsResult<()> {
            self.closed.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    fn credential() -> Credential {
        Credential::new("test_client_id", "test_client_secret")
    }

    async fn authenticated(
        responses: Vec<DeribitWsResult<String>>,
    ) -> (DeribitSession<ScriptedTransport>, ScriptedTransport) {
        let mut all = vec![Ok(load_test_json("ws_auth.json"))];
        all.extend(responses);
        let transport = ScriptedTransport::with_responses(all);
        let session = DeribitSession::with_transport(
            transport.clone(),
            &credential(),
            "ws://localhost/ws/api/v2",
            true,
        )
        .await
        .unwrap();
        (session, transport)
    }

    #[tokio::test]
    async fn test_auth_request_envelope() {
        let (session, transport) = authenticated(vec![]).await;

        assert_eq!(
            transport.sent(),
            vec![json!({
                "jsonrpc": "2.0",
                "id": 0,
                "method": "public/auth",
                "params": {
                    "grant_type": "client_credentials",
                    "client_id": "test_client_id",
                    "client_secret": "test_client_secret",
                },
            })]
        );
        assert!(session.is_testnet());
        assert!(session.is_connected().await);
        let state = session.auth_state().expect("auth state");
        assert_eq!(state.expires_in, 31_536_000);
    }

    #[tokio::test]
    async fn test_auth_rejected_fails_construction_and_closes() {
        let transport =
            ScriptedTransport::with_responses([Ok(load_test_json("ws_auth_error.json"))]);

        let err = DeribitSession::with_transport(
            transport.clone(),
            &credential(),
            "ws://localhost/ws/api/v2",
            true,
        )
        .await
        .unwrap_err();

        match err {
            DeribitWsError::Authentication(error) => {
                assert_eq!(error.code, 13004);
                assert_eq!(error.message, "invalid_credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(transport.closed.load(Ordering::Relaxed));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_auth_with_non_standard_result_still_authenticates() {
        let transport =
            ScriptedTransport::with_responses([Ok(r#"{"id":0,"result":"ok"}"#.to_string())]);

        let session = DeribitSession::with_transport(transport, &credential(), "ws://x", false)
            .await
            .unwrap();

        assert!(session.auth_state().is_none());
    }

    #[tokio::test]
    async fn test_auth_malformed_response_is_decode_error() {
        let transport = ScriptedTransport::with_responses([Ok("<html>".to_string())]);

        let err = DeribitSession::with_transport(transport.clone(), &credential(), "ws://x", true)
            .await
            .unwrap_err();

        assert!(matches!(err, DeribitWsError::Decode(_)));
        assert!(transport.closed.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_auth_connection_error_is_surfaced() {
        let transport = ScriptedTransport::default();

        let err = DeribitSession::with_transport(transport, &credential(), "ws://x", true)
            .await
            .unwrap_err();

        assert!(matches!(err, DeribitWsError::Connection(_)));
    }

    #[tokio::test]
    async fn test_invoke_sends_one_message_and_consumes_one_response() {
        let (session, transport) = authenticated(vec![
            Ok(load_test_json("ws_ticker.json")),
            Ok(load_test_json("ws_index_price.json")),
        ])
        .await;

        let result = session
            .invoke("public/ticker", &json!({"instrument_name": "BTC-PERPETUAL"}))
            .await
            .unwrap();

        assert_eq!(result["last_price"], json!(50000.5));
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1]["method"], "public/ticker");
        assert_eq!(sent[1]["id"], 0);
        assert_eq!(sent[1]["params"], json!({"instrument_name": "BTC-PERPETUAL"}));
        assert_eq!(transport.remaining(), 1);
    }

    #[tokio::test]
    async fn test_invoke_rpc_error_keeps_session_usable() {
        let (session, _transport) = authenticated(vec![
            Ok(load_test_json("ws_error_not_enough_funds.json")),
            Ok(load_test_json("ws_index_price.json")),
        ])
        .await;

        let err = session
            .invoke("private/buy", &json!({"instrument_name": "BTC-PERPETUAL", "amount": 10}))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(10009));

        let result = session
            .invoke("public/get_index_price", &json!({"index_name": "btc_usd"}))
            .await
            .unwrap();
        assert_eq!(result["index_price"], json!(49998.71));
    }

    #[tokio::test]
    async fn test_invoke_invalid_params_sends_nothing() {
        let (session, transport) = authenticated(vec![]).await;

        let err = session.invoke("public/ticker", &json!([1, 2])).await.unwrap_err();

        assert!(matches!(err, DeribitWsError::InvalidArgument(_)));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_invoke_decode_error_is_surfaced() {
        let (session, _transport) = authenticated(vec![Ok("{not json".to_string())]).await;

        let err = session.invoke("public/ticker", &json!({})).await.unwrap_err();

        assert!(matches!(err, DeribitWsError::Decode(_)));
    }

    #[tokio::test]
    async fn test_invoke_connection_error_is_surfaced() {
        let (session, _transport) = authenticated(vec![Err(DeribitWsError::Connection(
            "socket closed".to_string(),
        ))])
        .await;

        let err = session.invoke("public/ticker", &json!({})).await.unwrap_err();

        assert!(matches!(err, DeribitWsError::Connection(_)));
    }

    #[tokio::test]
    async fn test_connection_error_closes_session_before_late_response() {
        let (session, transport) = authenticated(vec![
            Err(DeribitWsError::Connection("read timed out".to_string())),
            Ok(load_test_json("ws_ticker.json")),
        ])
        .await;

        let err = session.invoke("public/ticker", &json!({})).await.unwrap_err();
        assert!(matches!(err, DeribitWsError::Connection(_)));
        assert!(!session.is_connected().await);
        assert!(transport.closed.load(Ordering::Relaxed));

        let err = session
            .invoke("public/get_index_price", &json!({"index_name": "btc_usd"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DeribitWsError::NotConnected));
        assert_eq!(transport.remaining(), 1);
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_decode_error_keeps_session_usable() {
        let (session, _transport) = authenticated(vec![
            Ok("{not json".to_string()),
            Ok(load_test_json("ws_index_price.json")),
        ])
        .await;

        let _ = session.invoke("public/ticker", &json!({})).await.unwrap_err();
        let result = session
            .invoke("public/get_index_price", &json!({"index_name": "btc_usd"}))
            .await
            .unwrap();

        assert_eq!(result["index_price"], json!(49998.71));
    }

    #[tokio::test]
    async fn test_cancelled_invoke_closes_session() {
        let (session, transport) = authenticated(vec![]).await;
        transport.stall_when_empty.store(true, Ordering::Relaxed);

        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            session.invoke("public/ticker", &json!({})),
        )
        .await;
        assert!(cancelled.is_err());

        // A late response must not be read by the next call
        transport
            .responses
            .lock()
            .unwrap()
            .push_back(Ok(load_test_json("ws_ticker.json")));

        assert!(!session.is_connected().await);
        let err = session
            .invoke("public/get_index_price", &json!({"index_name": "btc_usd"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DeribitWsError::NotConnected));
        assert_eq!(transport.remaining(), 1);
    }

    #[tokio::test]
    async fn test_close_then_invoke_is_not_connected() {
        let (session, transport) = authenticated(vec![]).await;

        session.close().await.unwrap();
        session.close().await.unwrap();

        assert!(transport.closed.load(Ordering::Relaxed));
        assert!(!session.is_connected().await);
        let err = session.invoke("public/ticker", &json!({})).await.unwrap_err();
        assert!(matches!(err, DeribitWsError::NotConnected));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_debug_does_not_leak_tokens() {
        let (session, _transport) = authenticated(vec![]).await;
        let debug = format!("{session:?}");

        assert!(debug.contains("ws://localhost/ws/api/v2"));
        assert!(!debug.contains("access_token_value"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_auth_logs_masked_client_id_only() {
        let (_session, _transport) = authenticated(vec![]).await;

        assert!(logs_contain("Authenticated Deribit session"));
        assert!(logs_contain("test...t_id"));
        assert!(!logs_contain("test_client_secret"));
        assert!(!logs_contain("access_token_value"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_rpc_error_is_logged() {
        let (session, _transport) =
            authenticated(vec![Ok(load_test_json("ws_error_not_enough_funds.json"))]).await;

        let _ = session.invoke("private/sell", &json!({})).await;

        assert!(logs_contain("Deribit RPC error response"));
        assert!(logs_contain("not_enough_funds"));
    }
}
