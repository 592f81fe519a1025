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

//! Byte-level transport for the Deribit session.
//!
//! A transport owns one duplex connection and moves whole text frames. It never buffers more
//! than the frame being read and never reconnects.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};

use super::error::{DeribitWsError, DeribitWsResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A duplex, frame-oriented connection to a Deribit endpoint.
///
/// Implementations must return the frames in the order the peer sent them and must surface
/// connection-level failures as [`DeribitWsError::Connection`].
#[async_trait]
pub trait DeribitTransport: Send {
    /// Writes one complete text frame.
    async fn send(&mut self, payload: String) -> DeribitWsResult<()>;

    /// Reads the next complete text frame.
    async fn receive(&mut self) -> DeribitWsResult<String>;

    /// Closes the connection. Closing an already closed connection succeeds.
    async fn close(&mut self) -> DeribitWsResult<()>;
}

/// WebSocket transport backed by `tokio-tungstenite`.
pub struct DeribitWsTransport {
    url: String,
    stream: WsStream,
    timeout: Option<Duration>,
}

impl Debug for DeribitWsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(DeribitWsTransport))
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl DeribitWsTransport {
    /// Opens a WebSocket connection to `url`.
    ///
    /// `timeout_secs` bounds the handshake and every later frame read.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::Connection`] if the handshake fails or times out.
    pub async fn connect(url: &str, timeout_secs: Option<u64>) -> DeribitWsResult<Self> {
        install_cryptographic_provider();

        let timeout = timeout_secs.map(Duration::from_secs);
        tracing::debug!("Opening WebSocket connection to {url}");

        let (stream, response) = match timeout {
            Some(duration) => tokio::time::timeout(duration, connect_async(url))
                .await
                .map_err(|_| {
                    DeribitWsError::Connection(format!(
                        "Handshake with {url} timed out after {}s",
                        duration.as_secs()
                    ))
                })??,
            None => connect_async(url).await?,
        };

        tracing::debug!(status = %response.status(), "WebSocket handshake complete");

        Ok(Self {
            url: url.to_string(),
            stream,
            timeout,
        })
    }

    /// Returns the URL this transport is connected to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn next_message(&mut self) -> Option<Result<Message, tungstenite::Error>> {
        match self.timeout {
            Some(duration) => tokio::time::timeout(duration, self.stream.next())
                .await
                .unwrap_or_else(|_| Some(Err(tungstenite::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("no frame received within {}s", duration.as_secs()),
                ))))),
            None => self.stream.next().await,
        }
    }
}

#[async_trait]
impl DeribitTransport for DeribitWsTransport {
    async fn send(&mut self, payload: String) -> DeribitWsResult<()> {
        self.stream.send(Message::Text(payload.into())).await?;
        Ok(())
    }

    async fn receive(&mut self) -> DeribitWsResult<String> {
        loop {
            match self.next_message().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Binary(data))) => {
                    return String::from_utf8(data.to_vec()).map_err(|e| {
                        DeribitWsError::Decode(format!("Binary frame is not UTF-8: {e}"))
                    });
                }
                // Pongs for server pings are queued by tungstenite itself
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!("Received close frame: {frame:?}");
                    return Err(DeribitWsError::Connection(
                        "Connection closed by server".to_string(),
                    ));
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Err(DeribitWsError::Connection(
                        "Connection closed".to_string(),
                    ));
                }
            }
        }
    }

    async fn close(&mut self) -> DeribitWsResult<()> {
        match self.stream.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Installs the `ring` crypto provider for `rustls` if none is installed yet.
fn install_cryptographic_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        // Another thread may win the race, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}
