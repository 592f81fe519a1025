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

//! Client for the [Deribit](https://www.deribit.com) JSON-RPC 2.0 API over a single WebSocket
//! connection.
//!
//! The `deribit-rpc` crate opens one persistent connection, authenticates it with the
//! `client_credentials` grant and exposes typed call builders (orders, market data, account
//! queries) on top of a single request/response primitive, [`DeribitSession::invoke`].
//!
//! # Protocol model
//!
//! Every call is a strict round-trip: one JSON-RPC envelope is written, and the next frame read
//! from the socket is its response. The request id is the constant `0`, so the session never
//! multiplexes. Concurrent callers sharing a session are serialized by an internal mutex held
//! across the whole round-trip.
//!
//! Nothing in this crate reconnects, retries or rate limits. Every transport or upstream fault is
//! returned to the caller with its [`DeribitWsError`] classification unchanged.
//!
//! # Documentation
//!
//! - API reference: <https://docs.deribit.com/>
//!
//! [`DeribitSession::invoke`]: websocket::session::DeribitSession::invoke
//! [`DeribitWsError`]: websocket::error::DeribitWsError

#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod websocket;

pub use crate::{
    config::DeribitSessionConfig,
    websocket::{
        client::DeribitWebSocketClient,
        error::{DeribitWsError, DeribitWsResult},
        session::DeribitSession,
        transport::{DeribitTransport, DeribitWsTransport},
    },
};
