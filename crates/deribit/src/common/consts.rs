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

//! Core constants for the Deribit client.

// Production URLs
pub const DERIBIT_WS_URL: &str = "wss://www.deribit.com/ws/api/v2";

// Testnet URLs
pub const DERIBIT_TESTNET_WS_URL: &str = "wss://test.deribit.com/ws/api/v2";

// JSON-RPC constants
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id carried by every outbound envelope.
///
/// The session keeps exactly one request in flight, so responses are correlated by order
/// rather than by id.
pub const DERIBIT_REQUEST_ID: u64 = 0;

/// Default read timeout for a single response frame.
pub const DERIBIT_DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default order book depth requested by `public/get_order_book`.
pub const DERIBIT_DEFAULT_BOOK_DEPTH: u32 = 5;

// Environment variables holding API credentials
pub const DERIBIT_API_KEY_ENV: &str = "DERIBIT_API_KEY";
pub const DERIBIT_API_SECRET_ENV: &str = "DERIBIT_API_SECRET";
pub const DERIBIT_TESTNET_API_KEY_ENV: &str = "DERIBIT_TESTNET_API_KEY";
pub const DERIBIT_TESTNET_API_SECRET_ENV: &str = "DERIBIT_TESTNET_API_SECRET";

// Public methods
pub const METHOD_AUTH: &str = "public/auth";
pub const METHOD_GET_CHART_DATA: &str = "public/get_tradingview_chart_data";
pub const METHOD_GET_ORDER_BOOK: &str = "public/get_order_book";
pub const METHOD_TICKER: &str = "public/ticker";
pub const METHOD_GET_INDEX_PRICE: &str = "public/get_index_price";
pub const METHOD_GET_INSTRUMENTS: &str = "public/get_instruments";
pub const METHOD_GET_VOLATILITY_INDEX_DATA: &str = "public/get_volatility_index_data";

// Private methods
pub const METHOD_BUY: &str = "private/buy";
pub const METHOD_SELL: &str = "private/sell";
pub const METHOD_GET_ACCOUNT_SUMMARY: &str = "private/get_account_summary";
pub const METHOD_GET_POSITIONS: &str = "private/get_positions";
pub const METHOD_GET_USER_TRADES_BY_CURRENCY_AND_TIME: &str =
    "private/get_user_trades_by_currency_and_time";
pub const METHOD_GET_USER_TRADES_BY_CURRENCY: &str = "private/get_user_trades_by_currency";
pub const METHOD_GET_TRANSACTION_LOG: &str = "private/get_transaction_log";
pub const METHOD_GET_SUBACCOUNTS_DETAILS: &str = "private/get_subaccounts_details";

/// Deribit error codes which are usually transient.
///
/// Informational only: the client surfaces these like any other upstream error.
pub const DERIBIT_RETRYABLE_ERROR_CODES: &[i64] = &[
    10028, // too_many_requests
    10040, // retry
    10041, // settlement_in_progress
    10047, // matching_engine_queue_full
    10066, // too_many_concurrent_requests
    11051, // system_maintenance
    11094, // internal_server_error
    13028, // temporarily_unavailable
    13888, // timed_out
];
