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

//! Parameter objects for the Deribit JSON-RPC methods used by the client.
//!
//! Each struct serializes to the `params` object of one method.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::common::{
    consts::DERIBIT_DEFAULT_BOOK_DEPTH,
    enums::{
        DeribitCurrency, DeribitInstrumentKind, DeribitOrderType, DeribitResolution,
        DeribitVolatilityResolution,
    },
};

/// Parameters for `private/buy` and `private/sell`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Builder)]
#[builder(setter(into, strip_option), derive(Debug))]
pub struct DeribitOrderParams {
    /// Instrument name (e.g., "BTC-PERPETUAL")
    pub instrument_name: String,
    /// Order size in contract units (or USD for inverse perpetuals)
    pub amount: f64,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: DeribitOrderType,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub price: Option<f64>,
    /// Reject the order if it would take liquidity
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub post_only: Option<bool>,
    /// Only reduce an existing position
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub reduce_only: Option<bool>,
}

impl DeribitOrderParams {
    /// Creates a new builder for [`DeribitOrderParams`].
    #[must_use]
    pub fn builder() -> DeribitOrderParamsBuilder {
        DeribitOrderParamsBuilder::default()
    }

    /// Creates parameters for a market order.
    #[must_use]
    pub fn market(instrument_name: impl Into<String>, amount: f64) -> Self {
        Self {
            instrument_name: instrument_name.into(),
            amount,
            order_type: DeribitOrderType::Market,
            price: None,
            post_only: None,
            reduce_only: None,
        }
    }
}

/// Parameters for `public/get_tradingview_chart_data`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetChartDataParams {
    pub instrument_name: String,
    /// Window start (milliseconds since the UNIX epoch)
    pub start_timestamp: i64,
    /// Window end (milliseconds since the UNIX epoch)
    pub end_timestamp: i64,
    pub resolution: DeribitResolution,
}

/// Parameters for `public/get_order_book`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetOrderBookParams {
    pub instrument_name: String,
    /// Number of price levels per side
    pub depth: u32,
}

impl GetOrderBookParams {
    /// Creates parameters with the default depth.
    #[must_use]
    pub fn new(instrument_name: impl Into<String>) -> Self {
        Self {
            instrument_name: instrument_name.into(),
            depth: DERIBIT_DEFAULT_BOOK_DEPTH,
        }
    }
}

/// Parameters for `public/ticker`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TickerParams {
    pub instrument_name: String,
}

/// Parameters for `public/get_index_price`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetIndexPriceParams {
    /// Index identifier (e.g., "btc_usd")
    pub index_name: String,
}

/// Parameters for `private/get_account_summary`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetAccountSummaryParams {
    pub currency: DeribitCurrency,
    /// Include extended fields
    pub extended: bool,
}

/// Parameters for methods keyed only by currency (`private/get_positions`,
/// `private/get_subaccounts_details`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CurrencyParams {
    pub currency: DeribitCurrency,
}

/// Parameters for `public/get_instruments`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[builder(setter(into, strip_option), derive(Debug))]
pub struct GetInstrumentsParams {
    /// Currency filter
    pub currency: DeribitCurrency,
    /// Optional instrument kind filter
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub kind: Option<DeribitInstrumentKind>,
    /// Whether to list expired instruments instead of active ones
    #[builder(default)]
    pub expired: bool,
}

impl GetInstrumentsParams {
    /// Creates a new builder for [`GetInstrumentsParams`].
    #[must_use]
    pub fn builder() -> GetInstrumentsParamsBuilder {
        GetInstrumentsParamsBuilder::default()
    }
}

/// Parameters for `public/get_volatility_index_data`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetVolatilityIndexDataParams {
    pub currency: DeribitCurrency,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub resolution: DeribitVolatilityResolution,
}

/// Parameters for `private/get_user_trades_by_currency_and_time`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Builder)]
#[builder(setter(into), derive(Debug))]
pub struct GetUserTradesByCurrencyAndTimeParams {
    pub currency: DeribitCurrency,
    pub kind: DeribitInstrumentKind,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    /// Number of requested items
    pub count: u32,
    /// Include trades older than the retention window
    #[builder(default = "true")]
    pub include_old: bool,
}

impl GetUserTradesByCurrencyAndTimeParams {
    /// Creates a new builder for [`GetUserTradesByCurrencyAndTimeParams`].
    #[must_use]
    pub fn builder() -> GetUserTradesByCurrencyAndTimeParamsBuilder {
        GetUserTradesByCurrencyAndTimeParamsBuilder::default()
    }
}

/// Parameters for `private/get_user_trades_by_currency`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetUserTradesByCurrencyParams {
    pub currency: DeribitCurrency,
    pub kind: DeribitInstrumentKind,
    pub count: u32,
    pub include_old: bool,
}

impl GetUserTradesByCurrencyParams {
    /// Creates parameters for the most recent trade of `kind`.
    #[must_use]
    pub fn latest(currency: DeribitCurrency, kind: DeribitInstrumentKind) -> Self {
        Self {
            currency,
            kind,
            count: 1,
            include_old: false,
        }
    }
}

/// Parameters for `private/get_transaction_log`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GetTransactionLogParams {
    pub currency: DeribitCurrency,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
}
