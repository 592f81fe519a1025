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

//! Typed Deribit calls built on [`DeribitSession::invoke`].
//!
//! Every method validates its arguments before any I/O, builds the `params` object, and returns
//! the decoded `result` (or a narrowed field of it).

use chrono::Duration;
use serde::Serialize;
use serde_json::Value;

use super::{
    error::{DeribitWsError, DeribitWsResult},
    parse::{
        DeribitChartBar, DeribitInstrument, extract_index_price, extract_instrument_names,
        extract_last_price, parse_chart_bars, parse_instruments,
    },
    query::{
        CurrencyParams, DeribitOrderParams, GetAccountSummaryParams, GetChartDataParams,
        GetIndexPriceParams, GetInstrumentsParams, GetOrderBookParams, GetTransactionLogParams,
        GetUserTradesByCurrencyAndTimeParams, GetUserTradesByCurrencyParams,
        GetVolatilityIndexDataParams, TickerParams,
    },
    session::DeribitSession,
    transport::{DeribitTransport, DeribitWsTransport},
};
use crate::{
    common::{
        consts::{
            METHOD_GET_ACCOUNT_SUMMARY, METHOD_GET_CHART_DATA, METHOD_GET_INDEX_PRICE,
            METHOD_GET_INSTRUMENTS, METHOD_GET_ORDER_BOOK, METHOD_GET_POSITIONS,
            METHOD_GET_SUBACCOUNTS_DETAILS, METHOD_GET_TRANSACTION_LOG,
            METHOD_GET_USER_TRADES_BY_CURRENCY, METHOD_GET_USER_TRADES_BY_CURRENCY_AND_TIME,
            METHOD_GET_VOLATILITY_INDEX_DATA, METHOD_TICKER,
        },
        enums::{
            DeribitCurrency, DeribitDirection, DeribitInstrumentKind, DeribitOrderType,
            DeribitResolution, DeribitVolatilityResolution,
        },
        time::{lookback_window_ms, unix_time_millis},
    },
    config::DeribitSessionConfig,
};

/// Deribit trading and market-data client over one authenticated session.
#[derive(Debug)]
pub struct DeribitWebSocketClient<T = DeribitWsTransport> {
    session: DeribitSession<T>,
}

impl DeribitWebSocketClient<DeribitWsTransport> {
    /// Connects and authenticates a new session.
    ///
    /// # Errors
    ///
    /// Returns the error from [`DeribitSession::connect`].
    pub async fn connect(config: &DeribitSessionConfig) -> DeribitWsResult<Self> {
        let session = DeribitSession::connect(config).await?;
        Ok(Self::new(session))
    }
}

impl<T> From<DeribitSession<T>> for DeribitWebSocketClient<T> {
    fn from(session: DeribitSession<T>) -> Self {
        Self { session }
    }
}

impl<T: DeribitTransport> DeribitWebSocketClient<T> {
    /// Creates a client over an authenticated session.
    #[must_use]
    pub fn new(session: DeribitSession<T>) -> Self {
        Self { session }
    }

    /// Returns the underlying session.
    #[must_use]
    pub fn session(&self) -> &DeribitSession<T> {
        &self.session
    }

    /// Returns whether the session targets the test endpoint.
    #[must_use]
    pub fn is_testnet(&self) -> bool {
        self.session.is_testnet()
    }

    /// Sends an arbitrary method call through the session.
    ///
    /// # Errors
    ///
    /// Returns the error from [`DeribitSession::invoke`].
    pub async fn invoke<P>(&self, method: &str, params: &P) -> DeribitWsResult<Value>
    where
        P: Serialize + ?Sized,
    {
        self.session.invoke(method, params).await
    }

    /// Closes the session.
    ///
    /// # Errors
    ///
    /// Returns the error from [`DeribitSession::close`].
    pub async fn close(&self) -> DeribitWsResult<()> {
        self.session.close().await
    }

    /// Places a market order. `direction` is `long` or `short` (any case).
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for an unknown direction, an empty
    /// instrument or a non-positive amount, otherwise any error from the call.
    pub async fn get_market_order(
        &self,
        instrument: &str,
        amount: f64,
        direction: &str,
    ) -> DeribitWsResult<Value> {
        let side = DeribitDirection::parse(direction)?;
        validate_name("instrument", instrument)?;
        validate_positive("amount", amount)?;

        let params = DeribitOrderParams::market(instrument, amount);
        tracing::info!(
            instrument = %instrument,
            amount,
            side = %side,
            "Submitting market order"
        );
        self.session.invoke(side.order_method(), &params).await
    }

    /// Places a limit order. `direction` is `long` or `short` (any case).
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for an unknown direction, an empty
    /// instrument or a non-positive amount or price, otherwise any error from the call.
    pub async fn get_limit_order(
        &self,
        instrument: &str,
        amount: f64,
        direction: &str,
        price: f64,
        post_only: bool,
        reduce_only: bool,
    ) -> DeribitWsResult<Value> {
        let side = DeribitDirection::parse(direction)?;
        validate_name("instrument", instrument)?;
        validate_positive("amount", amount)?;
        validate_positive("price", price)?;

        let params = DeribitOrderParams::builder()
            .instrument_name(instrument)
            .amount(amount)
            .order_type(DeribitOrderType::Limit)
            .price(price)
            .post_only(post_only)
            .reduce_only(reduce_only)
            .build()
            .map_err(|e| DeribitWsError::InvalidArgument(e.to_string()))?;
        tracing::info!(
            instrument = %instrument,
            amount,
            price,
            side = %side,
            "Submitting limit order"
        );
        self.session.invoke(side.order_method(), &params).await
    }

    /// Requests chart data between two millisecond timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for an empty instrument or `start > end`,
    /// otherwise any error from the call.
    pub async fn get_data(
        &self,
        instrument: &str,
        start_ms: i64,
        end_ms: i64,
        resolution: DeribitResolution,
    ) -> DeribitWsResult<Value> {
        validate_name("instrument", instrument)?;
        validate_window(start_ms, end_ms)?;

        let params = GetChartDataParams {
            instrument_name: instrument.to_string(),
            start_timestamp: start_ms,
            end_timestamp: end_ms,
            resolution,
        };
        self.session.invoke(METHOD_GET_CHART_DATA, &params).await
    }

    /// Requests chart data and converts it to candles.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::get_data`], or [`DeribitWsError::Decode`] if the
    /// result does not have the chart-data shape.
    pub async fn get_chart_bars(
        &self,
        instrument: &str,
        start_ms: i64,
        end_ms: i64,
        resolution: DeribitResolution,
    ) -> DeribitWsResult<Vec<DeribitChartBar>> {
        let result = self.get_data(instrument, start_ms, end_ms, resolution).await?;
        parse_chart_bars(&result)
    }

    /// Requests the order book. `depth` defaults to 5.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for an empty instrument or zero depth,
    /// otherwise any error from the call.
    pub async fn get_orderbook(
        &self,
        instrument: &str,
        depth: Option<u32>,
    ) -> DeribitWsResult<Value> {
        validate_name("instrument", instrument)?;

        let mut params = GetOrderBookParams::new(instrument);
        if let Some(depth) = depth {
            validate_non_zero("depth", depth)?;
            params.depth = depth;
        }
        self.session.invoke(METHOD_GET_ORDER_BOOK, &params).await
    }

    /// Returns the last traded price of `instrument`.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for an empty instrument,
    /// [`DeribitWsError::Decode`] if the ticker has no numeric `last_price`, otherwise any
    /// error from the call.
    pub async fn get_quote(&self, instrument: &str) -> DeribitWsResult<f64> {
        validate_name("instrument", instrument)?;

        let params = TickerParams {
            instrument_name: instrument.to_string(),
        };
        let result = self.session.invoke(METHOD_TICKER, &params).await?;
        extract_last_price(&result)
    }

    /// Returns the current value of an index (e.g., `btc_usd`).
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for an empty index name,
    /// [`DeribitWsError::Decode`] if the result has no numeric `index_price`, otherwise any
    /// error from the call.
    pub async fn get_index_price(&self, index_name: &str) -> DeribitWsResult<f64> {
        validate_name("index_name", index_name)?;

        let params = GetIndexPriceParams {
            index_name: index_name.to_string(),
        };
        let result = self.session.invoke(METHOD_GET_INDEX_PRICE, &params).await?;
        extract_index_price(&result)
    }

    /// Requests the account summary. `extended` defaults to `true`.
    ///
    /// # Errors
    ///
    /// Returns any error from the call.
    pub async fn get_account_summary(
        &self,
        currency: DeribitCurrency,
        extended: Option<bool>,
    ) -> DeribitWsResult<Value> {
        let params = GetAccountSummaryParams {
            currency,
            extended: extended.unwrap_or(true),
        };
        self.session
            .invoke(METHOD_GET_ACCOUNT_SUMMARY, &params)
            .await
    }

    /// Requests open positions.
    ///
    /// # Errors
    ///
    /// Returns any error from the call.
    pub async fn get_positions(&self, currency: DeribitCurrency) -> DeribitWsResult<Value> {
        self.session
            .invoke(METHOD_GET_POSITIONS, &CurrencyParams { currency })
            .await
    }

    /// Lists instrument names. `expired` defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::Decode`] if an entry has no `instrument_name`, otherwise any
    /// error from the call.
    pub async fn available_instruments(
        &self,
        currency: DeribitCurrency,
        kind: Option<DeribitInstrumentKind>,
        expired: Option<bool>,
    ) -> DeribitWsResult<Vec<String>> {
        let result = self.request_instruments(currency, kind, expired).await?;
        extract_instrument_names(&result)
    }

    /// Lists instrument definitions. `expired` defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::Decode`] if an entry does not match [`DeribitInstrument`],
    /// otherwise any error from the call.
    pub async fn get_instruments(
        &self,
        currency: DeribitCurrency,
        kind: Option<DeribitInstrumentKind>,
        expired: Option<bool>,
    ) -> DeribitWsResult<Vec<DeribitInstrument>> {
        let result = self.request_instruments(currency, kind, expired).await?;
        parse_instruments(&result)
    }

    async fn request_instruments(
        &self,
        currency: DeribitCurrency,
        kind: Option<DeribitInstrumentKind>,
        expired: Option<bool>,
    ) -> DeribitWsResult<Value> {
        let params = GetInstrumentsParams {
            currency,
            kind,
            expired: expired.unwrap_or(false),
        };
        self.session.invoke(METHOD_GET_INSTRUMENTS, &params).await
    }

    /// Requests volatility index samples between two millisecond timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] if `start > end`, otherwise any error from
    /// the call.
    pub async fn get_volatility_index_data(
        &self,
        currency: DeribitCurrency,
        start_ms: i64,
        end_ms: i64,
        resolution: DeribitVolatilityResolution,
    ) -> DeribitWsResult<Value> {
        validate_window(start_ms, end_ms)?;

        let params = GetVolatilityIndexDataParams {
            currency,
            start_timestamp: start_ms,
            end_timestamp: end_ms,
            resolution,
        };
        self.session
            .invoke(METHOD_GET_VOLATILITY_INDEX_DATA, &params)
            .await
    }

    /// Requests own trades between two millisecond timestamps. `include_old` defaults to `true`.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] if `start > end` or `count` is zero,
    /// otherwise any error from the call.
    pub async fn get_user_trades_by_currency_time(
        &self,
        currency: DeribitCurrency,
        kind: DeribitInstrumentKind,
        start_ms: i64,
        end_ms: i64,
        count: u32,
        include_old: Option<bool>,
    ) -> DeribitWsResult<Value> {
        validate_window(start_ms, end_ms)?;
        validate_non_zero("count", count)?;

        let mut builder = GetUserTradesByCurrencyAndTimeParams::builder();
        builder
            .currency(currency)
            .kind(kind)
            .start_timestamp(start_ms)
            .end_timestamp(end_ms)
            .count(count);
        if let Some(include_old) = include_old {
            builder.include_old(include_old);
        }
        let params = builder
            .build()
            .map_err(|e| DeribitWsError::InvalidArgument(e.to_string()))?;

        self.session
            .invoke(METHOD_GET_USER_TRADES_BY_CURRENCY_AND_TIME, &params)
            .await
    }

    /// Requests the most recent option trade.
    ///
    /// # Errors
    ///
    /// Returns any error from the call.
    pub async fn get_user_trades(&self, currency: DeribitCurrency) -> DeribitWsResult<Value> {
        let params = GetUserTradesByCurrencyParams::latest(currency, DeribitInstrumentKind::Option);
        self.session
            .invoke(METHOD_GET_USER_TRADES_BY_CURRENCY, &params)
            .await
    }

    /// Requests the most recent future trade.
    ///
    /// # Errors
    ///
    /// Returns any error from the call.
    pub async fn get_user_trades_future(
        &self,
        currency: DeribitCurrency,
    ) -> DeribitWsResult<Value> {
        let params = GetUserTradesByCurrencyParams::latest(currency, DeribitInstrumentKind::Future);
        self.session
            .invoke(METHOD_GET_USER_TRADES_BY_CURRENCY, &params)
            .await
    }

    /// Requests the transaction log for the `lookback` window ending now.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for a negative lookback, otherwise any
    /// error from the call.
    pub async fn get_transaction_log(
        &self,
        currency: DeribitCurrency,
        lookback: Duration,
    ) -> DeribitWsResult<Value> {
        let (start_timestamp, end_timestamp) = lookback_window_ms(unix_time_millis(), lookback)?;

        let params = GetTransactionLogParams {
            currency,
            start_timestamp,
            end_timestamp,
        };
        self.session
            .invoke(METHOD_GET_TRANSACTION_LOG, &params)
            .await
    }

    /// Requests subaccount details.
    ///
    /// # Errors
    ///
    /// Returns any error from the call.
    pub async fn get_subaccounts_details(
        &self,
        currency: DeribitCurrency,
    ) -> DeribitWsResult<Value> {
        self.session
            .invoke(METHOD_GET_SUBACCOUNTS_DETAILS, &CurrencyParams { currency })
            .await
    }
}

fn validate_name(field: &str, value: &str) -> DeribitWsResult<()> {
    if value.trim().is_empty() {
        return Err(DeribitWsError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> DeribitWsResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DeribitWsError::InvalidArgument(format!(
            "{field} must be a positive number, was {value}"
        )));
    }
    Ok(())
}

fn validate_non_zero(field: &str, value: u32) -> DeribitWsResult<()> {
    if value == 0 {
        return Err(DeribitWsError::InvalidArgument(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

fn validate_window(start_ms: i64, end_ms: i64) -> DeribitWsResult<()> {
    if start_ms > end_ms {
        return Err(DeribitWsError::InvalidArgument(format!(
            "start_timestamp {start_ms} is after end_timestamp {end_ms}"
        )));
    }
    Ok(())
}
