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

//! Narrowing of decoded `result` values into the shapes the client returns.
//!
//! Every function here is pure: it only reads the value it is given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ustr::Ustr;

use super::error::{DeribitWsError, DeribitWsResult};
use crate::common::enums::DeribitInstrumentKind;

/// Instrument definition returned by `public/get_instruments`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeribitInstrument {
    /// Unique instrument identifier (e.g., "BTC-PERPETUAL")
    pub instrument_name: Ustr,
    pub kind: DeribitInstrumentKind,
    /// The underlying currency being traded
    pub base_currency: Ustr,
    /// The currency in which prices are quoted
    pub quote_currency: Ustr,
    /// Minimal price change
    pub tick_size: f64,
    pub contract_size: f64,
    pub min_trade_amount: f64,
    pub is_active: bool,
    /// Expiry (milliseconds since UNIX epoch), absent for spot
    #[serde(default)]
    pub expiration_timestamp: Option<i64>,
}

/// Column-oriented candles as returned by `public/get_tradingview_chart_data`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DeribitChartData {
    /// Bar open times (milliseconds since UNIX epoch)
    pub ticks: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub cost: Vec<f64>,
    /// "ok" or "no_data"
    #[serde(default)]
    pub status: String,
}

/// One OHLCV candle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeribitChartBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub cost: f64,
}

fn extract_f64(result: &Value, field: &str) -> DeribitWsResult<f64> {
    result
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| DeribitWsError::Decode(format!("result has no numeric `{field}`")))
}

/// Extracts `last_price` from a `public/ticker` result.
///
/// # Errors
///
/// Returns [`DeribitWsError::Decode`] if the field is missing or not a number.
pub fn extract_last_price(result: &Value) -> DeribitWsResult<f64> {
    extract_f64(result, "last_price")
}

/// Extracts `index_price` from a `public/get_index_price` result.
///
/// # Errors
///
/// Returns [`DeribitWsError::Decode`] if the field is missing or not a number.
pub fn extract_index_price(result: &Value) -> DeribitWsResult<f64> {
    extract_f64(result, "index_price")
}

/// Collects the `instrument_name` of every entry of a `public/get_instruments` result,
/// preserving order.
///
/// # Errors
///
/// Returns [`DeribitWsError::Decode`] if the result is not an array or an entry lacks a
/// string `instrument_name`.
pub fn extract_instrument_names(result: &Value) -> DeribitWsResult<Vec<String>> {
    let entries = result
        .as_array()
        .ok_or_else(|| DeribitWsError::Decode("instruments result is not an array".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get("instrument_name")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| {
                    DeribitWsError::Decode(format!("instrument {i} has no `instrument_name`"))
                })
        })
        .collect()
}

/// Parses a `public/get_instruments` result into typed definitions.
///
/// # Errors
///
/// Returns [`DeribitWsError::Decode`] if any entry does not match [`DeribitInstrument`].
pub fn parse_instruments(result: &Value) -> DeribitWsResult<Vec<DeribitInstrument>> {
    Ok(Vec::<DeribitInstrument>::deserialize(result)?)
}

/// Converts a chart-data result into row-oriented candles.
///
/// # Errors
///
/// Returns [`DeribitWsError::Decode`] if the result does not have the chart-data shape, the
/// columns differ in length, or a tick is outside the representable time range.
pub fn parse_chart_bars(result: &Value) -> DeribitWsResult<Vec<DeribitChartBar>> {
    let data = DeribitChartData::deserialize(result)?;
    let len = data.ticks.len();

    let columns = [
        ("open", data.open.len()),
        ("high", data.high.len()),
        ("low", data.low.len()),
        ("close", data.close.len()),
        ("volume", data.volume.len()),
        ("cost", data.cost.len()),
    ];
    if let Some((name, other)) = columns.iter().find(|(_, n)| *n != len) {
        return Err(DeribitWsError::Decode(format!(
            "chart column `{name}` has {other} values, expected {len}"
        )));
    }

    (0..len)
        .map(|i| {
            let ticks = data.ticks[i];
            let timestamp = DateTime::<Utc>::from_timestamp_millis(ticks).ok_or_else(|| {
                DeribitWsError::Decode(format!("chart tick {ticks} is out of range"))
            })?;
            Ok(DeribitChartBar {
                timestamp,
                open: data.open[i],
                high: data.high[i],
                low: data.low[i],
                close: data.close[i],
                volume: data.volume[i],
                cost: data.cost[i],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::common::testing::load_test_result;

    #[rstest]
    fn test_extract_last_price() {
        let result = load_test_result("ws_ticker.json");

        assert_eq!(extract_last_price(&result).unwrap(), 50000.5);
    }

    #[rstest]
    fn test_extract_last_price_is_idempotent() {
        let result = load_test_result("ws_ticker.json");
        let before = result.clone();

        let first = extract_last_price(&result).unwrap();
        let second = extract_last_price(&result).unwrap();

        assert_eq!(first, second);
        assert_eq!(result, before);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"last_price": null}))]
    #[case(json!({"last_price": "50000.5"}))]
    #[case(json!([50000.5]))]
    fn test_extract_last_price_rejects_bad_shape(#[case] result: Value) {
        let err = extract_last_price(&result).unwrap_err();

        assert!(matches!(err, DeribitWsError::Decode(_)));
    }

    #[rstest]
    fn test_extract_index_price() {
        let result = load_test_result("ws_index_price.json");

        assert_eq!(extract_index_price(&result).unwrap(), 49998.71);
    }

    #[rstest]
    fn test_extract_instrument_names() {
        let result = load_test_result("ws_get_instruments.json");

        assert_eq!(
            extract_instrument_names(&result).unwrap(),
            vec!["BTC-PERPETUAL".to_string(), "BTC-27DEC24".to_string()]
        );
    }

    #[rstest]
    fn test_extract_instrument_names_empty() {
        assert!(extract_instrument_names(&json!([])).unwrap().is_empty());
    }

    #[rstest]
    #[case(json!({"instrument_name": "BTC-PERPETUAL"}))]
    #[case(json!([{"instrument_name": "BTC-PERPETUAL"}, {"kind": "future"}]))]
    fn test_extract_instrument_names_rejects_bad_shape(#[case] result: Value) {
        let err = extract_instrument_names(&result).unwrap_err();

        assert!(matches!(err, DeribitWsError::Decode(_)));
    }

    #[rstest]
    fn test_parse_instruments() {
        let result = load_test_result("ws_get_instruments.json");

        let instruments = parse_instruments(&result).unwrap();

        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[0].instrument_name.as_str(), "BTC-PERPETUAL");
        assert_eq!(instruments[0].kind, DeribitInstrumentKind::Future);
        assert_eq!(instruments[1].tick_size, 2.5);
        assert_eq!(instruments[1].expiration_timestamp, Some(1_735_286_400_000));
    }

    #[rstest]
    fn test_parse_chart_bars() {
        let result = load_test_result("ws_chart_data.json");

        let bars = parse_chart_bars(&result).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(bars[0].open, 50000.0);
        assert_eq!(bars[0].close, 50012.5);
        assert_eq!(bars[1].high, 50030.0);
        assert_eq!(bars[2].volume, 0.0);
    }

    #[rstest]
    fn test_parse_chart_bars_rejects_ragged_columns() {
        let result = json!({
            "ticks": [1, 2],
            "open": [1.0, 2.0],
            "high": [1.0, 2.0],
            "low": [1.0],
            "close": [1.0, 2.0],
            "volume": [1.0, 2.0],
            "cost": [1.0, 2.0],
            "status": "ok",
        });

        let err = parse_chart_bars(&result).unwrap_err();

        assert!(matches!(err, DeribitWsError::Decode(msg) if msg.contains("low")));
    }

    #[rstest]
    fn test_parse_chart_bars_no_data() {
        let result = json!({
            "ticks": [], "open": [], "high": [], "low": [],
            "close": [], "volume": [], "cost": [], "status": "no_data",
        });

        assert!(parse_chart_bars(&result).unwrap().is_empty());
    }
}
