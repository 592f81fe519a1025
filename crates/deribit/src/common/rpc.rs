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

//! JSON-RPC 2.0 envelope codec for the Deribit WebSocket API.
//!
//! Outbound calls are wrapped in a fixed envelope (`jsonrpc`, `id`, `method`, `params`).
//! Inbound frames are parsed into [`DeribitJsonRpcResponse`] without classifying an `error`
//! member; the session decides what an upstream error means for the call.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::consts::{DERIBIT_REQUEST_ID, JSONRPC_VERSION};
use crate::websocket::error::{DeribitWsError, DeribitWsResult};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DeribitJsonRpcRequest<T> {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: &'static str,
    /// Request ID.
    pub id: u64,
    /// JSON-RPC method name.
    pub method: String,
    /// Method-specific parameters.
    pub params: T,
}

impl<T> DeribitJsonRpcRequest<T> {
    /// Creates a new JSON-RPC request.
    #[must_use]
    pub fn new(id: u64, method: impl Into<String>, params: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope.
///
/// `result` is kept as a generic [`Value`] because its shape depends on the method called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeribitJsonRpcResponse {
    /// JSON-RPC version.
    #[serde(default)]
    pub jsonrpc: String,
    /// Request ID echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Success result (mutually exclusive with error). An explicit `null` is kept as
    /// `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error details (mutually exclusive with result).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DeribitJsonRpcError>,
    /// Whether this is from testnet.
    #[serde(default)]
    pub testnet: bool,
    /// Server receive timestamp (microseconds).
    #[serde(default, rename = "usIn")]
    pub us_in: Option<u64>,
    /// Server send timestamp (microseconds).
    #[serde(default, rename = "usOut")]
    pub us_out: Option<u64>,
    /// Processing time difference (microseconds).
    #[serde(default, rename = "usDiff")]
    pub us_diff: Option<u64>,
}

impl DeribitJsonRpcResponse {
    /// Consumes the response and returns its `result`.
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::DeribitError`] when the server reported an `error`, or
    /// [`DeribitWsError::Decode`] when the envelope carries neither `result` nor `error`.
    pub fn into_result(self) -> DeribitWsResult<Value> {
        if let Some(error) = self.error {
            return Err(DeribitWsError::DeribitError {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        self.result.ok_or_else(|| {
            DeribitWsError::Decode("Response contains neither result nor error".to_string())
        })
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeribitJsonRpcError {
    /// Error code.
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Additional error data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Display for DeribitJsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)?;
        if let Some(data) = &self.data {
            write!(f, " {data}")?;
        }
        Ok(())
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Serializes one outbound call into its wire text.
///
/// # Errors
///
/// Returns [`DeribitWsError::InvalidArgument`] if `method` is empty or `params` does not
/// serialize to a JSON object.
pub fn encode_request<P>(method: &str, params: &P) -> DeribitWsResult<String>
where
    P: Serialize + ?Sized,
{
    if method.trim().is_empty() {
        return Err(DeribitWsError::InvalidArgument(
            "method must not be empty".to_string(),
        ));
    }

    let params = serde_json::to_value(params).map_err(|e| {
        DeribitWsError::InvalidArgument(format!("params for {method} not serializable: {e}"))
    })?;

    if !params.is_object() {
        return Err(DeribitWsError::InvalidArgument(format!(
            "params for {method} must be a JSON object, was {params}"
        )));
    }

    let request = DeribitJsonRpcRequest::new(DERIBIT_REQUEST_ID, method, params);
    serde_json::to_string(&request).map_err(|e| {
        DeribitWsError::InvalidArgument(format!("failed to serialize {method} request: {e}"))
    })
}

/// Parses one inbound frame into a response envelope.
///
/// An `error` member is not treated as a failure here.
///
/// # Errors
///
/// Returns [`DeribitWsError::Decode`] if the text is not a well-formed JSON object.
pub fn decode_response(text: &str) -> DeribitWsResult<DeribitJsonRpcResponse> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| DeribitWsError::Decode(format!("Invalid JSON-RPC frame: {e}")))?;

    if !value.is_object() {
        return Err(DeribitWsError::Decode(format!(
            "JSON-RPC frame must be an object, was {value}"
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| DeribitWsError::Decode(format!("Invalid JSON-RPC envelope: {e}")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::common::testing::load_test_json;

    #[rstest]
    fn test_encode_request_envelope() {
        let params = json!({"instrument_name": "BTC-PERPETUAL"});
        let text = encode_request("public/ticker", &params).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 0,
                "method": "public/ticker",
                "params": {"instrument_name": "BTC-PERPETUAL"},
            })
        );
    }

    #[rstest]
    fn test_encode_then_decode_echo_keeps_method_and_params() {
        let params = json!({
            "instrument_name": "ETH-PERPETUAL",
            "amount": 10.5,
            "type": "limit",
            "post_only": true,
            "nested": {"list": [1, 2, 3]},
        });
        let text = encode_request("private/buy", &params).unwrap();

        let echoed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(echoed["method"], "private/buy");
        assert_eq!(echoed["params"], params);
    }

    #[rstest]
    fn test_encode_empty_params_object() {
        let params = serde_json::Map::new();
        let text = encode_request("public/get_index_price", &params).unwrap();

        assert!(text.contains("\"params\":{}"));
    }

    #[rstest]
    #[case(json!([1, 2]))]
    #[case(json!("text"))]
    #[case(Value::Null)]
    fn test_encode_rejects_non_object_params(#[case] params: Value) {
        let err = encode_request("public/ticker", &params).unwrap_err();
        assert!(matches!(err, DeribitWsError::InvalidArgument(_)));
    }

    #[rstest]
    fn test_encode_rejects_empty_method() {
        let err = encode_request(" ", &json!({})).unwrap_err();
        assert!(matches!(err, DeribitWsError::InvalidArgument(_)));
    }

    #[rstest]
    fn test_decode_result_response() {
        let response = decode_response(&load_test_json("ws_ticker.json")).unwrap();

        assert_eq!(response.id, Some(0));
        assert!(response.error.is_none());
        assert_eq!(response.us_out, Some(1_700_000_000_001_000));
        assert_eq!(
            response.into_result().unwrap()["last_price"],
            json!(50000.5)
        );
    }

    #[rstest]
    fn test_decode_error_response_is_not_a_failure() {
        let response = decode_response(&load_test_json("ws_error_not_enough_funds.json")).unwrap();
        let error = response.error.clone().unwrap();

        assert_eq!(error.code, 10009);
        assert_eq!(error.message, "not_enough_funds");
        assert!(response.result.is_none());
    }

    #[rstest]
    fn test_into_result_maps_error() {
        let response =
            decode_response(r#"{"id":0,"error":{"code":10009,"message":"not enough funds"}}"#)
                .unwrap();

        match response.into_result() {
            Err(DeribitWsError::DeribitError { code, message, data }) => {
                assert_eq!(code, 10009);
                assert_eq!(message, "not enough funds");
                assert!(data.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    fn test_into_result_keeps_explicit_null() {
        let response = decode_response(r#"{"id":0,"result":null}"#).unwrap();

        assert_eq!(response.into_result().unwrap(), Value::Null);
    }

    #[rstest]
    fn test_into_result_without_result_or_error() {
        let response = decode_response(r#"{"jsonrpc":"2.0","id":0}"#).unwrap();
        let err = response.into_result().unwrap_err();

        assert!(matches!(err, DeribitWsError::Decode(_)));
    }

    #[rstest]
    #[case("not json")]
    #[case("{\"id\":0,")]
    #[case("[1,2,3]")]
    #[case("42")]
    #[case("")]
    #[case(r#"{"id":"zero","result":1}"#)]
    fn test_decode_malformed_input(#[case] text: &str) {
        let err = decode_response(text).unwrap_err();
        assert!(matches!(err, DeribitWsError::Decode(_)), "{err:?}");
    }

    #[rstest]
    fn test_error_display() {
        let error = DeribitJsonRpcError {
            code: 13004,
            message: "invalid_credentials".to_string(),
            data: None,
        };
        assert_eq!(error.to_string(), "invalid_credentials (13004)");
    }
}
