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

//! Enumerations for Deribit order and market-data parameters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::consts::{METHOD_BUY, METHOD_SELL};
use crate::websocket::error::DeribitWsError;

/// Order side, parsed from the caller's position direction.
///
/// `long` maps to `buy` and `short` maps to `sell` (case-insensitive). Any other input is
/// rejected before a request is built.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeribitDirection {
    /// Opens or adds to a long position.
    Buy,
    /// Opens or adds to a short position.
    Sell,
}

impl DeribitDirection {
    /// Parses a position direction (`long` or `short`, any case).
    ///
    /// # Errors
    ///
    /// Returns [`DeribitWsError::InvalidArgument`] for any other value.
    pub fn parse(value: &str) -> Result<Self, DeribitWsError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Self::Buy),
            "short" => Ok(Self::Sell),
            other => Err(DeribitWsError::InvalidArgument(format!(
                "direction must be long or short, was `{other}`"
            ))),
        }
    }

    /// Returns the JSON-RPC order method for this side.
    #[must_use]
    pub const fn order_method(&self) -> &'static str {
        match self {
            Self::Buy => METHOD_BUY,
            Self::Sell => METHOD_SELL,
        }
    }
}

impl FromStr for DeribitDirection {
    type Err = DeribitWsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Deribit order type.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeribitOrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
}

/// Deribit instrument kind.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeribitInstrumentKind {
    /// Future contract
    Future,
    /// Option contract
    Option,
    /// Spot market
    Spot,
    /// Future combo
    FutureCombo,
    /// Option combo
    OptionCombo,
}

/// Deribit currency.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DeribitCurrency {
    /// Bitcoin
    BTC,
    /// Ethereum
    ETH,
    /// USD Coin
    USDC,
    /// Tether
    USDT,
    /// Euro stablecoin
    EURR,
    /// All currencies
    #[serde(rename = "any")]
    #[strum(serialize = "any")]
    ANY,
}

/// Candle resolution for `public/get_tradingview_chart_data`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum DeribitResolution {
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    Minute1,
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    Minute3,
    #[serde(rename = "5")]
    #[strum(serialize = "5")]
    Minute5,
    #[serde(rename = "10")]
    #[strum(serialize = "10")]
    Minute10,
    #[serde(rename = "15")]
    #[strum(serialize = "15")]
    Minute15,
    #[serde(rename = "30")]
    #[strum(serialize = "30")]
    Minute30,
    #[serde(rename = "60")]
    #[strum(serialize = "60")]
    Hour1,
    #[serde(rename = "120")]
    #[strum(serialize = "120")]
    Hour2,
    #[serde(rename = "180")]
    #[strum(serialize = "180")]
    Hour3,
    #[serde(rename = "360")]
    #[strum(serialize = "360")]
    Hour6,
    #[serde(rename = "720")]
    #[strum(serialize = "720")]
    Hour12,
    #[serde(rename = "1D")]
    #[strum(serialize = "1D")]
    Day1,
}

/// Sample resolution for `public/get_volatility_index_data`, in seconds (or `1D`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum DeribitVolatilityResolution {
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    Second1,
    #[serde(rename = "60")]
    #[strum(serialize = "60")]
    Minute1,
    #[serde(rename = "3600")]
    #[strum(serialize = "3600")]
    Hour1,
    #[serde(rename = "43200")]
    #[strum(serialize = "43200")]
    Hour12,
    #[serde(rename = "1D")]
    #[strum(serialize = "1D")]
    Day1,
}
