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

//! Fetches a quote and an index price over an authenticated Deribit session.
//!
//! # Environment Variables
//!
//! - Testnet (default): `DERIBIT_TESTNET_API_KEY` and `DERIBIT_TESTNET_API_SECRET`
//! - Mainnet (`--mainnet`): `DERIBIT_API_KEY` and `DERIBIT_API_SECRET`
//!
//! # Usage
//!
//! ```bash
//! cargo run -p deribit-rpc --bin deribit-ws-quote -- BTC-PERPETUAL
//! cargo run -p deribit-rpc --bin deribit-ws-quote -- ETH-PERPETUAL --mainnet
//! ```

use anyhow::Context;
use deribit_rpc::{DeribitSessionConfig, DeribitWebSocketClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_testnet = !args.iter().any(|a| a == "--mainnet");
    let instrument = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map_or("BTC-PERPETUAL", String::as_str);

    let config = DeribitSessionConfig {
        use_testnet,
        ..Default::default()
    };

    let client = DeribitWebSocketClient::connect(&config)
        .await
        .context("failed to open Deribit session")?;

    let index_name = instrument
        .split('-')
        .next()
        .map(|base| format!("{}_usd", base.to_ascii_lowercase()))
        .context("instrument has no base currency")?;

    let result = async {
        let last_price = client.get_quote(instrument).await?;
        tracing::info!("{instrument} last price: {last_price}");

        let index_price = client.get_index_price(&index_name).await?;
        tracing::info!("{index_name} index price: {index_price}");
        anyhow::Ok(())
    }
    .await;

    client.close().await?;
    result
}
