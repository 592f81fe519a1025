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

//! URL helpers for the Deribit WebSocket API.

use super::consts::{DERIBIT_TESTNET_WS_URL, DERIBIT_WS_URL};

/// Returns the Deribit WebSocket URL for the given environment.
#[must_use]
pub const fn get_ws_url(is_testnet: bool) -> &'static str {
    if is_testnet {
        DERIBIT_TESTNET_WS_URL
    } else {
        DERIBIT_WS_URL
    }
}
