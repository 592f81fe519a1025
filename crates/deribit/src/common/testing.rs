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

//! Test fixtures for the Deribit client.

use std::path::PathBuf;

/// Returns the path to the crate's `test_data` directory.
#[must_use]
pub fn data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_data")
}

/// Loads a JSON fixture from `test_data` as text.
///
/// # Panics
///
/// Panics if the file cannot be read.
#[must_use]
pub fn load_test_json(filename: &str) -> String {
    std::fs::read_to_string(data_path().join(filename))
        .unwrap_or_else(|_| panic!("failed to read {filename}"))
}

/// Loads a JSON fixture and returns its `result` member.
///
/// # Panics
///
/// Panics if the file cannot be read or has no `result`.
#[must_use]
pub fn load_test_result(filename: &str) -> serde_json::Value {
    let value: serde_json::Value =
        serde_json::from_str(&load_test_json(filename)).expect("invalid json");
    value
        .get("result")
        .cloned()
        .unwrap_or_else(|| panic!("{filename} has no result"))
}
