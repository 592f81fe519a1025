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

//! Time helpers for millisecond-epoch request parameters.

use chrono::{Duration, Utc};

use crate::websocket::error::{DeribitWsError, DeribitWsResult};

/// Returns the current UNIX time in milliseconds.
#[must_use]
pub fn unix_time_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Returns the `(start, end)` millisecond window ending at `now_ms` and spanning `lookback`.
///
/// # Errors
///
/// Returns [`DeribitWsError::InvalidArgument`] if `lookback` is negative or does not fit the
/// millisecond range before `now_ms`.
pub fn lookback_window_ms(now_ms: i64, lookback: Duration) -> DeribitWsResult<(i64, i64)> {
    let lookback_ms = lookback.num_milliseconds();
    if lookback_ms < 0 {
        return Err(DeribitWsError::InvalidArgument(format!(
            "lookback must not be negative, was {lookback_ms}ms"
        )));
    }

    let start_ms = now_ms.checked_sub(lookback_ms).ok_or_else(|| {
        DeribitWsError::InvalidArgument(format!("lookback of {lookback_ms}ms is out of range"))
    })?;

    Ok((start_ms, now_ms))
}
