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

//! Deribit API credential storage for the `client_credentials` grant.

use core::fmt::Debug;

use zeroize::ZeroizeOnDrop;

/// Client id and secret used once, when a session authenticates.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credential {
    client_id: Box<str>,
    client_secret: Box<str>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credential))
            .field("client_id", &self.masked_client_id())
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credential {
    /// Creates a new [`Credential`] instance from the client id and secret.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into().into_boxed_str(),
            client_secret: client_secret.into().into_boxed_str(),
        }
    }

    /// Returns the client id associated with this credential.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret associated with this credential.
    ///
    /// The secret must never be logged.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns a masked version of the client id for logging purposes.
    ///
    /// Shows the first 4 and last 4 characters with an ellipsis in between.
    /// Ids of 8 characters or fewer are fully masked.
    #[must_use]
    pub fn masked_client_id(&self) -> String {
        let chars: Vec<char> = self.client_id.chars().collect();
        let len = chars.len();

        if len <= 8 {
            "*".repeat(len)
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[len - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}
