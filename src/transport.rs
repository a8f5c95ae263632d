// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Outbound delivery for network targets.

use std::collections::BTreeMap;
use std::time::Duration;

/// A fully-resolved network destination: url, method, and headers as
/// declared in configuration.
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub(crate) url: String,
    pub(crate) method: String,
    pub(crate) headers: BTreeMap<String, String>,
}

impl Endpoint {
    /// The destination url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP method used for delivery.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request headers sent with every delivery.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Issues one outbound request per record.
///
/// The production implementation is [`HttpTransport`]; tests substitute
/// their own to observe or fail deliveries.
pub trait Transport: Send + 'static {
    /// Delivers `body` to `endpoint`.
    ///
    /// # Errors
    ///
    /// An error marks the delivery as failed and triggers fallback routing
    /// for the owning target.
    fn send(&self, endpoint: &Endpoint, body: &[u8]) -> anyhow::Result<()>;
}

/// HTTP transport backed by `ureq`.
///
/// Responses are read and discarded. A response carrying an error status
/// still counts as delivered; only transport-level failures (connection
/// refused, timeout, DNS) are reported to the caller.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with no request timeout.
    pub fn new() -> HttpTransport {
        HttpTransport::default()
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(timeout: Duration) -> HttpTransport {
        HttpTransport {
            timeout: Some(timeout),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, endpoint: &Endpoint, body: &[u8]) -> anyhow::Result<()> {
        let mut request = ureq::request(&endpoint.method, &endpoint.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        for (name, value) in &endpoint.headers {
            request = request.set(name, value);
        }
        request = request.set("content-length", &body.len().to_string());
        match request.send_bytes(body) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(..)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
