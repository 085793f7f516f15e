/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use reqwest::{
    header::HeaderMap, header::HeaderValue, header::ACCEPT, header::CONTENT_TYPE,
    Client as HttpClient, ClientBuilder as HttpClientBuilder, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::RedfishError;

pub const REDFISH_ROOT: &str = "/redfish/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
// BMCs are slow, low-powered boards. Bound total in-flight requests
// across all hosts of an invocation so host-list runs don't pile on.
const MAX_IN_FLIGHT: usize = 50;

const TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Debug)]
pub struct TransportPoolBuilder {
    timeout: Duration,
    accept_invalid_certs: bool,
    max_in_flight: usize,
}

impl TransportPoolBuilder {
    /// Prevents the transport from accepting self signed certificates
    /// and other invalid certificates.
    ///
    /// By default self signed certificates are accepted, since BMCs
    /// usually use those.
    pub fn reject_invalid_certs(mut self) -> TransportPoolBuilder {
        self.accept_invalid_certs = false;
        self
    }

    /// Overwrites the timeout that will be applied to every request
    pub fn timeout(mut self, timeout: Duration) -> TransportPoolBuilder {
        self.timeout = timeout;
        self
    }

    /// Overwrites the global in-flight request bound
    pub fn max_in_flight(mut self, n: usize) -> TransportPoolBuilder {
        self.max_in_flight = n;
        self
    }

    pub fn build(&self) -> Result<TransportPool, RedfishError> {
        let http = HttpClientBuilder::new()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout)
            .build()
            .expect("reqwest client construction cannot fail with these options");
        Ok(TransportPool {
            http,
            limiter: Arc::new(Semaphore::new(self.max_in_flight)),
        })
    }
}

/// Endpoint of one BMC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address. A `scheme://` prefix is honored as-is,
    /// otherwise HTTPS is assumed.
    pub host: String,
    /// BMC port. If absent the default HTTPS port 443 will be used
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
}

/// Shared HTTP client plus the invocation-wide concurrency limiter.
/// One pool serves every host of a host-list run.
#[derive(Debug, Clone)]
pub struct TransportPool {
    http: HttpClient,
    limiter: Arc<Semaphore>,
}

impl TransportPool {
    pub fn builder() -> TransportPoolBuilder {
        TransportPoolBuilder {
            timeout: DEFAULT_TIMEOUT,
            // BMCs often have a self-signed cert, so usually this has to be true
            accept_invalid_certs: true,
            max_in_flight: MAX_IN_FLIGHT,
        }
    }

    /// A transport bound to one BMC, sharing this pool's connection
    /// pool and in-flight bound.
    pub fn transport(&self, endpoint: Endpoint) -> Transport {
        Transport {
            http: self.http.clone(),
            limiter: self.limiter.clone(),
            endpoint,
            token: RwLock::new(None),
            cache: Mutex::new(HashMap::new()),
        }
    }
}

/// A fully buffered response. Kept cheap to clone so GET memoization
/// can hand out copies.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self, url: &str) -> Result<serde_json::Value, RedfishError> {
        serde_json::from_str(&self.body).map_err(|_| RedfishError::ResponseUnreadable {
            url: url.to_string(),
            body: self.body.clone(),
        })
    }

    pub fn parse<T: DeserializeOwned>(&self, url: &str) -> Result<T, RedfishError> {
        serde_json::from_str(&self.body).map_err(|_| RedfishError::ResponseUnreadable {
            url: url.to_string(),
            body: self.body.clone(),
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Authenticated request wrapper for one BMC. Uses the session token
/// once one is set; falls back to basic auth before that (session
/// bootstrap is the only request that legitimately runs without one).
pub struct Transport {
    http: HttpClient,
    limiter: Arc<Semaphore>,
    endpoint: Endpoint,
    token: RwLock<Option<String>>,
    cache: Mutex<HashMap<String, Response>>,
}

impl Transport {
    pub fn host(&self) -> &str {
        &self.endpoint.host
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn set_token(&self, token: String) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    pub fn url(&self, uri: &str) -> String {
        if self.endpoint.host.contains("://") {
            return format!("{}{}", self.endpoint.host.trim_end_matches('/'), uri);
        }
        match self.endpoint.port {
            Some(p) => format!("https://{}:{}{}", self.endpoint.host, p, uri),
            None => format!("https://{}{}", self.endpoint.host, uri),
        }
    }

    /// Drop the memoized GET for a resource the caller just mutated.
    pub fn invalidate(&self, uri: &str) {
        let mut cache = self.cache.lock().expect("cache lock poisoned");
        cache.remove(&cache_key(uri, false));
        cache.remove(&cache_key(uri, true));
    }

    /// Issue one request. Network-level failures either surface as
    /// `Communication` or, with `continue_on_err`, come back as
    /// `Ok(None)`. HTTP-level failures never raise here: callers
    /// inspect `Response::status` and use [`error_from_response`].
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&serde_json::Value>,
        continue_on_err: bool,
    ) -> Result<Option<Response>, RedfishError> {
        if method == Method::GET {
            let cache = self.cache.lock().expect("cache lock poisoned");
            if let Some(hit) = cache.get(&cache_key(uri, continue_on_err)) {
                debug!("cache hit {}", uri);
                return Ok(Some(hit.clone()));
            }
        }

        let result = self.send(method.clone(), uri, body).await;
        match result {
            Ok(resp) => {
                let mut cache = self.cache.lock().expect("cache lock poisoned");
                if method == Method::GET {
                    if resp.ok() {
                        cache.insert(cache_key(uri, continue_on_err), resp.clone());
                    }
                } else {
                    // A write to this URI makes any memoized read stale.
                    cache.remove(&cache_key(uri, false));
                    cache.remove(&cache_key(uri, true));
                }
                Ok(Some(resp))
            }
            Err(e) if continue_on_err => {
                warn!("continuing past failed {} {}: {}", method, uri, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// GET that raises on network failure, never on HTTP status.
    /// Memoized like every other GET.
    pub async fn get(&self, uri: &str) -> Result<Response, RedfishError> {
        self.request(Method::GET, uri, None, false)
            .await
            .map(|r| r.expect("request without continue_on_err always yields a response"))
    }

    /// GET that additionally demands a 2XX and a parseable body.
    pub async fn get_ok<T: DeserializeOwned>(&self, uri: &str) -> Result<T, RedfishError> {
        let resp = self.get(uri).await?;
        let resp = self.expect_ok(resp, uri)?;
        resp.parse(uri)
    }

    pub async fn post(
        &self,
        uri: &str,
        body: &serde_json::Value,
    ) -> Result<Response, RedfishError> {
        self.request(Method::POST, uri, Some(body), false)
            .await
            .map(|r| r.expect("request without continue_on_err always yields a response"))
    }

    pub async fn patch(
        &self,
        uri: &str,
        body: &serde_json::Value,
    ) -> Result<Response, RedfishError> {
        self.request(Method::PATCH, uri, Some(body), false)
            .await
            .map(|r| r.expect("request without continue_on_err always yields a response"))
    }

    pub async fn delete(&self, uri: &str) -> Result<Response, RedfishError> {
        self.request(Method::DELETE, uri, None, false)
            .await
            .map(|r| r.expect("request without continue_on_err always yields a response"))
    }

    /// Shared status check: 401 is an authentication error everywhere,
    /// any other non-2XX goes through the vendor error body handler.
    pub fn expect_ok(&self, resp: Response, uri: &str) -> Result<Response, RedfishError> {
        if resp.status == StatusCode::UNAUTHORIZED {
            return Err(RedfishError::Auth {
                url: self.url(uri),
                reason: "credentials rejected".to_string(),
            });
        }
        if !resp.ok() {
            return Err(error_from_response(&self.url(uri), &resp));
        }
        Ok(resp)
    }

    // All the HTTP requests happen from here.
    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, RedfishError> {
        let url = self.url(uri);
        let body_enc = match body {
            Some(b) => Some(serde_json::to_string(b).map_err(|e| RedfishError::Serialize {
                url: url.clone(),
                source: e,
            })?),
            None => None,
        };

        // Never closed; held only for the duration of one request.
        let _permit = self
            .limiter
            .acquire()
            .await
            .expect("transport limiter closed");

        debug!(
            "TX {} {} {}",
            method,
            url,
            body_enc.as_deref().unwrap_or_default()
        );

        let mut req = self
            .http
            .request(method, &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let token = self
            .token
            .read()
            .expect("token lock poisoned")
            .clone();
        req = match token {
            Some(t) => req.header(TOKEN_HEADER, t),
            None => req.basic_auth(&self.endpoint.user, Some(&self.endpoint.password)),
        };
        if let Some(b) = body_enc {
            req = req.body(b);
        }

        let response = req.send().await.map_err(|e| RedfishError::Communication {
            url: url.clone(),
            source: e,
        })?;
        let status = response.status();
        let headers = response.headers().clone();
        // Read the body even on non-2XX, BMCs put useful messages there.
        let body = response
            .text()
            .await
            .map_err(|e| RedfishError::Communication {
                url: url.clone(),
                source: e,
            })?;
        if body.is_empty() {
            debug!("RX {status}");
        } else {
            debug!("RX {status} {body}");
        }
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn cache_key(uri: &str, continue_on_err: bool) -> String {
    format!("{continue_on_err}:{uri}")
}

/// The shared error handler for non-2XX responses: surface the vendor's
/// `error.@Message.ExtendedInfo[0].Message` when the body carries one,
/// otherwise flag the body as unreadable.
pub fn error_from_response(url: &str, resp: &Response) -> RedfishError {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&resp.body);
    match parsed {
        Ok(v) => {
            let reason = v
                .pointer("/error/@Message.ExtendedInfo/0/Message")
                .and_then(|m| m.as_str())
                .unwrap_or("no detail in response")
                .to_string();
            warn!("HTTP {} at {}: {}", resp.status, url, reason);
            RedfishError::RequestFailed {
                url: url.to_string(),
                status: resp.status,
                reason,
            }
        }
        Err(_) => RedfishError::ResponseUnreadable {
            url: url.to_string(),
            body: resp.body.clone(),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_vendor_message_surfaced() {
        let body = r#"{"error": {"@Message.ExtendedInfo": [
            {"Message": "Pending configuration values are already committed."}
        ]}}"#;
        let err = error_from_response("https://bmc/redfish/v1/Jobs", &response(400, body));
        match err {
            RedfishError::RequestFailed { status, reason, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(reason, "Pending configuration values are already committed.");
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_is_unreadable() {
        let err = error_from_response("https://bmc/x", &response(500, "<html>boom</html>"));
        assert!(matches!(err, RedfishError::ResponseUnreadable { .. }));
    }

    #[test]
    fn test_json_without_vendor_message() {
        let err = error_from_response("https://bmc/x", &response(503, r#"{"error": {}}"#));
        match err {
            RedfishError::RequestFailed { reason, .. } => {
                assert_eq!(reason, "no detail in response");
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_url_building() {
        let pool = TransportPool::builder().build().unwrap();
        let t = pool.transport(Endpoint {
            host: "mgmt-f01-h02-r640.example.com".to_string(),
            ..Default::default()
        });
        assert_eq!(
            t.url("/redfish/v1/Systems"),
            "https://mgmt-f01-h02-r640.example.com/redfish/v1/Systems"
        );

        let t = pool.transport(Endpoint {
            host: "10.0.0.7".to_string(),
            port: Some(8443),
            ..Default::default()
        });
        assert_eq!(t.url("/redfish/v1"), "https://10.0.0.7:8443/redfish/v1");

        // Explicit scheme is honored, for test servers without TLS.
        let t = pool.transport(Endpoint {
            host: "http://127.0.0.1:9000/".to_string(),
            ..Default::default()
        });
        assert_eq!(t.url("/redfish/v1"), "http://127.0.0.1:9000/redfish/v1");
    }
}
