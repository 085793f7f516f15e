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
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::model::service_root::ServiceRoot;
use crate::transport::{Transport, REDFISH_ROOT};
use crate::RedfishError;

// Where the session collection lives moved between API revisions.
const SESSIONS_MODERN: &str = "/redfish/v1/SessionService/Sessions";
const SESSIONS_LEGACY: &str = "/redfish/v1/Sessions";

/// A live token session against one BMC. Created once per invocation;
/// after `open` succeeds every request on the transport carries the
/// token instead of basic auth.
#[derive(Debug)]
pub struct Session {
    pub resource_path: String,
}

impl Session {
    /// Exchange the transport's credentials for a session token.
    pub async fn open(t: &Transport) -> Result<Session, RedfishError> {
        let root: ServiceRoot = t.get_ok(REDFISH_ROOT).await?;
        let preferred = match root.version() {
            Some(v) if v >= (1, 4) => SESSIONS_MODERN,
            Some(_) => SESSIONS_LEGACY,
            None => SESSIONS_MODERN,
        };
        let path = probe_sessions_path(t, preferred).await?;

        let creds = serde_json::json!({
            "UserName": t.endpoint().user,
            "Password": t.endpoint().password,
        });
        let resp = t.post(path, &creds).await?;
        if resp.status == StatusCode::UNAUTHORIZED {
            return Err(RedfishError::Auth {
                url: t.url(path),
                reason: "invalid credentials".to_string(),
            });
        }
        let resp = t.expect_ok(resp, path)?;

        let token = resp
            .header("X-Auth-Token")
            .ok_or_else(|| RedfishError::ResourceNotFound {
                url: t.url(path),
                what: "X-Auth-Token header on session creation".to_string(),
            })?
            .to_string();
        let resource_path = resp
            .header("Location")
            .map(as_resource_path)
            .ok_or_else(|| RedfishError::ResourceNotFound {
                url: t.url(path),
                what: "Location header on session creation".to_string(),
            })?;

        t.set_token(token);
        debug!("session established at {}", resource_path);
        Ok(Session { resource_path })
    }

    /// Release the session. Best effort: any failure is logged and
    /// swallowed so teardown can never mask the primary operation's
    /// outcome. The transport token is cleared unconditionally.
    pub async fn close(self, t: &Transport) {
        match t
            .request(Method::DELETE, &self.resource_path, None, true)
            .await
        {
            Ok(Some(resp)) if !resp.ok() => {
                warn!(
                    "session delete at {} returned HTTP {}",
                    self.resource_path, resp.status
                );
            }
            Ok(Some(_)) => debug!("session released"),
            Ok(None) => warn!("session delete at {} did not get through", self.resource_path),
            Err(e) => warn!("session delete at {} failed: {}", self.resource_path, e),
        }
        t.clear_token();
    }
}

/// One probe GET against the chosen path; a 404 switches to the
/// alternate variant, so guessing wrong costs one request.
async fn probe_sessions_path(
    t: &Transport,
    preferred: &'static str,
) -> Result<&'static str, RedfishError> {
    let resp = t.get(preferred).await?;
    if resp.status == StatusCode::NOT_FOUND {
        let alternate = if preferred == SESSIONS_MODERN {
            SESSIONS_LEGACY
        } else {
            SESSIONS_MODERN
        };
        warn!(
            "session collection not at {}, falling back to {}",
            preferred, alternate
        );
        return Ok(alternate);
    }
    Ok(preferred)
}

/// Location headers are sometimes absolute URLs; the session path is
/// the part from /redfish onward.
fn as_resource_path(location: &str) -> String {
    match location.find("/redfish") {
        Some(at) => location[at..].to_string(),
        None => location.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::as_resource_path;

    #[test]
    fn test_location_header_normalization() {
        assert_eq!(
            as_resource_path("https://10.0.0.5/redfish/v1/SessionService/Sessions/42"),
            "/redfish/v1/SessionService/Sessions/42"
        );
        assert_eq!(
            as_resource_path("/redfish/v1/SessionService/Sessions/42"),
            "/redfish/v1/SessionService/Sessions/42"
        );
    }
}
