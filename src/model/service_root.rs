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
use serde::Deserialize;

use super::ODataId;

/// `/redfish/v1`. Fetched once per invocation and memoized by the
/// transport; the session path choice, the resource locator and the
/// vendor probe all start from here.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRoot {
    pub redfish_version: Option<String>,
    pub vendor: Option<String>,
    pub systems: Option<ODataId>,
    pub managers: Option<ODataId>,
    pub session_service: Option<ODataId>,
    pub update_service: Option<ODataId>,
    #[serde(default)]
    pub oem: serde_json::Value,
}

impl ServiceRoot {
    /// Redfish service version as (major, minor). Unparseable or absent
    /// versions come back as None and callers fall back to probing.
    pub fn version(&self) -> Option<(u32, u32)> {
        let v = self.redfish_version.as_deref()?;
        let mut parts = v.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        Some((major, minor))
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn test_service_root_parser() {
        let data = include_str!("testdata/service_root.json");
        let root: super::ServiceRoot = serde_json::from_str(data).unwrap();
        assert_eq!(root.vendor.as_deref(), Some("Dell"));
        assert_eq!(root.version(), Some((1, 6)));
        assert_eq!(
            root.systems.as_ref().unwrap().odata_id,
            "/redfish/v1/Systems"
        );
    }

    #[test]
    fn test_version_unparseable() {
        let root: super::ServiceRoot =
            serde_json::from_str(r#"{"RedfishVersion": "garbage"}"#).unwrap();
        assert_eq!(root.version(), None);
    }
}
