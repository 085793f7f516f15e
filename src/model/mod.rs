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
//! Typed views of the handful of Redfish resources this tool touches.
//! Anything vendor-inconsistent stays a raw `serde_json::Value`.

pub mod bios;
pub mod boot;
pub mod job;
pub mod service_root;
pub mod system;
pub mod virtual_media;

use serde::{Deserialize, Serialize};

/// A `@odata.id` reference to another resource.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ODataId {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

/// A Redfish resource collection. Only the member references matter here.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Collection {
    #[serde(default)]
    pub members: Vec<ODataId>,
    #[serde(rename = "Members@odata.count", default)]
    pub member_count: Option<i64>,
}

#[cfg(test)]
mod test {
    #[test]
    fn test_collection_parser() {
        let data = include_str!("testdata/systems_collection.json");
        let result: super::Collection = serde_json::from_str(data).unwrap();
        assert_eq!(result.members.len(), 1);
        assert_eq!(
            result.members[0].odata_id,
            "/redfish/v1/Systems/System.Embedded.1"
        );
    }
}
