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

/// One slot of the manager's VirtualMedia collection.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualMedia {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image_name: Option<String>,
    #[serde(default)]
    pub inserted: Option<bool>,
    #[serde(default)]
    pub actions: VirtualMediaActions,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VirtualMediaActions {
    #[serde(rename = "#VirtualMedia.EjectMedia")]
    pub eject: Option<ActionTarget>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActionTarget {
    #[serde(rename = "target")]
    pub target: Option<String>,
}

impl VirtualMedia {
    pub fn is_inserted(&self) -> bool {
        self.inserted.unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn test_virtual_media_parser() {
        let data = include_str!("testdata/virtual_media.json");
        let media: super::VirtualMedia = serde_json::from_str(data).unwrap();
        assert!(media.is_inserted());
        assert_eq!(media.image_name.as_deref(), Some("rhel-9.4-boot.iso"));
        assert_eq!(
            media.actions.eject.unwrap().target.as_deref(),
            Some("/redfish/v1/Managers/iDRAC.Embedded.1/VirtualMedia/CD/Actions/VirtualMedia.EjectMedia")
        );
    }

    #[test]
    fn test_empty_slot_is_not_inserted() {
        let media: super::VirtualMedia = serde_json::from_str(r#"{"Id": "RemovableDisk"}"#).unwrap();
        assert!(!media.is_inserted());
    }
}
