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

/// `Systems/{id}/Bios`. Attribute values vary wildly across vendors and
/// models, so they stay raw JSON.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Bios {
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// The read-only BIOS attribute registry used to validate writes before
/// they are queued.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct BiosRegistry {
    #[serde(default)]
    pub registry_entries: RegistryEntries,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RegistryEntries {
    #[serde(default)]
    pub attributes: Vec<RegistryAttribute>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RegistryAttribute {
    pub attribute_name: String,
    #[serde(rename = "Type", default)]
    pub attribute_type: Option<String>,
    pub read_only: Option<bool>,
    /// Enumeration attributes list their accepted values here; other
    /// types leave it empty and any value is allowed through.
    #[serde(default, rename = "Value")]
    pub values: Vec<RegistryValue>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RegistryValue {
    pub value_name: String,
}

impl RegistryAttribute {
    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.values.is_empty() || self.values.iter().any(|v| v.value_name == value)
    }

    pub fn accepted_values(&self) -> String {
        self.values
            .iter()
            .map(|v| v.value_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn test_bios_registry_parser() {
        let data = include_str!("testdata/bios_registry.json");
        let registry: super::BiosRegistry = serde_json::from_str(data).unwrap();
        let attrs = &registry.registry_entries.attributes;
        let boot_mode = attrs
            .iter()
            .find(|a| a.attribute_name == "BootMode")
            .unwrap();
        assert!(boot_mode.accepts("Uefi"));
        assert!(boot_mode.accepts("Bios"));
        assert!(!boot_mode.accepts("Legacy"));
        assert_eq!(boot_mode.accepted_values(), "Bios, Uefi");
        assert!(!boot_mode.is_read_only());
        let service_tag = attrs
            .iter()
            .find(|a| a.attribute_name == "SystemServiceTag")
            .unwrap();
        assert!(service_tag.is_read_only());
    }

    #[test]
    fn test_free_form_attribute_accepts_anything() {
        let attr: super::RegistryAttribute = serde_json::from_str(
            r#"{"AttributeName": "AssetTag", "Type": "String", "Value": []}"#,
        )
        .unwrap();
        assert!(attr.accepts("rack42"));
    }
}
