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
use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of a boot sequence. Ordering is carried entirely by
/// `index`; the position the BMC delivers the entry at means nothing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct BootDevice {
    pub name: String,
    pub index: i64,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `Systems/{id}/BootSources`. The attribute key holding the sequence
/// depends on the boot mode, so the attribute map stays generic.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct BootSources {
    #[serde(default)]
    pub attributes: HashMap<String, Vec<BootDevice>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Uefi,
    Bios,
}

impl BootMode {
    /// The BootSources attribute that carries the sequence in this mode.
    pub fn sequence_key(self) -> &'static str {
        match self {
            BootMode::Uefi => "UefiBootSeq",
            BootMode::Bios => "BootSeq",
        }
    }
}

impl fmt::Display for BootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn test_boot_sources_parser() {
        let data = include_str!("testdata/boot_sources.json");
        let sources: super::BootSources = serde_json::from_str(data).unwrap();
        let seq = &sources.attributes["BootSeq"];
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[0].name, "NIC.Integrated.1-2-1");
        assert_eq!(seq[0].index, 0);
        assert!(seq[0].enabled);
    }

    #[test]
    fn test_sequence_key() {
        assert_eq!(super::BootMode::Uefi.sequence_key(), "UefiBootSeq");
        assert_eq!(super::BootMode::Bios.sequence_key(), "BootSeq");
    }
}
