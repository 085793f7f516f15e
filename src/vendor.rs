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
use std::fmt;

use crate::model::service_root::ServiceRoot;

/// Vendor capability tag, decided once from the service root instead of
/// probing per call. Everything that is not recognizably Dell or
/// Supermicro gets the standards-only treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Dell,
    Supermicro,
    Generic,
}

impl Vendor {
    pub fn from_service_root(root: &ServiceRoot) -> Vendor {
        let named = root
            .vendor
            .as_deref()
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();
        if named.contains("dell") || root.oem.get("Dell").is_some() {
            Vendor::Dell
        } else if named.contains("supermicro") || root.oem.get("Supermicro").is_some() {
            Vendor::Supermicro
        } else {
            Vendor::Generic
        }
    }

    /// DellJobService.DeleteJobQueue, tier one of queue clearing.
    pub fn supports_bulk_job_clear(self) -> bool {
        self == Vendor::Dell
    }

    /// The OEM BootSources resource with the index-ordered device list.
    pub fn supports_boot_sources(self) -> bool {
        self == Vendor::Dell
    }

    /// The OneTimeBootSeqDev manager attribute for one-time boot.
    pub fn supports_one_time_boot_attributes(self) -> bool {
        self == Vendor::Dell
    }

    pub fn job_service_path(self, manager_path: &str) -> Option<String> {
        match self {
            Vendor::Dell => Some(format!("{manager_path}/Oem/Dell/DellJobService")),
            _ => None,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn root(json: &str) -> ServiceRoot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_dell_by_vendor_field() {
        let v = Vendor::from_service_root(&root(r#"{"Vendor": "Dell"}"#));
        assert_eq!(v, Vendor::Dell);
        assert!(v.supports_bulk_job_clear());
    }

    #[test]
    fn test_dell_by_oem_block() {
        // Older iDRAC roots have no Vendor field, only the Oem block.
        let v = Vendor::from_service_root(&root(r#"{"Oem": {"Dell": {"ServiceTag": "X"}}}"#));
        assert_eq!(v, Vendor::Dell);
    }

    #[test]
    fn test_supermicro() {
        let v = Vendor::from_service_root(&root(r#"{"Vendor": "Supermicro"}"#));
        assert_eq!(v, Vendor::Supermicro);
        assert!(!v.supports_bulk_job_clear());
        assert_eq!(v.job_service_path("/redfish/v1/Managers/1"), None);
    }

    #[test]
    fn test_unknown_is_generic() {
        let v = Vendor::from_service_root(&root(r#"{"Product": "OpenBMC"}"#));
        assert_eq!(v, Vendor::Generic);
    }
}
