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
//! Host-type to boot-device mapping. A flat YAML document maps keys of
//! the form `<hosttype>[_<rack>_<ulocation>[_<blade>]]_interfaces` to
//! comma-separated device-name lists; the hostname supplies the
//! rack/ulocation/blade qualifiers.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::RedfishError;

/// The parsed mapping file. Lookup order is most specific key first.
#[derive(Debug, Clone)]
pub struct InterfaceMapping {
    entries: HashMap<String, String>,
}

/// Positional qualifiers parsed out of a lab hostname of the form
/// `<name>-<rack>-<ulocation>[-<blade>]-<model>[.domain]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostQualifiers {
    pub rack: Option<String>,
    pub ulocation: Option<String>,
    pub blade: Option<String>,
}

pub fn host_qualifiers(hostname: &str) -> HostQualifiers {
    let short = hostname.split('.').next().unwrap_or(hostname);
    let tokens: Vec<&str> = short.split('-').collect();
    // name, rack, ulocation, [blade,] model
    if tokens.len() < 4 {
        return HostQualifiers {
            rack: None,
            ulocation: None,
            blade: None,
        };
    }
    HostQualifiers {
        rack: Some(tokens[1].to_string()),
        ulocation: Some(tokens[2].to_string()),
        blade: (tokens.len() >= 5).then(|| tokens[3].to_string()),
    }
}

/// Candidate mapping keys for a host type on a host, most specific
/// first. A hostname that does not carry qualifiers only yields the
/// bare host-type key.
pub fn candidate_keys(host_type: &str, hostname: &str) -> Vec<String> {
    let q = host_qualifiers(hostname);
    let mut keys = Vec::new();
    if let (Some(rack), Some(uloc)) = (&q.rack, &q.ulocation) {
        if let Some(blade) = &q.blade {
            keys.push(format!("{host_type}_{rack}_{uloc}_{blade}_interfaces"));
        }
        keys.push(format!("{host_type}_{rack}_{uloc}_interfaces"));
    }
    keys.push(format!("{host_type}_interfaces"));
    keys
}

impl InterfaceMapping {
    pub fn load(path: &Path) -> Result<InterfaceMapping, RedfishError> {
        let raw = std::fs::read_to_string(path).map_err(|e| RedfishError::MappingUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        InterfaceMapping::parse(&raw).map_err(|reason| RedfishError::MappingUnreadable {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn parse(raw: &str) -> Result<InterfaceMapping, String> {
        let entries: HashMap<String, String> =
            serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
        Ok(InterfaceMapping { entries })
    }

    /// Resolve the ordered device-name list for a host type on a given
    /// host. The tried keys are reported on failure so a typoed mapping
    /// file is diagnosable from the error alone.
    pub fn resolve(&self, host_type: &str, hostname: &str) -> Result<Vec<String>, RedfishError> {
        let keys = candidate_keys(host_type, hostname);
        for key in &keys {
            if let Some(value) = self.entries.get(key) {
                debug!("mapping key {key} matched for {hostname}");
                return Ok(value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect());
            }
        }
        Err(RedfishError::MappingMissing {
            host_type: host_type.to_string(),
            tried: keys.join(", "),
        })
    }

    /// Host types with a bare `<hosttype>_interfaces` entry.
    pub fn host_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .entries
            .keys()
            .filter_map(|k| k.strip_suffix("_interfaces"))
            .filter(|k| !k.contains('_'))
            .map(|k| k.to_string())
            .collect();
        types.sort();
        types
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MAPPING: &str = "\
foreman_interfaces: NIC.Integrated.1-3-1,NIC.Slot.2-1-1
director_interfaces: NIC.Integrated.1-2-1
director_f21_h23_interfaces: NIC.Slot.7-2-1
director_f21_h23_000_interfaces: NIC.Slot.2-4-1
";

    fn mapping() -> InterfaceMapping {
        InterfaceMapping::parse(MAPPING).unwrap()
    }

    #[test]
    fn test_hostname_qualifiers() {
        let q = host_qualifiers("mgmt-f21-h23-000-r640.example.com");
        assert_eq!(q.rack.as_deref(), Some("f21"));
        assert_eq!(q.ulocation.as_deref(), Some("h23"));
        assert_eq!(q.blade.as_deref(), Some("000"));

        let q = host_qualifiers("mgmt-f21-h23-r640");
        assert_eq!(q.blade, None);
        assert_eq!(q.rack.as_deref(), Some("f21"));

        let q = host_qualifiers("localhost");
        assert_eq!(q.rack, None);
    }

    #[test]
    fn test_most_specific_key_wins() {
        let devices = mapping()
            .resolve("director", "mgmt-f21-h23-000-r640.example.com")
            .unwrap();
        assert_eq!(devices, vec!["NIC.Slot.2-4-1".to_string()]);
    }

    #[test]
    fn test_rack_key_when_no_blade() {
        let devices = mapping()
            .resolve("director", "mgmt-f21-h23-r640.example.com")
            .unwrap();
        assert_eq!(devices, vec!["NIC.Slot.7-2-1".to_string()]);
    }

    #[test]
    fn test_bare_key_fallback_and_comma_split() {
        let devices = mapping().resolve("foreman", "somehost").unwrap();
        assert_eq!(
            devices,
            vec![
                "NIC.Integrated.1-3-1".to_string(),
                "NIC.Slot.2-1-1".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_key_reports_tried() {
        let err = mapping()
            .resolve("ocp", "mgmt-f21-h23-000-r640")
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("ocp_f21_h23_000_interfaces"));
        assert!(text.contains("ocp_interfaces"));
    }

    #[test]
    fn test_host_types_lists_bare_entries() {
        assert_eq!(
            mapping().host_types(),
            vec!["director".to_string(), "foreman".to_string()]
        );
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(InterfaceMapping::parse("foreman_interfaces: [a, b").is_err());
    }
}
