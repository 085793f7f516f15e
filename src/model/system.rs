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

/// The slice of `Systems/{id}` this tool reads. Power state stays a raw
/// string here; mapping to a tri-state happens in the power controller
/// because an unreachable host has no string at all.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystem {
    pub power_state: Option<String>,
    #[serde(default)]
    pub actions: SystemActions,
    pub ethernet_interfaces: Option<ODataId>,
    pub bios: Option<ODataId>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SystemActions {
    #[serde(rename = "#ComputerSystem.Reset")]
    pub reset: Option<ResetAction>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResetAction {
    #[serde(rename = "target")]
    pub target: Option<String>,
    #[serde(rename = "ResetType@Redfish.AllowableValues", default)]
    pub allowable_values: Vec<String>,
}

/// One entry of `Systems/{id}/EthernetInterfaces/{nic}`.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct EthernetInterface {
    pub id: Option<String>,
    #[serde(rename = "MACAddress")]
    pub mac_address: Option<String>,
}

#[cfg(test)]
mod test {
    #[test]
    fn test_system_parser() {
        let data = include_str!("testdata/system.json");
        let system: super::ComputerSystem = serde_json::from_str(data).unwrap();
        assert_eq!(system.power_state.as_deref(), Some("On"));
        let reset = system.actions.reset.unwrap();
        assert!(reset
            .allowable_values
            .iter()
            .any(|v| v == "GracefulRestart"));
        assert_eq!(
            reset.target.as_deref(),
            Some("/redfish/v1/Systems/System.Embedded.1/Actions/ComputerSystem.Reset")
        );
    }

    #[test]
    fn test_ethernet_interface_parser() {
        let data = r#"{"Id": "NIC.Integrated.1-3-1", "MACAddress": "B0:26:28:D8:68:C2"}"#;
        let nic: super::EthernetInterface = serde_json::from_str(data).unwrap();
        assert_eq!(nic.mac_address.as_deref(), Some("B0:26:28:D8:68:C2"));
    }
}
