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
//! Boot-sequence reconciliation: diff the declared target ordering
//! against what the BMC reports and apply the minimal patch.

use tracing::{info, warn};

use crate::model::bios::Bios;
use crate::model::boot::{BootDevice, BootMode, BootSources};
use crate::transport::Transport;
use crate::RedfishError;

/// Result of diffing a target ordering against the current sequence.
#[derive(Debug)]
pub struct BootPlan {
    /// Full device list to send, indices updated.
    pub devices: Vec<BootDevice>,
    /// False when the current sequence already matches; no write then.
    pub changed: bool,
    /// Requested names that do not exist on this host. Warned, not fatal.
    pub missing: Vec<String>,
}

/// Compute the new sequence. Target names that exist get the index of
/// their position in the (filtered) target list; every device the
/// target does not mention keeps its current index. The gaps that can
/// leave are accepted, iDRAC renumbers internally.
pub fn plan_boot_order(current: &[BootDevice], target: &[String]) -> BootPlan {
    let mut missing = Vec::new();
    let mut valid = Vec::new();
    for name in target {
        if current.iter().any(|d| &d.name == name) {
            valid.push(name.clone());
        } else {
            missing.push(name.clone());
        }
    }

    let mut devices: Vec<BootDevice> = current.to_vec();
    let mut changed = false;
    for (position, name) in valid.iter().enumerate() {
        for device in devices.iter_mut() {
            if &device.name == name {
                if device.index != position as i64 {
                    changed = true;
                }
                device.index = position as i64;
            }
        }
    }
    devices.sort_by_key(|d| d.index);

    BootPlan {
        devices,
        changed,
        missing,
    }
}

/// Read the BIOS boot mode. An unreadable attribute falls back to
/// legacy with a warning rather than failing the operation; rejected
/// credentials stay fatal like everywhere else.
pub async fn fetch_boot_mode(t: &Transport, system_path: &str) -> Result<BootMode, RedfishError> {
    let uri = format!("{system_path}/Bios");
    let bios: Result<Bios, RedfishError> = t.get_ok(&uri).await;
    match bios {
        Ok(b) => match b.attributes.get("BootMode").and_then(|v| v.as_str()) {
            Some("Uefi") => Ok(BootMode::Uefi),
            Some(_) => Ok(BootMode::Bios),
            None => {
                warn!("BootMode attribute missing, assuming legacy BIOS");
                Ok(BootMode::Bios)
            }
        },
        Err(e @ RedfishError::Auth { .. }) => Err(e),
        Err(e) => {
            warn!("could not read boot mode ({e}), assuming legacy BIOS");
            Ok(BootMode::Bios)
        }
    }
}

/// Current boot sequence, ordered by index.
pub async fn fetch_boot_devices(
    t: &Transport,
    system_path: &str,
    mode: BootMode,
) -> Result<Vec<BootDevice>, RedfishError> {
    let uri = format!("{system_path}/BootSources");
    let sources: BootSources = t.get_ok(&uri).await?;
    let key = mode.sequence_key();
    let mut devices = sources
        .attributes
        .get(key)
        .cloned()
        .ok_or_else(|| RedfishError::ResourceNotFound {
            url: t.url(&uri),
            what: format!("boot sequence attribute {key}"),
        })?;
    devices.sort_by_key(|d| d.index);
    Ok(devices)
}

/// PATCH the pending boot sequence. Retried with the same payload and
/// no backoff; BMC write endpoints fail transiently under load.
pub async fn apply_boot_sequence(
    t: &Transport,
    system_path: &str,
    mode: BootMode,
    devices: &[BootDevice],
    retries: u32,
) -> Result<(), RedfishError> {
    let uri = format!("{system_path}/BootSources/Settings");
    let body = serde_json::json!({
        "Attributes": { mode.sequence_key(): devices }
    });
    patch_with_retry(t, &uri, &body, retries).await?;
    // The sequence just read is stale now.
    t.invalidate(&format!("{system_path}/BootSources"));
    Ok(())
}

/// The `uefi` host type does not reorder a device list at all: it flips
/// the boot mode and points the PXE device slots at the given
/// interfaces. Slots beyond the supplied interfaces are disabled.
pub fn uefi_interface_payload(interfaces: &[String]) -> serde_json::Value {
    let mut attributes = serde_json::Map::new();
    attributes.insert("BootMode".to_string(), "Uefi".into());
    for slot in 1..=4usize {
        match interfaces.get(slot - 1) {
            Some(iface) => {
                attributes.insert(format!("PxeDev{slot}EnDis"), "Enabled".into());
                attributes.insert(format!("PxeDev{slot}Interface"), iface.as_str().into());
            }
            None => {
                attributes.insert(format!("PxeDev{slot}EnDis"), "Disabled".into());
            }
        }
    }
    serde_json::json!({ "Attributes": attributes })
}

pub async fn apply_uefi_boot(
    t: &Transport,
    system_path: &str,
    interfaces: &[String],
    retries: u32,
) -> Result<(), RedfishError> {
    let uri = format!("{system_path}/Bios/Settings");
    let body = uefi_interface_payload(interfaces);
    info!("switching boot mode to UEFI with PXE interfaces {interfaces:?}");
    patch_with_retry(t, &uri, &body, retries).await?;
    t.invalidate(&format!("{system_path}/Bios"));
    Ok(())
}

async fn patch_with_retry(
    t: &Transport,
    uri: &str,
    body: &serde_json::Value,
    retries: u32,
) -> Result<(), RedfishError> {
    let attempts = retries.max(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        match t.patch(uri, body).await {
            Ok(resp) => match t.expect_ok(resp, uri) {
                Ok(_) => return Ok(()),
                Err(e @ RedfishError::Auth { .. }) => return Err(e),
                Err(e) => {
                    warn!("PATCH {} attempt {}/{} failed: {}", uri, attempt, attempts, e);
                    last_err = Some(e);
                }
            },
            Err(e) => {
                warn!("PATCH {} attempt {}/{} failed: {}", uri, attempt, attempts, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.expect("at least one attempt was made"))
}

#[cfg(test)]
mod test {
    use super::*;

    fn device(name: &str, index: i64) -> BootDevice {
        BootDevice {
            name: name.to_string(),
            index,
            enabled: true,
            id: None,
        }
    }

    fn names(target: &[&str]) -> Vec<String> {
        target.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reorder_preserves_unmentioned_devices() {
        let current = vec![device("A", 0), device("B", 1), device("C", 2)];
        let plan = plan_boot_order(&current, &names(&["B", "A"]));
        assert!(plan.changed);
        assert!(plan.missing.is_empty());
        let index_of = |n: &str| plan.devices.iter().find(|d| d.name == n).unwrap().index;
        assert_eq!(index_of("B"), 0);
        assert_eq!(index_of("A"), 1);
        assert_eq!(index_of("C"), 2);
    }

    #[test]
    fn test_matching_target_is_a_noop() {
        let current = vec![device("A", 0), device("B", 1), device("C", 2)];
        let plan = plan_boot_order(&current, &names(&["A", "B"]));
        assert!(!plan.changed);
    }

    #[test]
    fn test_unknown_devices_dropped_with_warning() {
        let current = vec![device("A", 0), device("B", 1)];
        let plan = plan_boot_order(&current, &names(&["Ghost", "B", "A"]));
        assert_eq!(plan.missing, vec!["Ghost".to_string()]);
        assert!(plan.changed);
        let index_of = |n: &str| plan.devices.iter().find(|d| d.name == n).unwrap().index;
        assert_eq!(index_of("B"), 0);
        assert_eq!(index_of("A"), 1);
    }

    #[test]
    fn test_subset_target_keeps_other_indices() {
        // Known quirk: unmentioned devices keep their index even when
        // that collides with a reassigned one.
        let current = vec![device("A", 0), device("B", 1), device("C", 2)];
        let plan = plan_boot_order(&current, &names(&["C"]));
        assert!(plan.changed);
        let index_of = |n: &str| plan.devices.iter().find(|d| d.name == n).unwrap().index;
        assert_eq!(index_of("C"), 0);
        assert_eq!(index_of("A"), 0);
        assert_eq!(index_of("B"), 1);
    }

    #[test]
    fn test_uefi_payload_shape() {
        let payload = uefi_interface_payload(&names(&["NIC.Integrated.1-3-1"]));
        let attrs = payload.get("Attributes").unwrap();
        assert_eq!(attrs["BootMode"], "Uefi");
        assert_eq!(attrs["PxeDev1EnDis"], "Enabled");
        assert_eq!(attrs["PxeDev1Interface"], "NIC.Integrated.1-3-1");
        assert_eq!(attrs["PxeDev2EnDis"], "Disabled");
        assert!(attrs.get("PxeDev2Interface").is_none());
    }
}
