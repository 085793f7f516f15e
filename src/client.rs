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
//! Per-host orchestrator. Owns one session, the resolved system and
//! manager paths and the vendor capability tag, and exposes the
//! operations the CLI dispatches to.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use crate::boot;
use crate::jobs;
use crate::mapping::InterfaceMapping;
use crate::model::bios::{Bios, BiosRegistry};
use crate::model::boot::{BootDevice, BootMode};
use crate::model::service_root::ServiceRoot;
use crate::model::system::{ComputerSystem, EthernetInterface};
use crate::model::virtual_media::VirtualMedia;
use crate::model::Collection;
use crate::power::{self, PowerState, ResetType};
use crate::session::Session;
use crate::transport::{Endpoint, Transport, TransportPool, REDFISH_ROOT};
use crate::vendor::Vendor;
use crate::RedfishError;

/// Tunables for the polling loops. Tests shrink the intervals to zero;
/// production uses the defaults.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Retry/poll budget shared by every waiting loop.
    pub retries: u32,
    pub power_poll_interval: Duration,
    pub job_poll_interval: Duration,
    /// Slow interval for jobs that only finish after a reboot.
    pub monitor_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig {
            retries: 15,
            power_poll_interval: Duration::from_secs(5),
            job_poll_interval: Duration::from_secs(10),
            monitor_interval: Duration::from_secs(30),
        }
    }
}

/// Everything the CLI can ask for on one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ChangeBootOrder { host_type: String },
    BootToDevice { device: String },
    BootToMac { mac: String },
    CheckBoot,
    CheckPower,
    Reboot { graceful: bool },
    PowerCycle,
    PowerOn,
    PowerOff,
    ClearJobs { force: bool },
    ListJobs,
    DeleteJob { id: String },
    ResetManager,
    ResetBios,
    FirmwareInventory,
    GetBiosAttribute { name: Option<String> },
    SetBiosAttributes { attributes: Vec<(String, String)> },
    CheckVirtualMedia,
    UnmountVirtualMedia,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FirmwareComponent {
    name: Option<String>,
    version: Option<String>,
}

/// One authenticated connection to one BMC with the state an
/// invocation accumulates: resolved paths, vendor tag, boot-device
/// cache, and the once-only manager recovery flag.
pub struct HostClient {
    transport: Transport,
    session: Option<Session>,
    vendor: Vendor,
    system_path: String,
    manager_path: String,
    config: ClientConfig,
    boot_mode: Option<BootMode>,
    boot_devices: Option<Vec<BootDevice>>,
    recovered_once: bool,
}

impl HostClient {
    /// Open a session and resolve the system and manager paths. The
    /// two-hop root/collection/first-member walk runs here so every
    /// later operation can address resources directly.
    pub async fn connect(
        pool: &TransportPool,
        endpoint: Endpoint,
        config: ClientConfig,
    ) -> Result<HostClient, RedfishError> {
        let transport = pool.transport(endpoint);
        let session = Session::open(&transport).await?;

        let root: ServiceRoot = transport.get_ok(REDFISH_ROOT).await?;
        let vendor = Vendor::from_service_root(&root);
        info!("connected to a {vendor} BMC");

        let systems = root
            .systems
            .as_ref()
            .map(|o| o.odata_id.clone())
            .unwrap_or_else(|| format!("{REDFISH_ROOT}/Systems"));
        let managers = root
            .managers
            .as_ref()
            .map(|o| o.odata_id.clone())
            .unwrap_or_else(|| format!("{REDFISH_ROOT}/Managers"));
        let system_path = first_member(&transport, &systems, "Systems").await?;
        let manager_path = first_member(&transport, &managers, "Managers").await?;

        Ok(HostClient {
            transport,
            session: Some(session),
            vendor,
            system_path,
            manager_path,
            config,
            boot_mode: None,
            boot_devices: None,
            recovered_once: false,
        })
    }

    /// Release the session. Never raises; a failed teardown must not
    /// mask the outcome of the operation that ran before it.
    pub async fn close(mut self) {
        if let Some(session) = self.session.take() {
            session.close(&self.transport).await;
        }
    }

    pub fn host(&self) -> &str {
        self.transport.host()
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Dispatch one command. The mapping is only consulted by the
    /// boot-order commands.
    pub async fn run(
        &mut self,
        command: &Command,
        mapping: Option<&InterfaceMapping>,
    ) -> Result<(), RedfishError> {
        match command {
            Command::ChangeBootOrder { host_type } => {
                let mapping = mapping.ok_or_else(|| RedfishError::MappingMissing {
                    host_type: host_type.clone(),
                    tried: "no mapping file given".to_string(),
                })?;
                self.change_boot_order(host_type, mapping).await
            }
            Command::BootToDevice { device } => self.boot_to_device(device).await,
            Command::BootToMac { mac } => self.boot_to_mac(mac).await,
            Command::CheckBoot => self.check_boot(mapping).await,
            Command::CheckPower => {
                let state = power::get_power_state(&self.transport, &self.system_path).await;
                info!("power state: {state}");
                Ok(())
            }
            Command::Reboot { graceful } => {
                power::reboot(
                    &self.transport,
                    &self.system_path,
                    *graceful,
                    self.config.power_poll_interval,
                    self.config.retries,
                )
                .await
            }
            Command::PowerCycle => {
                power::power_cycle(
                    &self.transport,
                    &self.system_path,
                    self.config.power_poll_interval,
                    self.config.retries,
                )
                .await
            }
            Command::PowerOn => self.set_power(PowerState::On).await,
            Command::PowerOff => self.set_power(PowerState::Off).await,
            Command::ClearJobs { force } => {
                jobs::clear_queue(&self.transport, &self.manager_path, self.vendor, *force).await
            }
            Command::ListJobs => {
                let ids = jobs::list_job_ids(&self.transport, &self.manager_path).await?;
                if ids.is_empty() {
                    info!("job queue is empty");
                }
                for id in ids {
                    info!("queued job {id}");
                }
                Ok(())
            }
            Command::DeleteJob { id } => {
                jobs::delete_job(&self.transport, &self.manager_path, id).await
            }
            Command::ResetManager => self.reset_manager().await,
            Command::ResetBios => self.reset_bios().await,
            Command::FirmwareInventory => self.firmware_inventory().await.map(|_| ()),
            Command::GetBiosAttribute { name } => match name {
                Some(name) => {
                    let value = self.get_bios_attribute(name).await?;
                    info!("{name}: {value}");
                    Ok(())
                }
                None => {
                    let attrs = self.list_bios_attributes().await?;
                    for (name, value) in &attrs {
                        info!("{name}: {value}");
                    }
                    Ok(())
                }
            },
            Command::SetBiosAttributes { attributes } => {
                self.set_bios_attributes(attributes).await
            }
            Command::CheckVirtualMedia => self.check_virtual_media().await.map(|_| ()),
            Command::UnmountVirtualMedia => self.unmount_virtual_media().await.map(|_| ()),
        }
    }

    async fn set_power(&mut self, target: PowerState) -> Result<(), RedfishError> {
        power::set_power_state(
            &self.transport,
            &self.system_path,
            target,
            self.config.power_poll_interval,
            self.config.retries,
        )
        .await
    }

    async fn boot_mode(&mut self) -> Result<BootMode, RedfishError> {
        if let Some(mode) = self.boot_mode {
            return Ok(mode);
        }
        let mode = boot::fetch_boot_mode(&self.transport, &self.system_path).await?;
        self.boot_mode = Some(mode);
        Ok(mode)
    }

    /// The current boot sequence, fetched once per invocation.
    async fn boot_devices(&mut self) -> Result<Vec<BootDevice>, RedfishError> {
        if !self.vendor.supports_boot_sources() {
            return Err(RedfishError::Unsupported {
                action: "Boot order management".to_string(),
            });
        }
        if let Some(devices) = &self.boot_devices {
            return Ok(devices.clone());
        }
        let mode = self.boot_mode().await?;
        let devices = boot::fetch_boot_devices(&self.transport, &self.system_path, mode).await?;
        self.boot_devices = Some(devices.clone());
        Ok(devices)
    }

    fn drop_boot_cache(&mut self) {
        self.boot_devices = None;
        self.boot_mode = None;
    }

    /// Reorder the boot sequence to match the host type's mapping
    /// entry. The pseudo host type `uefi` flips the boot mode and
    /// points the PXE device slots at the mapped interfaces instead.
    pub async fn change_boot_order(
        &mut self,
        host_type: &str,
        mapping: &InterfaceMapping,
    ) -> Result<(), RedfishError> {
        let devices = mapping.resolve(host_type, &self.transport.host().to_string())?;
        if host_type == "uefi" {
            boot::apply_uefi_boot(
                &self.transport,
                &self.system_path,
                &devices,
                self.config.retries,
            )
            .await?;
            self.drop_boot_cache();
            return self.commit_settings_job().await;
        }
        self.set_boot_order(&devices).await
    }

    /// Apply an explicit boot-device ordering. A target that already
    /// matches is a logged no-op without any write or reboot.
    pub async fn set_boot_order(&mut self, target: &[String]) -> Result<(), RedfishError> {
        let mode = self.boot_mode().await?;
        let current = self.boot_devices().await?;
        let plan = boot::plan_boot_order(&current, target);
        for name in &plan.missing {
            warn!("requested boot device {name} does not exist on this host");
        }
        if !target.is_empty() && plan.missing.len() == target.len() {
            return Err(RedfishError::NoUsableBootDevice {
                requested: target.join(", "),
            });
        }
        if !plan.changed {
            info!("boot order already matches, nothing to do");
            return Ok(());
        }
        boot::apply_boot_sequence(
            &self.transport,
            &self.system_path,
            mode,
            &plan.devices,
            self.config.retries,
        )
        .await?;
        self.drop_boot_cache();
        self.commit_settings_job().await
    }

    /// Pending BIOS/boot settings only take effect through a config job
    /// and a reboot. The job is polled on the slow interval because it
    /// cannot finish before the host is back up.
    async fn commit_settings_job(&mut self) -> Result<(), RedfishError> {
        let target = format!("{}/Bios/Settings", self.system_path);
        let job_id =
            jobs::create_config_job(&self.transport, &self.manager_path, &target).await?;
        power::reboot(
            &self.transport,
            &self.system_path,
            true,
            self.config.power_poll_interval,
            self.config.retries,
        )
        .await?;
        jobs::poll_job(
            &self.transport,
            &self.manager_path,
            &job_id,
            self.config.monitor_interval,
            self.config.retries,
        )
        .await?;
        Ok(())
    }

    /// One-time boot to a named device, then reboot so it takes effect.
    pub async fn boot_to_device(&mut self, device: &str) -> Result<(), RedfishError> {
        if !self.vendor.supports_one_time_boot_attributes() {
            return Err(RedfishError::Unsupported {
                action: "One-time boot device selection".to_string(),
            });
        }
        let known = self.boot_devices().await?;
        if !known.iter().any(|d| d.name == device) {
            return Err(RedfishError::NoUsableBootDevice {
                requested: device.to_string(),
            });
        }
        self.patch_one_time_boot(device).await?;
        info!("one-time boot set to {device}, rebooting");
        power::reboot(
            &self.transport,
            &self.system_path,
            false,
            self.config.power_poll_interval,
            self.config.retries,
        )
        .await
    }

    /// One-time boot to whatever NIC carries the given MAC address.
    pub async fn boot_to_mac(&mut self, mac: &str) -> Result<(), RedfishError> {
        let system: ComputerSystem = self.transport.get_ok(&self.system_path).await?;
        let nics_path = system
            .ethernet_interfaces
            .map(|o| o.odata_id)
            .unwrap_or_else(|| format!("{}/EthernetInterfaces", self.system_path));
        let collection: Collection = self.transport.get_ok(&nics_path).await?;
        for member in &collection.members {
            let nic: EthernetInterface = self.transport.get_ok(&member.odata_id).await?;
            let matches = nic
                .mac_address
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case(mac));
            if !matches {
                continue;
            }
            let nic_id = nic
                .id
                .unwrap_or_else(|| last_segment(&member.odata_id).to_string());
            info!("MAC {mac} belongs to {nic_id}");
            // Boot-sequence entries carry the NIC FQDD in their name.
            let device = self
                .boot_devices()
                .await?
                .iter()
                .find(|d| d.name.contains(&nic_id))
                .map(|d| d.name.clone())
                .unwrap_or(nic_id);
            return self.boot_to_device(&device).await;
        }
        Err(RedfishError::MacNotFound {
            mac: mac.to_string(),
        })
    }

    /// PATCH the one-time boot manager attributes. A 503 means the
    /// iDRAC is busy and the same payload is retried; a 400 means the
    /// pending-settings machinery is wedged and triggers the once-only
    /// manager recovery.
    async fn patch_one_time_boot(&mut self, device: &str) -> Result<(), RedfishError> {
        let uri = format!("{}/Attributes", self.manager_path);
        let body = serde_json::json!({
            "Attributes": {
                "OneTimeBootMode": "OneTimeBootSeq",
                "OneTimeBootSeqDev": device,
            }
        });
        let attempts = self.config.retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let resp = self.transport.patch(&uri, &body).await?;
            if resp.ok() {
                return Ok(());
            }
            if resp.status == StatusCode::SERVICE_UNAVAILABLE && attempt < attempts {
                warn!("manager busy (503), retrying one-time boot PATCH [{attempt}/{attempts}]");
                tokio::time::sleep(self.config.power_poll_interval).await;
                continue;
            }
            if resp.status == StatusCode::BAD_REQUEST && self.recover_manager_once().await? {
                continue;
            }
            self.transport.expect_ok(resp, &uri)?;
        }
    }

    /// Wedged-manager recovery: clear the job queue, restart the
    /// manager, wait for it to come back. Runs at most once per
    /// invocation; returns false when it already ran.
    async fn recover_manager_once(&mut self) -> Result<bool, RedfishError> {
        if self.recovered_once {
            return Ok(false);
        }
        self.recovered_once = true;
        warn!("manager rejected pending settings, clearing job queue and restarting it");
        jobs::clear_queue(&self.transport, &self.manager_path, self.vendor, true).await?;
        self.reset_manager().await?;
        power::poll_state(
            &self.transport,
            &self.system_path,
            PowerState::On,
            true,
            self.config.monitor_interval,
            self.config.retries,
        )
        .await?;
        Ok(true)
    }

    /// Report boot mode and ordered sequence without mutating anything.
    /// With a mapping at hand, also names the host types the current
    /// order satisfies.
    pub async fn check_boot(
        &mut self,
        mapping: Option<&InterfaceMapping>,
    ) -> Result<(), RedfishError> {
        let mode = self.boot_mode().await?;
        info!("boot mode: {mode}");
        let devices = self.boot_devices().await?;
        for d in &devices {
            let state = if d.enabled { "enabled" } else { "disabled" };
            info!("{}: {} ({})", d.index, d.name, state);
        }
        let Some(mapping) = mapping else {
            return Ok(());
        };
        let host = self.transport.host().to_string();
        let head: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
        for host_type in mapping.host_types() {
            if let Ok(wanted) = mapping.resolve(&host_type, &host) {
                let wanted: Vec<&str> = wanted.iter().map(String::as_str).collect();
                if head.starts_with(&wanted) {
                    info!("boot order matches host type '{host_type}'");
                }
            }
        }
        Ok(())
    }

    /// Restart the BMC itself, not the host.
    pub async fn reset_manager(&mut self) -> Result<(), RedfishError> {
        let uri = format!("{}/Actions/Manager.Reset", self.manager_path);
        let body = serde_json::json!({ "ResetType": ResetType::GracefulRestart.to_string() });
        let resp = self.transport.post(&uri, &body).await?;
        self.transport.expect_ok(resp, &uri)?;
        info!("manager restart requested");
        Ok(())
    }

    /// Reset every BIOS attribute to factory defaults. Takes effect on
    /// the next reboot, which is left to the caller.
    pub async fn reset_bios(&mut self) -> Result<(), RedfishError> {
        let uri = format!("{}/Bios/Actions/Bios.ResetBios", self.system_path);
        let body = serde_json::json!({});
        let resp = self.transport.post(&uri, &body).await?;
        self.transport.expect_ok(resp, &uri)?;
        self.drop_boot_cache();
        self.transport.invalidate(&format!("{}/Bios", self.system_path));
        info!("BIOS reset to factory defaults queued, takes effect on next reboot");
        Ok(())
    }

    /// Name and version of every component the update service knows.
    pub async fn firmware_inventory(&mut self) -> Result<Vec<(String, String)>, RedfishError> {
        let root: ServiceRoot = self.transport.get_ok(REDFISH_ROOT).await?;
        let update_service = root
            .update_service
            .map(|o| o.odata_id)
            .unwrap_or_else(|| format!("{REDFISH_ROOT}/UpdateService"));
        let uri = format!("{update_service}/FirmwareInventory");
        let collection: Collection = self.transport.get_ok(&uri).await?;
        let mut inventory = Vec::with_capacity(collection.members.len());
        for member in &collection.members {
            let component: FirmwareComponent = self.transport.get_ok(&member.odata_id).await?;
            let name = component
                .name
                .unwrap_or_else(|| last_segment(&member.odata_id).to_string());
            let version = component.version.unwrap_or_default();
            info!("{name}: {version}");
            inventory.push((name, version));
        }
        Ok(inventory)
    }

    pub async fn list_bios_attributes(
        &mut self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, RedfishError> {
        let uri = format!("{}/Bios", self.system_path);
        let bios: Bios = self.transport.get_ok(&uri).await?;
        Ok(bios.attributes)
    }

    pub async fn get_bios_attribute(
        &mut self,
        name: &str,
    ) -> Result<serde_json::Value, RedfishError> {
        let attrs = self.list_bios_attributes().await?;
        attrs
            .get(name)
            .cloned()
            .ok_or_else(|| RedfishError::UnknownBiosAttribute {
                name: name.to_string(),
            })
    }

    /// Stage BIOS attribute writes. Every value is validated against
    /// the attribute registry before anything is sent; values already
    /// in effect are skipped. Applying needs a config job plus reboot,
    /// which runs only when at least one attribute actually changes.
    pub async fn set_bios_attributes(
        &mut self,
        attributes: &[(String, String)],
    ) -> Result<(), RedfishError> {
        let registry_uri = format!("{}/Bios/BiosRegistry", self.system_path);
        let registry: BiosRegistry = self.transport.get_ok(&registry_uri).await?;
        let current = self.list_bios_attributes().await?;

        let mut staged = serde_json::Map::new();
        for (name, value) in attributes {
            let attr = registry
                .registry_entries
                .attributes
                .iter()
                .find(|a| &a.attribute_name == name)
                .ok_or_else(|| RedfishError::UnknownBiosAttribute { name: name.clone() })?;
            if attr.is_read_only() {
                return Err(RedfishError::ReadOnlyBiosAttribute { name: name.clone() });
            }
            if !attr.accepts(value) {
                return Err(RedfishError::InvalidBiosValue {
                    name: name.clone(),
                    value: value.clone(),
                    accepted: attr.accepted_values(),
                });
            }
            let typed = typed_attribute_value(attr.attribute_type.as_deref(), value);
            if current.get(name) == Some(&typed) {
                info!("{name} is already '{value}', skipping");
                continue;
            }
            staged.insert(name.clone(), typed);
        }
        if staged.is_empty() {
            info!("no BIOS attribute changes to apply");
            return Ok(());
        }

        let uri = format!("{}/Bios/Settings", self.system_path);
        let body = serde_json::json!({ "Attributes": staged });
        let resp = self.transport.patch(&uri, &body).await?;
        self.transport.expect_ok(resp, &uri)?;
        self.transport
            .invalidate(&format!("{}/Bios", self.system_path));
        self.drop_boot_cache();
        self.commit_settings_job().await
    }

    /// Report the manager's virtual media slots.
    pub async fn check_virtual_media(&mut self) -> Result<Vec<VirtualMedia>, RedfishError> {
        let uri = format!("{}/VirtualMedia", self.manager_path);
        let collection: Collection = self.transport.get_ok(&uri).await?;
        let mut media = Vec::with_capacity(collection.members.len());
        for member in &collection.members {
            let slot: VirtualMedia = self.transport.get_ok(&member.odata_id).await?;
            let label = slot
                .id
                .clone()
                .or_else(|| slot.name.clone())
                .unwrap_or_else(|| last_segment(&member.odata_id).to_string());
            if slot.is_inserted() {
                info!(
                    "{label}: {} inserted",
                    slot.image_name.as_deref().unwrap_or("unnamed image")
                );
            } else {
                info!("{label}: empty");
            }
            media.push(slot);
        }
        Ok(media)
    }

    /// Eject every inserted virtual medium. Returns how many were
    /// ejected; slots without an eject action are warned and skipped.
    pub async fn unmount_virtual_media(&mut self) -> Result<usize, RedfishError> {
        let uri = format!("{}/VirtualMedia", self.manager_path);
        let collection: Collection = self.transport.get_ok(&uri).await?;
        let mut ejected = 0;
        for member in &collection.members {
            let slot: VirtualMedia = self.transport.get_ok(&member.odata_id).await?;
            if !slot.is_inserted() {
                continue;
            }
            let Some(target) = slot.actions.eject.and_then(|a| a.target) else {
                warn!("{} is inserted but has no eject action", member.odata_id);
                continue;
            };
            let resp = self.transport.post(&target, &serde_json::json!({})).await?;
            self.transport.expect_ok(resp, &target)?;
            self.transport.invalidate(&member.odata_id);
            info!("ejected {}", slot.image_name.as_deref().unwrap_or(&target));
            ejected += 1;
        }
        self.transport.invalidate(&uri);
        if ejected == 0 {
            info!("no virtual media inserted");
        }
        Ok(ejected)
    }
}

/// First member of a Redfish collection; the single-system, single-
/// manager assumption of this tool is enforced here.
async fn first_member(
    t: &Transport,
    collection_path: &str,
    what: &str,
) -> Result<String, RedfishError> {
    let collection: Collection = t.get_ok(collection_path).await?;
    collection
        .members
        .first()
        .map(|m| m.odata_id.clone())
        .ok_or_else(|| RedfishError::ResourceNotFound {
            url: t.url(collection_path),
            what: format!("members of {what}"),
        })
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// Registry-typed coercion for staged attribute values: integer
/// attributes are written as numbers, everything else as strings.
fn typed_attribute_value(attribute_type: Option<&str>, value: &str) -> serde_json::Value {
    if attribute_type == Some("Integer") {
        if let Ok(n) = value.parse::<i64>() {
            return serde_json::Value::from(n);
        }
    }
    serde_json::Value::from(value)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_last_segment() {
        assert_eq!(
            last_segment("/redfish/v1/Systems/System.Embedded.1"),
            "System.Embedded.1"
        );
        assert_eq!(last_segment("/redfish/v1/Managers/1/"), "1");
    }

    #[test]
    fn test_typed_attribute_value() {
        assert_eq!(
            typed_attribute_value(Some("Integer"), "42"),
            serde_json::json!(42)
        );
        assert_eq!(
            typed_attribute_value(Some("Enumeration"), "Uefi"),
            serde_json::json!("Uefi")
        );
        // Unparseable integers go through as strings and let the BMC
        // produce its own validation error.
        assert_eq!(
            typed_attribute_value(Some("Integer"), "lots"),
            serde_json::json!("lots")
        );
    }
}
