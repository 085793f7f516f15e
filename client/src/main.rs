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

/* Out-of-band host management CLI.
 *
 * USAGE: ./redfishctl -H mgmt-f21-h23-000-r640.example.com -U root -P pass -c check_boot
 * -H: hostname or IP of the BMC's Redfish API, or -l FILE for many hosts.
 * Run with no params for help.
 * Run with `-v` for more output.
 */

use std::sync::Arc;

use anyhow::anyhow;
use redfishctl::{run_hosts, all_passed, ClientConfig, Command, InterfaceMapping, TransportPool};
use tracing::error;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::prelude::*;

fn options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "Print this help");
    opts.optflag("v", "verbose", "Log at DEBUG level. Default is INFO");
    opts.optopt(
        "H",
        "hostname",
        "Hostname or IP address of the BMC Redfish API",
        "HOST",
    );
    opts.optopt(
        "l",
        "host-list",
        "File with one BMC hostname per line; runs the command on all of them",
        "FILE",
    );
    opts.optopt("U", "username", "BMC username", "USER");
    opts.optopt("P", "password", "BMC password", "PASS");
    opts.optopt(
        "i",
        "interfaces",
        "YAML interface mapping for boot-order commands",
        "FILE",
    );
    opts.optopt("t", "host-type", "Host type for change_boot_order", "TYPE");
    opts.optopt("d", "device", "Boot device name for boot_to", "DEVICE");
    opts.optopt("m", "mac", "NIC MAC address for boot_to_mac", "MAC");
    opts.optopt("j", "job", "Job ID for delete_job", "JOB_ID");
    opts.optmulti(
        "a",
        "attribute",
        "BIOS attribute: NAME for get_bios_attribute, NAME=VALUE for set_bios_attribute",
        "NAME[=VALUE]",
    );
    opts.optopt("r", "retries", "Retry/poll budget, default 15", "N");
    opts.optflag("", "force", "Use the forced variant of clear_jobs");
    opts.optopt(
        "c",
        "cmd",
        "Command to run:
                check_boot
                check_power
                change_boot_order
                boot_to
                boot_to_mac
                reboot
                reboot_force
                power_on
                power_off
                power_cycle
                clear_jobs
                list_jobs
                delete_job
                reset_idrac
                reset_bios
                firmware_inventory
                get_bios_attribute
                set_bios_attribute
                check_virtual_media
                unmount_virtual_media",
        "CMD",
    );
    opts
}

fn parse_command(cmd: &str, args: &getopts::Matches) -> Result<Command, anyhow::Error> {
    let command = match cmd {
        "check_boot" => Command::CheckBoot,
        "check_power" => Command::CheckPower,
        "change_boot_order" => Command::ChangeBootOrder {
            host_type: args
                .opt_str("t")
                .ok_or_else(|| anyhow!("change_boot_order needs -t HOST_TYPE"))?,
        },
        "boot_to" => Command::BootToDevice {
            device: args
                .opt_str("d")
                .ok_or_else(|| anyhow!("boot_to needs -d DEVICE"))?,
        },
        "boot_to_mac" => Command::BootToMac {
            mac: args
                .opt_str("m")
                .ok_or_else(|| anyhow!("boot_to_mac needs -m MAC"))?,
        },
        "reboot" => Command::Reboot { graceful: true },
        "reboot_force" => Command::Reboot { graceful: false },
        "power_on" => Command::PowerOn,
        "power_off" => Command::PowerOff,
        "power_cycle" => Command::PowerCycle,
        "clear_jobs" => Command::ClearJobs {
            force: args.opt_present("force"),
        },
        "list_jobs" => Command::ListJobs,
        "delete_job" => Command::DeleteJob {
            id: args
                .opt_str("j")
                .ok_or_else(|| anyhow!("delete_job needs -j JOB_ID"))?,
        },
        "reset_idrac" => Command::ResetManager,
        "reset_bios" => Command::ResetBios,
        "firmware_inventory" => Command::FirmwareInventory,
        "get_bios_attribute" => Command::GetBiosAttribute {
            name: args.opt_strs("a").into_iter().next(),
        },
        "set_bios_attribute" => {
            let mut attributes = Vec::new();
            for raw in args.opt_strs("a") {
                let (name, value) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("-a expects NAME=VALUE, got '{raw}'"))?;
                attributes.push((name.to_string(), value.to_string()));
            }
            if attributes.is_empty() {
                return Err(anyhow!("set_bios_attribute needs at least one -a NAME=VALUE"));
            }
            Command::SetBiosAttributes { attributes }
        }
        "check_virtual_media" => Command::CheckVirtualMedia,
        "unmount_virtual_media" => Command::UnmountVirtualMedia,
        other => return Err(anyhow!("Unsupported command specified {other}")),
    };
    Ok(command)
}

fn read_host_list(path: &str) -> Result<Vec<String>, anyhow::Error> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("could not read host list {path}: {e}"))?;
    let hosts: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect();
    if hosts.is_empty() {
        return Err(anyhow!("host list {path} contains no hosts"));
    }
    Ok(hosts)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args: Vec<String> = std::env::args().collect();
    let opts = options();
    let args_given = opts.parse(&args[1..])?;

    let have_target = args_given.opt_present("H") || args_given.opt_present("l");
    if args_given.opt_present("h") || !have_target || !args_given.opt_present("c") {
        eprintln!(
            "{}",
            opts.usage("redfishctl -H bmc_host -U bmc_user -P bmc_pass -c cmd")
        );
        return Ok(());
    }

    let log_level = if args_given.opt_present("v") {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(log_level.into())
        .add_directive("hyper=warn".parse().unwrap());
    tracing_subscriber::registry()
        .with(Layer::default().compact())
        .with(env_filter)
        .init();

    let command = parse_command(&args_given.opt_str("c").unwrap(), &args_given)?;
    let hosts = match args_given.opt_str("l") {
        Some(path) => read_host_list(&path)?,
        None => vec![args_given.opt_str("H").unwrap()],
    };
    let user = args_given.opt_str("U").unwrap_or_default();
    let password = args_given.opt_str("P").unwrap_or_default();

    let mapping = match args_given.opt_str("i") {
        Some(path) => Some(Arc::new(InterfaceMapping::load(std::path::Path::new(
            &path,
        ))?)),
        None => None,
    };

    let mut config = ClientConfig::default();
    if let Some(retries) = args_given.opt_str("r") {
        config.retries = retries
            .parse()
            .map_err(|_| anyhow!("-r expects a number, got '{retries}'"))?;
    }

    let pool = TransportPool::builder().build()?;
    let reports = tokio::select! {
        reports = run_hosts(&pool, &hosts, &user, &password, &command, mapping, &config) => reports,
        _ = tokio::signal::ctrl_c() => {
            error!("interrupted");
            std::process::exit(130);
        }
    };

    if !all_passed(&reports) {
        std::process::exit(1);
    }
    Ok(())
}
