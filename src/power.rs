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
//! Host power state machine. Reads tolerate an unreachable BMC (the
//! `Down` sentinel); writes go through `ComputerSystem.Reset`.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use crate::model::system::ComputerSystem;
use crate::transport::Transport;
use crate::RedfishError;

/// Tri-state power view. `Down` means the BMC did not answer or
/// answered with garbage; it is never written, only observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
    Down,
}

impl PowerState {
    fn from_reported(s: &str) -> PowerState {
        if s.eq_ignore_ascii_case("on") {
            PowerState::On
        } else if s.eq_ignore_ascii_case("off") {
            PowerState::Off
        } else {
            PowerState::Down
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reset request values. Debug formatting matches the wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetType {
    On,
    ForceOff,
    GracefulShutdown,
    GracefulRestart,
    ForceRestart,
    PowerCycle,
}

impl ResetType {
    /// The forceful counterpart for BMCs that do not advertise the
    /// graceful variants.
    fn forced(self) -> ResetType {
        match self {
            ResetType::GracefulShutdown => ResetType::ForceOff,
            ResetType::GracefulRestart => ResetType::ForceRestart,
            other => other,
        }
    }
}

impl fmt::Display for ResetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pick the reset value actually sent, honoring the advertised
/// allowable values. An empty list means the BMC did not advertise
/// anything and the desired value is sent as-is.
pub fn choose_reset_type(desired: ResetType, allowable: &[String]) -> ResetType {
    if allowable.is_empty() || allowable.iter().any(|v| v == &desired.to_string()) {
        return desired;
    }
    let fallback = desired.forced();
    if allowable.iter().any(|v| v == &fallback.to_string()) {
        warn!("{desired} not advertised, sending {fallback} instead");
        return fallback;
    }
    warn!("{desired} not in advertised reset types {allowable:?}, sending anyway");
    desired
}

/// Read the current power state. Any failure to reach or parse the
/// system resource reports `Down` instead of erroring; callers decide
/// whether an unreachable host matters.
pub async fn get_power_state(t: &Transport, system_path: &str) -> PowerState {
    t.invalidate(system_path);
    let resp = match t.request(Method::GET, system_path, None, true).await {
        Ok(Some(resp)) if resp.ok() => resp,
        Ok(_) => return PowerState::Down,
        Err(_) => return PowerState::Down,
    };
    let system: ComputerSystem = match resp.parse(&t.url(system_path)) {
        Ok(s) => s,
        Err(_) => return PowerState::Down,
    };
    system
        .power_state
        .as_deref()
        .map(PowerState::from_reported)
        .unwrap_or(PowerState::Down)
}

/// POST a reset action. A 409 means the host is already where the
/// reset would put it, which is success for our purposes.
pub async fn reset(
    t: &Transport,
    system_path: &str,
    desired: ResetType,
) -> Result<(), RedfishError> {
    let system: ComputerSystem = t.get_ok(system_path).await?;
    let (target, allowable) = match system.actions.reset {
        Some(action) => (
            action
                .target
                .unwrap_or_else(|| default_reset_target(system_path)),
            action.allowable_values,
        ),
        None => (default_reset_target(system_path), Vec::new()),
    };
    let reset_type = choose_reset_type(desired, &allowable);
    let body = serde_json::json!({ "ResetType": reset_type.to_string() });
    let resp = t.post(&target, &body).await?;
    if resp.status == StatusCode::CONFLICT {
        warn!("reset {reset_type} returned 409, host already in requested state");
    } else {
        t.expect_ok(resp, &target)?;
        info!("sent {reset_type} to {target}");
    }
    t.invalidate(system_path);
    Ok(())
}

/// Poll until the host reports (or stops reporting) the target state.
/// `equals` false inverts the condition, used to wait for a host to
/// leave a state. Comparison is against the tri-state view, so `Down`
/// is a matchable target too.
pub async fn poll_state(
    t: &Transport,
    system_path: &str,
    target: PowerState,
    equals: bool,
    interval: Duration,
    retries: u32,
) -> Result<(), RedfishError> {
    let attempts = retries.max(1);
    let goal = if equals {
        target.to_string()
    } else {
        format!("not {target}")
    };
    for attempt in 1..=attempts {
        let state = get_power_state(t, system_path).await;
        if (state == target) == equals {
            info!("power state is {state}");
            return Ok(());
        }
        info!("power state {state}, waiting for {goal} [{attempt}/{attempts}]");
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(RedfishError::PowerTimeout {
        target: goal,
        attempts,
    })
}

/// Turn the host on or off and wait for the transition. Powering off a
/// host whose BMC is unreachable is a warned no-op; there is nothing
/// left to turn off.
pub async fn set_power_state(
    t: &Transport,
    system_path: &str,
    target: PowerState,
    interval: Duration,
    retries: u32,
) -> Result<(), RedfishError> {
    let current = get_power_state(t, system_path).await;
    match (current, target) {
        (cur, tgt) if cur == tgt => {
            info!("host already {target}");
            return Ok(());
        }
        (PowerState::Down, PowerState::Off) => {
            warn!("host is unreachable, treating power-off as done");
            return Ok(());
        }
        _ => {}
    }
    let reset_type = match target {
        PowerState::On => ResetType::On,
        PowerState::Off => ResetType::GracefulShutdown,
        PowerState::Down => {
            return Err(RedfishError::Unsupported {
                action: "setting power state to Down".to_string(),
            })
        }
    };
    reset(t, system_path, reset_type).await?;
    poll_state(t, system_path, target, true, interval, retries).await
}

/// Full reboot. From On: graceful restart (or force off), wait for
/// Off with a one-shot force fallback, wait for the BMC to report any
/// state at all, then power on. From Off or Down: just power on.
pub async fn reboot(
    t: &Transport,
    system_path: &str,
    graceful: bool,
    interval: Duration,
    retries: u32,
) -> Result<(), RedfishError> {
    let current = get_power_state(t, system_path).await;
    if current == PowerState::On {
        let down = if graceful {
            ResetType::GracefulRestart
        } else {
            ResetType::ForceOff
        };
        reset(t, system_path, down).await?;
        // A hung OS can ignore the graceful request; force it once.
        if poll_state(t, system_path, PowerState::Off, true, interval, retries)
            .await
            .is_err()
        {
            warn!("host did not reach Off in time, forcing off");
            reset(t, system_path, ResetType::ForceOff).await?;
        }
        // The BMC itself can blip around a reset; wait until it
        // reports something before asking for power-on.
        poll_state(t, system_path, PowerState::Down, false, interval, retries).await?;
    }
    reset(t, system_path, ResetType::On).await?;
    poll_state(t, system_path, PowerState::On, true, interval, retries).await
}

/// Hard power cycle in one action when the BMC offers it, otherwise an
/// off/on pair.
pub async fn power_cycle(
    t: &Transport,
    system_path: &str,
    interval: Duration,
    retries: u32,
) -> Result<(), RedfishError> {
    let system: ComputerSystem = t.get_ok(system_path).await?;
    let advertised = system
        .actions
        .reset
        .map(|a| a.allowable_values)
        .unwrap_or_default();
    if advertised.iter().any(|v| v == "PowerCycle") {
        reset(t, system_path, ResetType::PowerCycle).await?;
        return poll_state(t, system_path, PowerState::On, true, interval, retries).await;
    }
    reboot(t, system_path, false, interval, retries).await
}

fn default_reset_target(system_path: &str) -> String {
    format!("{system_path}/Actions/ComputerSystem.Reset")
}

#[cfg(test)]
mod test {
    use super::*;

    fn advertised(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reported_state_mapping() {
        assert_eq!(PowerState::from_reported("On"), PowerState::On);
        assert_eq!(PowerState::from_reported("off"), PowerState::Off);
        assert_eq!(PowerState::from_reported("PoweringOn"), PowerState::Down);
    }

    #[test]
    fn test_reset_type_wire_strings() {
        assert_eq!(ResetType::GracefulShutdown.to_string(), "GracefulShutdown");
        assert_eq!(ResetType::ForceOff.to_string(), "ForceOff");
        assert_eq!(ResetType::PowerCycle.to_string(), "PowerCycle");
    }

    #[test]
    fn test_choose_advertised_value() {
        let allowed = advertised(&["On", "ForceOff", "GracefulShutdown"]);
        assert_eq!(
            choose_reset_type(ResetType::GracefulShutdown, &allowed),
            ResetType::GracefulShutdown
        );
    }

    #[test]
    fn test_choose_falls_back_to_forced() {
        let allowed = advertised(&["On", "ForceOff", "ForceRestart"]);
        assert_eq!(
            choose_reset_type(ResetType::GracefulShutdown, &allowed),
            ResetType::ForceOff
        );
        assert_eq!(
            choose_reset_type(ResetType::GracefulRestart, &allowed),
            ResetType::ForceRestart
        );
    }

    #[test]
    fn test_choose_with_no_advertised_values() {
        assert_eq!(
            choose_reset_type(ResetType::GracefulRestart, &[]),
            ResetType::GracefulRestart
        );
    }
}
