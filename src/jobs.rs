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
//! Vendor configuration jobs: creation, polling, queue management.
//! Job completion is only ever observed by polling message strings.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::model::job::Job;
use crate::model::{Collection, ODataId};
use crate::transport::{Transport, REDFISH_ROOT};
use crate::vendor::Vendor;
use crate::RedfishError;

/// Terminal and non-terminal states of a polled job, derived purely
/// from the message string the BMC reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Pending,
    Progressing,
    Succeeded,
    Failed,
}

/// Map a raw job message onto the polling state machine. The success
/// strings are exact matches because firmware reuses words like
/// "successfully" in progress messages too.
pub fn classify(message: &str) -> JobOutcome {
    if message.is_empty() {
        return JobOutcome::Pending;
    }
    if message == "Task successfully scheduled." || message == "Job completed successfully." {
        return JobOutcome::Succeeded;
    }
    if message.to_ascii_lowercase().contains("fail") {
        return JobOutcome::Failed;
    }
    JobOutcome::Progressing
}

/// Pull a job ID out of a raw response body. Job creation responses do
/// not reliably expose the ID as a JSON field across firmware
/// revisions, so this scrapes for the vendor ID token instead. If a
/// future firmware returns structured IDs, this is the only place that
/// changes.
pub fn extract_job_id(text: &str) -> Option<String> {
    static ID_PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = ID_PATTERN.get_or_init(|| {
        Regex::new(r"[JR]ID_[A-Za-z0-9_]+").expect("job id pattern is valid")
    });
    re.find(text).map(|m| m.as_str().to_string())
}

/// POST a settings-apply job and return its ID.
pub async fn create_config_job(
    t: &Transport,
    manager_path: &str,
    target_uri: &str,
) -> Result<String, RedfishError> {
    let uri = format!("{manager_path}/Jobs");
    let target = if target_uri.starts_with(REDFISH_ROOT) {
        target_uri.to_string()
    } else {
        format!("{REDFISH_ROOT}{target_uri}")
    };
    let body = serde_json::json!({ "TargetSettingsURI": target });
    let resp = t.post(&uri, &body).await?;
    let resp = t.expect_ok(resp, &uri)?;

    // Body first, Location header second; some firmware only sets one.
    let id = extract_job_id(&resp.body)
        .or_else(|| resp.header("Location").and_then(extract_job_id));
    match id {
        Some(id) => {
            info!("created configuration job {id}");
            Ok(id)
        }
        None => Err(RedfishError::JobIdMissing { url: t.url(&uri) }),
    }
}

/// Poll a job until it reaches a terminal state or the budget runs out.
pub async fn poll_job(
    t: &Transport,
    manager_path: &str,
    job_id: &str,
    interval: Duration,
    retries: u32,
) -> Result<Job, RedfishError> {
    let uri = format!("{manager_path}/Jobs/{job_id}");
    let attempts = retries.max(1);
    for attempt in 1..=attempts {
        // The whole point is to observe a change.
        t.invalidate(&uri);
        let job: Job = t.get_ok(&uri).await?;
        match classify(&job.message) {
            JobOutcome::Succeeded => {
                info!("job {job_id}: {}", job.message);
                return Ok(job);
            }
            JobOutcome::Failed => {
                return Err(RedfishError::JobFailed {
                    job_id: job_id.to_string(),
                    message: job.message,
                });
            }
            JobOutcome::Pending | JobOutcome::Progressing => {
                info!(
                    "job {job_id} [{attempt}/{attempts}]: {} ({}%)",
                    job.message,
                    job.percent_complete.unwrap_or(0)
                );
            }
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    Err(RedfishError::JobTimedOut {
        job_id: job_id.to_string(),
        attempts,
    })
}

/// IDs of every job currently queued on the manager.
pub async fn list_job_ids(t: &Transport, manager_path: &str) -> Result<Vec<String>, RedfishError> {
    let uri = format!("{manager_path}/Jobs");
    t.invalidate(&uri);
    let collection: Collection = t.get_ok(&uri).await?;
    Ok(collection.members.iter().map(job_id_of).collect())
}

pub async fn delete_job(t: &Transport, manager_path: &str, id: &str) -> Result<(), RedfishError> {
    let uri = format!("{manager_path}/Jobs/{id}");
    let resp = t.delete(&uri).await?;
    t.expect_ok(resp, &uri)?;
    info!("deleted job {id}");
    Ok(())
}

/// Empty the job queue through a three-tier degrading chain: the Dell
/// bulk-delete action, then the synthetic clear-all job deletion, then
/// one DELETE per job. Each tier runs only after the previous one
/// reported unsupported or failed.
pub async fn clear_queue(
    t: &Transport,
    manager_path: &str,
    vendor: Vendor,
    force: bool,
) -> Result<(), RedfishError> {
    let mut tiers_failed: Vec<String> = Vec::new();

    if vendor.supports_bulk_job_clear() {
        match bulk_delete(t, manager_path, vendor, force).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_unsupported() => {
                debug!("bulk job delete unsupported, degrading: {e}");
                tiers_failed.push(format!("DellJobService.DeleteJobQueue: {e}"));
            }
            Err(e) => {
                warn!("bulk job delete failed, degrading: {e}");
                tiers_failed.push(format!("DellJobService.DeleteJobQueue: {e}"));
            }
        }
    } else {
        tiers_failed.push("DellJobService.DeleteJobQueue: not a Dell manager".to_string());
    }

    let clearall = format!("{manager_path}/Jobs/JID_CLEARALL_FORCE");
    match t.delete(&clearall).await {
        Ok(resp) if resp.ok() => {
            info!("job queue cleared via JID_CLEARALL_FORCE");
            t.invalidate(&format!("{manager_path}/Jobs"));
            return Ok(());
        }
        Ok(resp) => {
            let e = crate::transport::error_from_response(&t.url(&clearall), &resp);
            warn!("clear-all job delete failed, degrading: {e}");
            tiers_failed.push(format!("JID_CLEARALL_FORCE: {e}"));
        }
        Err(e) => {
            warn!("clear-all job delete failed, degrading: {e}");
            tiers_failed.push(format!("JID_CLEARALL_FORCE: {e}"));
        }
    }

    match delete_each_job(t, manager_path).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tiers_failed.push(format!("per-job delete: {e}"));
            Err(RedfishError::JobQueueStuck {
                tiers: tiers_failed.join("; "),
            })
        }
    }
}

async fn bulk_delete(
    t: &Transport,
    manager_path: &str,
    vendor: Vendor,
    force: bool,
) -> Result<(), RedfishError> {
    let service = vendor
        .job_service_path(manager_path)
        .ok_or_else(|| RedfishError::Unsupported {
            action: "bulk job queue delete".to_string(),
        })?;
    // Probe before acting: older firmware has the Oem block but not
    // the job service resource.
    let probe = t.get(&service).await?;
    if !probe.ok() {
        return Err(RedfishError::Unsupported {
            action: "bulk job queue delete".to_string(),
        });
    }
    let action = format!("{service}/Actions/DellJobService.DeleteJobQueue");
    let job_id = if force { "JID_CLEARALL_FORCE" } else { "JID_CLEARALL" };
    let body = serde_json::json!({ "JobID": job_id });
    let resp = t.post(&action, &body).await?;
    t.expect_ok(resp, &action)?;
    info!("job queue cleared via DellJobService ({job_id})");
    t.invalidate(&format!("{manager_path}/Jobs"));
    Ok(())
}

async fn delete_each_job(t: &Transport, manager_path: &str) -> Result<(), RedfishError> {
    let ids = list_job_ids(t, manager_path).await?;
    if ids.is_empty() {
        info!("job queue is already empty");
        return Ok(());
    }
    for id in &ids {
        delete_job(t, manager_path, id).await?;
    }
    info!("job queue cleared one job at a time ({} jobs)", ids.len());
    Ok(())
}

fn job_id_of(member: &ODataId) -> String {
    member
        .odata_id
        .rsplit('/')
        .next()
        .unwrap_or(&member.odata_id)
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify_terminal_success() {
        assert_eq!(classify("Job completed successfully."), JobOutcome::Succeeded);
        assert_eq!(classify("Task successfully scheduled."), JobOutcome::Succeeded);
    }

    #[test]
    fn test_classify_failures_case_insensitive() {
        assert_eq!(classify("Job failed."), JobOutcome::Failed);
        assert_eq!(classify("FAILED to apply settings"), JobOutcome::Failed);
        assert_eq!(classify("Unable to verify: Failure"), JobOutcome::Failed);
    }

    #[test]
    fn test_classify_progress_and_pending() {
        assert_eq!(classify(""), JobOutcome::Pending);
        assert_eq!(classify("Running 10%"), JobOutcome::Progressing);
        // "successfully" inside a progress message is not terminal
        assert_eq!(
            classify("Successfully staged component for update"),
            JobOutcome::Progressing
        );
    }

    #[test]
    fn test_message_sequence_terminates_on_third() {
        let messages = ["Running 10%", "Running 50%", "Job completed successfully."];
        let polls_needed = messages
            .iter()
            .position(|m| classify(m) == JobOutcome::Succeeded)
            .map(|p| p + 1);
        assert_eq!(polls_needed, Some(3));
    }

    #[test]
    fn test_extract_job_id_from_raw_body() {
        let body = r#"{"@Message.ExtendedInfo": [{"Message": "Successfully scheduled",
            "MessageArgs": ["JID_471269252011"]}]}"#;
        assert_eq!(extract_job_id(body).as_deref(), Some("JID_471269252011"));
    }

    #[test]
    fn test_extract_reboot_job_id() {
        assert_eq!(
            extract_job_id("/redfish/v1/Managers/iDRAC.Embedded.1/Jobs/RID_471269252012").as_deref(),
            Some("RID_471269252012")
        );
    }

    #[test]
    fn test_extract_job_id_absent() {
        assert_eq!(extract_job_id(r#"{"ok": true}"#), None);
    }

    #[test]
    fn test_job_id_of_member() {
        let member = crate::model::ODataId {
            odata_id: "/redfish/v1/Managers/iDRAC.Embedded.1/Jobs/JID_1".to_string(),
        };
        assert_eq!(job_id_of(&member), "JID_1");
    }
}
