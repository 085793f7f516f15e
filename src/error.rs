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
use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum RedfishError {
    /// 401 or rejected credentials. Never retried.
    #[error("Authentication failed against {url}: {reason}")]
    Auth { url: String, reason: String },

    #[error("Communication failure talking to BMC at {url}. {source}")]
    Communication {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// An expected Redfish resource or collection is absent or empty.
    /// Usually an unsupported host/vendor/firmware combination.
    #[error("Redfish resource missing at {url}: {what}")]
    ResourceNotFound { url: String, what: String },

    /// Non-2XX with a parseable vendor error body. The reason is the
    /// vendor's ExtendedInfo message when one was present.
    #[error("HTTP {status} at {url}: {reason}")]
    RequestFailed {
        url: String,
        status: StatusCode,
        reason: String,
    },

    /// Body was expected to be JSON but could not be parsed. Distinct
    /// from RequestFailed: it indicates a protocol mismatch, not a
    /// rejected request.
    #[error("Unreadable response body from {url}: {body}")]
    ResponseUnreadable { url: String, body: String },

    /// A vendor extension endpoint this operation needs does not exist
    /// on this BMC. Fallback chains treat this as "try the next tier".
    #[error("{action} is not supported by this BMC")]
    Unsupported { action: String },

    #[error("Could not serialize request body for {url}. {source}")]
    Serialize {
        url: String,
        source: serde_json::Error,
    },

    #[error("Could not find a job ID in the job creation response from {url}")]
    JobIdMissing { url: String },

    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Job {job_id} did not reach a terminal state within {attempts} polls")]
    JobTimedOut { job_id: String, attempts: u32 },

    #[error("Job queue could not be cleared. Tiers attempted: {tiers}")]
    JobQueueStuck { tiers: String },

    #[error("Power state '{target}' not reached within {attempts} polls")]
    PowerTimeout { target: String, attempts: u32 },

    #[error("None of the requested boot devices exist on this host: {requested}")]
    NoUsableBootDevice { requested: String },

    #[error("Unknown BIOS attribute {name}")]
    UnknownBiosAttribute { name: String },

    #[error("BIOS attribute {name} is read-only")]
    ReadOnlyBiosAttribute { name: String },

    #[error("BIOS attribute {name} does not accept '{value}'. Accepted values: {accepted}")]
    InvalidBiosValue {
        name: String,
        value: String,
        accepted: String,
    },

    #[error("Could not load interface mapping from {path}: {reason}")]
    MappingUnreadable { path: String, reason: String },

    #[error("No interface mapping entry for host type '{host_type}'. Tried keys: {tried}")]
    MappingMissing { host_type: String, tried: String },

    #[error("No interface with MAC address {mac} found on this host")]
    MacNotFound { mac: String },
}

impl RedfishError {
    /// Whether this error means "the endpoint is not there", as opposed
    /// to the request being rejected. Degrading fallback chains move on
    /// to their next tier on these.
    pub fn is_unsupported(&self) -> bool {
        match self {
            RedfishError::Unsupported { .. } => true,
            RedfishError::RequestFailed { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}
