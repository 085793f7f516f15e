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
//! Out-of-band host management over the Redfish API of a BMC:
//! boot-order reconciliation, one-time boot, vendor job queues, power
//! state transitions, BIOS attributes and virtual media, against one
//! host or a whole host list concurrently.

pub mod model;

mod batch;
mod boot;
mod client;
mod error;
mod jobs;
mod mapping;
mod power;
mod session;
mod transport;
mod vendor;

pub use batch::{all_passed, run_hosts, HostReport};
pub use client::{ClientConfig, Command, HostClient};
pub use error::RedfishError;
pub use jobs::JobOutcome;
pub use mapping::InterfaceMapping;
pub use power::{PowerState, ResetType};
pub use session::Session;
pub use transport::{
    Endpoint, Response, Transport, TransportPool, TransportPoolBuilder, REDFISH_ROOT,
};
pub use vendor::Vendor;
