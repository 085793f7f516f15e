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
//! Host-list mode: the same command against many BMCs at once. Each
//! host gets its own task, session and caches; only the transport
//! pool's in-flight bound and the log sink are shared.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, info_span, Instrument};

use crate::client::{ClientConfig, Command, HostClient};
use crate::mapping::InterfaceMapping;
use crate::transport::{Endpoint, TransportPool};

/// What happened on one host. Failures carry the rendered error so the
/// summary can be printed after every task has finished.
#[derive(Debug)]
pub struct HostReport {
    pub host: String,
    pub error: Option<String>,
}

impl HostReport {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

pub fn all_passed(reports: &[HostReport]) -> bool {
    reports.iter().all(HostReport::passed)
}

/// Run one command against every host. A failing host never aborts its
/// siblings; the PASS/FAIL summary is logged at the end and the
/// returned reports drive the process exit code.
pub async fn run_hosts(
    pool: &TransportPool,
    hosts: &[String],
    user: &str,
    password: &str,
    command: &Command,
    mapping: Option<Arc<InterfaceMapping>>,
    config: &ClientConfig,
) -> Vec<HostReport> {
    let mut tasks = Vec::with_capacity(hosts.len());
    for host in hosts {
        let endpoint = Endpoint {
            host: host.clone(),
            port: None,
            user: user.to_string(),
            password: password.to_string(),
        };
        let pool = pool.clone();
        let command = command.clone();
        let mapping = mapping.clone();
        let config = config.clone();
        let span = info_span!("host", host = %host);
        tasks.push(tokio::spawn(
            async move { run_one(pool, endpoint, command, mapping, config).await }
                .instrument(span),
        ));
    }

    let mut reports = Vec::with_capacity(hosts.len());
    for (host, joined) in hosts.iter().zip(join_all(tasks).await) {
        let error = match joined {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(e) => Some(format!("task aborted: {e}")),
        };
        reports.push(HostReport {
            host: host.clone(),
            error,
        });
    }

    for report in &reports {
        match &report.error {
            None => info!("PASS {}", report.host),
            Some(e) => error!("FAIL {}: {}", report.host, e),
        }
    }
    let passed = reports.iter().filter(|r| r.passed()).count();
    info!("{passed}/{} hosts succeeded", reports.len());
    reports
}

async fn run_one(
    pool: TransportPool,
    endpoint: Endpoint,
    command: Command,
    mapping: Option<Arc<InterfaceMapping>>,
    config: ClientConfig,
) -> Result<(), crate::RedfishError> {
    let mut client = HostClient::connect(&pool, endpoint, config).await?;
    let result = client.run(&command, mapping.as_deref()).await;
    // Teardown always runs and never masks the command's outcome.
    client.close().await;
    result
}

#[cfg(test)]
mod test {
    use super::*;

    fn report(host: &str, error: Option<&str>) -> HostReport {
        HostReport {
            host: host.to_string(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_aggregate_result() {
        assert!(all_passed(&[report("a", None), report("b", None)]));
        assert!(!all_passed(&[
            report("a", None),
            report("b", Some("boom"))
        ]));
        assert!(all_passed(&[]));
    }
}
