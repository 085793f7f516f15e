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

/// A vendor configuration job as observed through polling. Dell job
/// resources carry more than this; only the fields the state machine
/// needs are kept.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    pub id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub percent_complete: Option<i64>,
}

#[cfg(test)]
mod test {
    #[test]
    fn test_job_parser() {
        let data = include_str!("testdata/job.json");
        let job: super::Job = serde_json::from_str(data).unwrap();
        assert_eq!(job.id.as_deref(), Some("JID_471269252011"));
        assert_eq!(job.message, "Job completed successfully.");
        assert_eq!(job.percent_complete, Some(100));
    }

    #[test]
    fn test_job_without_progress() {
        let job: super::Job =
            serde_json::from_str(r#"{"Id": "JID_1", "Message": "Task running"}"#).unwrap();
        assert_eq!(job.percent_complete, None);
    }
}
