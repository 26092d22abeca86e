//! HTTP health probe for the hub endpoint.
//!
//! A live process id is only a candidate signal; the probe distinguishes
//! "process exists" from "process is actually serving".

use reqwest::Client;
use tracing::debug;

/// Probes the candidate paths in order against `base_url`.
///
/// The first response with a status below the server-error class counts as
/// healthy; any 4xx still means something is listening and answering.
/// Connection failures and timeouts move on to the next candidate.
pub(crate) async fn probe(client: &Client, base_url: &str, paths: &[String]) -> bool {
    for path in paths {
        let url = format!("{base_url}{path}");
        match client.get(&url).send().await {
            Ok(res) if res.status().as_u16() < 500 => {
                debug!(%url, status = %res.status(), "health probe ok");
                return true;
            }
            Ok(res) => {
                debug!(%url, status = %res.status(), "health probe got server error");
            }
            Err(e) => {
                debug!(%url, error = %e, "health probe failed");
            }
        }
    }
    false
}
