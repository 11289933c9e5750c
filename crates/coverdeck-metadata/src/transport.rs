//! Blocking HTTP GET seam.

use std::time::Duration;

use coverdeck_types::error::{CoverdeckError, Result};

/// Performs a single blocking GET and returns the body.
///
/// Any non-success status is an error.
pub trait HttpTransport {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>>;
}

/// [`HttpTransport`] backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let mut response = request
            .call()
            .map_err(|e| CoverdeckError::Http(format!("GET {url}: {e}")))?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| CoverdeckError::Http(format!("reading body of {url}: {e}")))
    }
}
