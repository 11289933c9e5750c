//! Shared test utilities for metadata tests.
//!
//! Provides a [`MockTransport`] that serves canned bodies by URL suffix and
//! records every request.

use std::cell::RefCell;
use std::rc::Rc;

use coverdeck_types::error::{CoverdeckError, Result};

use crate::transport::HttpTransport;

/// One recorded request.
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub query: Vec<(String, String)>,
}

/// Serves the body of the first route whose suffix matches the URL.
/// Unmatched URLs fail like a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<Vec<(String, Vec<u8>)>>,
    calls: RefCell<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn route(self: Rc<Self>, suffix: &str, body: &str) -> Rc<Self> {
        self.routes
            .borrow_mut()
            .push((suffix.to_string(), body.as_bytes().to_vec()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl HttpTransport for Rc<MockTransport> {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(Call {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self.routes
            .borrow()
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| CoverdeckError::Http(format!("GET {url}: status 404")))
    }
}
