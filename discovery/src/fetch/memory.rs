use super::{FetchError, Fetcher};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// In-memory fetcher with canned responses
/// Every requested path is recorded, which makes the probing order observable.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: BTreeMap<String, Vec<u8>>,
    probes: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// register `body` under `path`, replacing any earlier response
    pub fn insert(&mut self, path: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.responses.insert(path.into(), body.into());
    }

    pub fn with(mut self, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(path, body);
        self
    }

    /// all paths requested so far, in the order the requests completed
    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().clone()
    }

    pub fn clear_probes(&self) {
        self.probes.lock().clear();
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        self.probes.lock().push(path.to_string());

        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            })
    }
}
