use super::{FetchError, Fetcher};
use crate::config::ConfigErrors;
use std::{fmt, time::Duration};
use tracing::{debug, trace};
use url::Url;

/// Fetcher that requests result files from a web server hosting the load tester output
#[derive(Clone)]
pub struct HttpFetcher {
    base: Url,
    timeout: Duration,
    agent: ureq::Agent,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("base", &self.base.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpFetcher {
    /// `timeout` is in milliseconds and applies to each request as a whole
    pub fn load(base: &Url, timeout: u64) -> Result<Self, ConfigErrors> {
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ConfigErrors::InvalidUrl(base.to_string()));
        }

        // join() replaces the last segment unless the base ends in a slash
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let timeout = Duration::from_millis(timeout);
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        debug!(base = %base, timeout = ?timeout, "Loaded http fetcher");

        Ok(Self {
            base,
            timeout,
            agent,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path).map_err(|source| FetchError::InvalidUrl {
            path: path.to_string(),
            source,
        })?;

        trace!(url = %url, "Requesting result file");

        let mut response = match self.agent.get(url.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(FetchError::NotFound {
                    path: path.to_string(),
                })
            }
            Err(ureq::Error::StatusCode(status)) => {
                return Err(FetchError::Status {
                    path: path.to_string(),
                    status,
                })
            }
            Err(ureq::Error::Timeout(_)) => {
                return Err(FetchError::Timeout {
                    path: path.to_string(),
                })
            }
            Err(source) => {
                return Err(FetchError::Transport {
                    path: path.to_string(),
                    source,
                })
            }
        };

        response
            .body_mut()
            .read_to_vec()
            .map_err(|source| match source {
                ureq::Error::Timeout(_) => FetchError::Timeout {
                    path: path.to_string(),
                },
                source => FetchError::Transport {
                    path: path.to_string(),
                    source,
                },
            })
    }
}
