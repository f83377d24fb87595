use crate::{
    config::{ConfigErrors, DiscoveryConfig},
    fetch::{FetchError, Fetcher, Fetchers},
    results::{BuildResult, ResultFile, ResultPayload, ResultSet},
};
use indexmap::IndexMap;
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, instrument, trace, warn};

/// Discovery bound to a configured source and its own fetch pool
#[derive(Debug)]
pub struct Discovery {
    fetcher: Fetchers,
    files: Vec<ResultFile>,
    threshold: u64,
    pool: ThreadPool,
}

impl Discovery {
    pub fn load(config: &DiscoveryConfig) -> Result<Self, ConfigErrors> {
        let files = config.result_files()?;
        let fetcher = Fetchers::load(&config.source)?;

        // one thread per file lets a whole build be in flight at once
        let threads = config.threads.unwrap_or(files.len());
        debug!("Starting fetch pool with {threads} threads");

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("glt-fetch-{index}"))
            .build()?;

        Ok(Self {
            fetcher,
            files,
            threshold: config.threshold,
            pool,
        })
    }

    pub fn files(&self) -> &[ResultFile] {
        &self.files
    }

    /// size of the fetch pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn run(&self) -> ResultSet {
        self.pool
            .install(|| discover_results(&self.fetcher, &self.files, self.threshold))
    }
}

/// Probe `results/<build>/<file>` for build 0, 1, 2, ... until a build past `threshold`
/// comes back empty. Builds with at least one result are returned, most recent first.
///
/// Fetches of one build run concurrently on the current rayon pool, builds are strictly
/// sequential.
pub fn discover_results<F: Fetcher>(fetcher: &F, files: &[ResultFile], threshold: u64) -> ResultSet {
    let mut builds = Vec::new();
    let mut consecutive_empty = 0u64;

    for build_number in 0u64.. {
        match probe_build(fetcher, files, build_number) {
            Some(build) => {
                debug!(
                    build = build_number,
                    files = build.results().len(),
                    "Found results"
                );
                consecutive_empty = 0;
                builds.push(build);
            }
            None => {
                consecutive_empty += 1;
                trace!(build = build_number, consecutive_empty, "Build is empty");

                if build_number > threshold {
                    info!(
                        last_probed = build_number,
                        consecutive_empty,
                        found = builds.len(),
                        "Done with discovery"
                    );
                    break;
                }
            }
        }
    }

    ResultSet::from_ascending(builds)
}

/// Fetch every file of one build and join before deciding on the build.
/// `None` if nothing could be fetched.
#[instrument(level = "debug", skip(fetcher, files))]
pub fn probe_build<F: Fetcher>(fetcher: &F, files: &[ResultFile], build_number: u64) -> Option<BuildResult> {
    // indexed parallel iterators keep the input order on collect
    let fetched: Vec<(&ResultFile, Result<ResultPayload, FetchError>)> = files
        .par_iter()
        .map(|file| (file, fetch_payload(fetcher, &file.path_for(build_number))))
        .collect();

    let mut results = IndexMap::with_capacity(fetched.len());

    for (file, outcome) in fetched {
        match outcome {
            Ok(payload) => {
                results.entry(file.clone()).or_insert(payload);
            }
            Err(error) if error.is_not_found() => {
                trace!(file = %file, "Not present");
            }
            Err(error) => {
                warn!(error = ?error, file = %file, build = build_number, "Skipping result file: {error}");
            }
        }
    }

    BuildResult::new(build_number, results)
}

/// fetch and validate a single document
pub fn fetch_payload<F: Fetcher>(fetcher: &F, path: &str) -> Result<ResultPayload, FetchError> {
    let bytes = fetcher.fetch(path)?;

    ResultPayload::from_slice(&bytes).map_err(|source| FetchError::Parse {
        path: path.to_string(),
        source,
    })
}
