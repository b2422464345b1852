//! Run configuration threaded through the daily pipeline.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::dispatch::DispatchConfig;
use crate::fetch::FetchConfig;

/// Number of stories a run asks for when nothing else is configured.
pub const DEFAULT_COUNT: usize = 10;

/// Everything one pipeline run needs, resolved before it starts.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Candidates to request from the source listing
    pub count: usize,
    pub fetch: FetchConfig,
    /// Explicit output path; `None` means [`PipelineConfig::default_output`]
    pub output: Option<PathBuf>,
    /// Keep the document after a successful send
    pub keep_document: bool,
    /// Compile only, never dispatch
    pub skip_send: bool,
    /// Required unless `skip_send` is set
    pub dispatch: Option<DispatchConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            fetch: FetchConfig::default(),
            output: None,
            keep_document: false,
            skip_send: false,
            dispatch: None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// `hn_daily_YYYY-MM-DD.epub` in the working directory.
    pub fn default_output(date: NaiveDate) -> PathBuf {
        PathBuf::from(format!("hn_daily_{}.epub", date.format("%Y-%m-%d")))
    }

    /// The configured output path, or the dated default.
    pub fn output_path(&self, date: NaiveDate) -> PathBuf {
        self.output.clone().unwrap_or_else(|| Self::default_output(date))
    }

    /// Whether the document should be removed once the run is over.
    ///
    /// Only a sent document is ever removed.
    pub fn removes_document(&self) -> bool {
        !self.keep_document && !self.skip_send
    }
}

/// Builder for [`PipelineConfig`].
///
/// # Example
///
/// ```rust
/// use linkpress_core::PipelineConfig;
///
/// let config = PipelineConfig::builder().count(5).timeout(30).skip_send(true).build();
/// assert_eq!(config.count, 5);
/// assert_eq!(config.fetch.timeout, 30);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.config.count = count;
        self
    }

    /// Per-request timeout in seconds.
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.config.fetch.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    pub fn output(mut self, output: impl AsRef<Path>) -> Self {
        self.config.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn keep_document(mut self, keep: bool) -> Self {
        self.config.keep_document = keep;
        self
    }

    pub fn skip_send(mut self, skip: bool) -> Self {
        self.config.skip_send = skip;
        self
    }

    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.config.dispatch = Some(dispatch);
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
