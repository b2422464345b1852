pub mod body;
pub mod compile;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod fetch;
pub mod metadata;
pub mod parse;
pub mod postprocess;
pub mod preprocess;
pub mod record;
pub mod scoring;
#[cfg(feature = "fetch")]
pub mod source;
pub mod strategy;
pub mod text;

pub use body::{BodyShape, render_body};
pub use compile::{ArticleEntry, Compiler, DocumentMeta, compile};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use dispatch::{DispatchConfig, Dispatcher, SpoolDispatcher};
#[cfg(feature = "smtp")]
pub use dispatch::{Security, SmtpDispatcher};
pub use error::{LinkpressError, Result};
#[doc(hidden)]
pub use extract::{Region, RegionConfig, locate_region};
pub use extractor::{Extractor, extract};
#[cfg(feature = "fetch")]
pub use extractor::extract_content;
pub use fetch::{FetchConfig, fetch_file};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use metadata::Metadata;
pub use parse::{Document, Element};
#[doc(hidden)]
pub use postprocess::{PostProcessConfig, render_fragment};
#[doc(hidden)]
pub use preprocess::{PreprocessConfig, preprocess_html};
pub use record::ContentRecord;
#[doc(hidden)]
pub use scoring::{
    ScoreConfig, ScoreResult, base_tag_score, calculate_score, class_id_weight, content_density_score, link_density,
};
#[cfg(feature = "fetch")]
pub use source::{AlgoliaLister, Candidate, SourceLister};
pub use strategy::{ExtractionStrategy, HeuristicStrategy, StructuredStrategy};
