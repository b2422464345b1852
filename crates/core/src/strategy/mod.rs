//! Extraction strategies and the capability interface they share.
//!
//! A strategy looks at a page and either produces a successful
//! [`ContentRecord`] or reports that it found nothing. The extractor tries
//! them in a fixed order and stops at the first success.

mod heuristic;
mod structured;

pub use heuristic::{HeuristicConfig, HeuristicStrategy};
pub use structured::{StructuredConfig, StructuredStrategy};

use crate::{ContentRecord, Result};

/// One way of turning markup into a content record.
///
/// `Ok(None)` means the strategy ran but found nothing worth keeping; `Err`
/// means it broke. The extractor treats both the same way and moves on.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn attempt(&self, url: &str, markup: &str) -> Result<Option<ContentRecord>>;
}

/// The standard chain: structured extraction first, the text heuristic second.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![Box::new(StructuredStrategy::default()), Box::new(HeuristicStrategy::default())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let names: Vec<&str> = default_strategies().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["structured", "heuristic"]);
    }
}
