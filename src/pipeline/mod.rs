pub mod aggregator;
pub mod document;
pub mod output_writer;

pub use aggregator::{aggregate, AggregationProgress, Aggregator, LineBuffer};
pub use document::DocumentPreset;
pub use output_writer::{ArtifactPaths, OutputWriter};
