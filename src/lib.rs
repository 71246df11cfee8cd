pub mod error;
pub mod config;
pub mod scanner;
pub mod parser;
pub mod extract;
pub mod index;
pub mod disambiguate;
pub mod fuzzy;
pub mod location;
pub mod repo;
pub mod complete;
pub mod render;
pub mod runner;

pub use error::{IndexError, ErrorKind, Result};
pub use config::{Config, ConfigManager, Invocation, OutputFormat};
pub use scanner::{Scanner, ScanPolicy};
pub use parser::{Target, ParseOutcome};
pub use extract::{ExtractStrategy, Extractor, DefinitionScan, RunnerListing};
pub use index::{Indexer, IndexedTarget};
pub use disambiguate::{disambiguate, Candidate, CandidateSet};
pub use fuzzy::fuzzy_match;
pub use location::{resolve, PathResolver};
pub use complete::Completer;
pub use render::TargetInfo;
pub use runner::Runner;
