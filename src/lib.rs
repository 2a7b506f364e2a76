extern crate trust_dns_resolver;

mod columns;
mod config;
mod data;
mod error;
mod identifier;
mod input;
mod output;
mod process;
mod progress;
mod resolver;

pub use crate::columns::{output_header, DERIVED_COLUMNS};
pub use crate::config::{Config, OutputFormat};
pub use crate::data::{Answer, RecordSet, ResolutionResult};
pub use crate::error::{LookupError, RoundtripError};
pub use crate::identifier::{normalize_name, Identifier};
pub use crate::input::Input;
pub use crate::output::{destination, write_discards, write_table};
pub use crate::process::{Processor, Report};
pub use crate::progress::{Progress, ProgressBar, Silent};
pub use crate::resolver::{Lookup, Resolver, StaticLookup, SystemLookup};
pub type Result<T> = std::result::Result<T, RoundtripError>;
