use crate::columns::output_header;
use crate::identifier::Identifier;
use crate::input::Input;
use crate::progress::Progress;
use crate::resolver::{Lookup, Resolver};
use futures::StreamExt;
use tracing::{debug, info};

/// The rows produced by a run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Header of the input table, used when writing discards.
    pub input_header: Vec<String>,
    /// Input header plus the derived column names.
    pub header: Vec<String>,
    /// Resolved rows with the derived columns appended.
    pub rows: Vec<Vec<String>>,
    /// Rows whose input value was neither an IP address nor a hostname,
    /// exactly as they were read.
    pub discards: Vec<Vec<String>>,
}

impl Report {
    /// Number of resolved rows whose round trip held.
    pub fn consistent(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.last().map(String::as_str) == Some("yes"))
            .count()
    }
}

/// Drives a [`Resolver`] over every row of an input table.
#[derive(Debug)]
pub struct Processor<L> {
    resolver: Resolver<L>,
    concurrency: usize,
}

impl<L: Lookup> Processor<L> {
    pub fn new(resolver: Resolver<L>) -> Self {
        Self {
            resolver,
            concurrency: 1,
        }
    }

    /// Builder method that sets how many rows may be resolved at once.
    /// Defaults to 1, which resolves each row fully before starting the next.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn resolver(&self) -> &Resolver<L> {
        &self.resolver
    }

    /// Classifies the value in `column` of every record and resolves the ones
    /// that look like an IP address or hostname. Each classified record
    /// yields exactly one output row, in the order it was read; lookup
    /// failures show up in the row, never as an error.
    pub async fn run<P>(&self, input: Input, column: usize, progress: &mut P) -> Report
    where
        P: Progress + ?Sized,
    {
        let (input_header, records) = input.into_parts();
        let header = output_header(&input_header);
        progress.start(records.len());

        let resolver = &self.resolver;
        // `buffered` pulls a record only when it starts resolving it, so the
        // progress report names the row in flight and output keeps input order.
        let mut outcomes = futures::stream::iter(records.into_iter().enumerate())
            .map(|(i, record)| {
                let value = record
                    .get(column)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default();
                (i + 1, value, record)
            })
            .inspect(|(position, value, _)| progress.advance(*position, value))
            .map(|(position, value, record)| async move {
                let result = match Identifier::classify(&value) {
                    Some(identifier) => Some(resolver.resolve(&identifier).await),
                    None => None,
                };
                (position, value, record, result)
            })
            .buffered(self.concurrency);

        let mut rows = Vec::new();
        let mut discards = Vec::new();
        while let Some((position, value, record, result)) = outcomes.next().await {
            match result {
                Some(result) => {
                    debug!("row {}: {} -> {:?}", position, value, result);
                    let mut row = record;
                    row.extend(result.columns());
                    rows.push(row);
                }
                None => {
                    debug!("row {}: discarding {:?}", position, value);
                    discards.push(record);
                }
            }
        }
        drop(outcomes);
        progress.finish();

        info!(
            "resolved {} rows, discarded {}",
            rows.len(),
            discards.len()
        );
        Report {
            input_header,
            header,
            rows,
            discards,
        }
    }
}
