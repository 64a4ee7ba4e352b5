//! Execution driver for the concurrency demo.
//!
//! Fans a fixed list of queries out as blocking search jobs, either one at a
//! time or across a bounded pool of [`POOL_WIDTH`] cooperative tasks, and
//! measures wall-clock elapsed time. Result rows are fetched and discarded;
//! only completion matters here.


use std::time::{Duration, Instant};

use clap::ValueEnum;
use futures_util::StreamExt;
use futures_util::stream;
use tracing::debug;

use crate::client::{ExecMode, Service};
use crate::error::{AppError, AppResult, ValidationError};

/// Pool width for [`RunMode::Pooled`].
pub const POOL_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// One query at a time, in input order.
    #[value(name = "sync")]
    Serial,
    /// Up to [`POOL_WIDTH`] queries in flight at once.
    #[value(name = "async")]
    Pooled,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub completed: usize,
    pub elapsed: Duration,
}

/// Runs every query as a blocking search job and reports how long the whole
/// batch took. A single failing query aborts the run in either mode.
///
/// # Errors
///
/// Returns an error when the query list is empty or any query fails.
pub async fn run_queries(
    service: &Service,
    queries: &[String],
    mode: RunMode,
) -> AppResult<RunOutcome> {
    if queries.is_empty() {
        return Err(AppError::validation(ValidationError::NoQueries));
    }

    let started = Instant::now();
    let completed = match mode {
        RunMode::Serial => run_serial(service, queries).await?,
        RunMode::Pooled => run_pooled(service, queries).await?,
    };

    Ok(RunOutcome {
        completed,
        elapsed: started.elapsed(),
    })
}

/// Create the job, wait for completion, fetch and discard the results.
async fn do_search(service: &Service, query: &str) -> AppResult<()> {
    let job = service.create_job(query, ExecMode::Blocking).await?;
    let results = job.results().await?;
    debug!(sid = %job.sid(), rows = results.len(), "query completed");
    Ok(())
}

async fn run_serial(service: &Service, queries: &[String]) -> AppResult<usize> {
    let mut completed = 0usize;
    for query in queries {
        do_search(service, query).await?;
        completed += 1;
    }
    Ok(completed)
}

async fn run_pooled(service: &Service, queries: &[String]) -> AppResult<usize> {
    // buffer_unordered keeps at most POOL_WIDTH searches in flight and
    // starts the next one only when a slot frees.
    let mut in_flight = stream::iter(queries.iter().map(|query| do_search(service, query)))
        .buffer_unordered(POOL_WIDTH);

    let mut completed = 0usize;
    while let Some(outcome) = in_flight.next().await {
        outcome?;
        completed += 1;
    }
    Ok(completed)
}
