//! Builds the channel and result-slot vectors, runs mappers and reducers on
//! a bounded `rayon` thread pool, and hands back the finalized per-interval
//! statistics once both completion barriers have released. Mapper and
//! reducer tasks are submitted in interleaved bursts to bias throughput
//! toward mappers without starving reducers, and two
//! `crossbeam_utils::sync::WaitGroup` barriers — one per mapper, one per
//! reducer — are dropped on every exit path of their task.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use crossbeam_utils::sync::WaitGroup;

use crate::channel::QuoteChannel;
use crate::config::JobConfig;
use crate::mapper::Mapper;
use crate::reducer::Reducer;
use crate::types::{IntervalStatistics, PreprocessedData};

/// Runs the mapping and reducing phases for one preprocessed job and
/// returns the finalized per-interval statistics, in ascending interval
/// order.
pub fn run(path: &str, data: &PreprocessedData, config: &JobConfig) -> Result<Vec<IntervalStatistics>> {
    let channel_count = data.intervals.len();
    let channels: Arc<Vec<QuoteChannel>> = Arc::new(
        (0..channel_count)
            .map(|_| QuoteChannel::new(config.channel_capacity))
            .collect(),
    );
    let results: Arc<Vec<Mutex<Option<IntervalStatistics>>>> =
        Arc::new((0..channel_count).map(|_| Mutex::new(None)).collect());

    let pool_size = config.worker_count.max(4);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .build()
        .context("failed to build orchestrator thread pool")?;

    let mappers_done = WaitGroup::new();
    let reducers_done = WaitGroup::new();

    pool.scope(|scope| {
        let mut mapper_tasks: Vec<_> = data
            .segments
            .iter()
            .map(|segment| {
                Mapper::new(path, *segment, data.metadata, Arc::clone(&channels))
                    .context("failed to construct mapper")
            })
            .collect::<Result<Vec<_>>>()
            .expect("mapper construction validated by preprocessor output")
            .into_iter();

        let mut reducer_tasks: Vec<_> = data
            .intervals
            .iter()
            .enumerate()
            .map(|(id, interval)| {
                Reducer::new(id, *interval, Arc::clone(&channels), Arc::clone(&results))
                    .context("failed to construct reducer")
            })
            .collect::<Result<Vec<_>>>()
            .expect("reducer ids are in range by construction")
            .into_iter();

        // Interleave bursts of mappers with a single reducer to bias
        // throughput toward mappers without starving reducers entirely.
        loop {
            let mut submitted_any = false;
            for _ in 0..config.mapper_burst {
                match mapper_tasks.next() {
                    Some(mapper) => {
                        submitted_any = true;
                        let wg = mappers_done.clone();
                        scope.spawn(move |_| mapper.run(wg));
                    }
                    None => break,
                }
            }
            if let Some(reducer) = reducer_tasks.next() {
                submitted_any = true;
                let wg = reducers_done.clone();
                scope.spawn(move |_| reducer.run(wg));
            }
            if !submitted_any {
                break;
            }
        }

        // Phase 1: wait for every mapper to finish, then post the sentinel
        // on every channel exactly once. This must happen strictly between
        // the two waits so no reducer observes it early and no mapper is
        // still able to enqueue after it.
        mappers_done.wait();
        for channel in channels.iter() {
            channel.enqueue(None);
        }

        // Phase 2: wait for every reducer to drain its sentinel and write
        // its result slot.
        reducers_done.wait();
    });

    let finalized = results
        .iter()
        .enumerate()
        .map(|(id, slot)| {
            slot.lock()
                .expect("result slot mutex poisoned")
                .take()
                .with_context(|| format!("reducer {id} did not write its result slot"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(finalized)
}
