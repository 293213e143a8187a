// src/crawl/batch.rs
// =============================================================================
// Runs indexed units of work in fixed-size concurrent batches.
//
// How it works:
// 1. Split the indices 0..len into consecutive chunks of batch_size
// 2. Spawn one tokio task per index in the chunk
// 3. Wait for every task in the chunk before starting the next chunk
// 4. Store each task's result in the slot for its index
//
// The returned Vec is always ordered by index, never by which task finished
// first. Every slot gets a Result: a unit that fails, times out or panics
// leaves an error in its slot instead of disappearing.
//
// Rust concepts:
// - Generics with trait bounds: the worker can return any Send type
// - tokio::spawn: runs each unit as its own task
// - tokio::time::timeout: caps how long one unit may take
// =============================================================================

use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::error::CrawlError;

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    batch_size: usize,
    unit_timeout: Duration,
}

impl BatchScheduler {
    // A batch size of 0 would never make progress, so it's raised to 1
    pub fn new(batch_size: usize, unit_timeout: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            unit_timeout,
        }
    }

    // Runs worker(0), worker(1), ... worker(len - 1) in batches
    //
    // Parameters:
    //   len: number of units (indices 0..len)
    //   worker: builds the future for one index
    //
    // Returns: Vec of length `len` where element i is unit i's outcome
    pub async fn run<T, F, Fut>(&self, len: usize, worker: F) -> Vec<Result<T, CrawlError>>
    where
        F: Fn(usize) -> Fut,
        Fut: Future<Output = Result<T, CrawlError>> + Send + 'static,
        T: Send + 'static,
    {
        // One slot per index, filled in as each batch finishes
        let mut slots: Vec<Option<Result<T, CrawlError>>> =
            std::iter::repeat_with(|| None).take(len).collect();
        let indices: Vec<usize> = (0..len).collect();

        for (batch, chunk) in indices.chunks(self.batch_size).enumerate() {
            debug!(batch, first = chunk[0], size = chunk.len(), "starting batch");

            let handles: Vec<_> = chunk
                .iter()
                .map(|&index| tokio::spawn(tokio::time::timeout(self.unit_timeout, worker(index))))
                .collect();

            // Barrier: nothing from the next chunk starts until all of these finish
            let finished = join_all(handles).await;

            for (&index, joined) in chunk.iter().zip(finished) {
                let outcome = match joined {
                    Ok(Ok(result)) => result,
                    Ok(Err(_elapsed)) => Err(CrawlError::UnitTimeout {
                        index,
                        timeout: self.unit_timeout,
                    }),
                    Err(join_error) => Err(CrawlError::UnitPanicked {
                        index,
                        reason: join_error.to_string(),
                    }),
                };
                slots[index] = Some(outcome);
            }
        }

        // Every index belongs to exactly one chunk, so every slot is filled
        debug_assert!(slots.iter().all(Option::is_some));
        slots.into_iter().flatten().collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does .chunks(n) do?
//    - Splits a slice into pieces of at most n elements
//    - [0..45].chunks(20) gives [0..20], [20..40], [40..45]
//
// 2. Why wrap each unit in tokio::time::timeout?
//    - A stuck network request would otherwise hold the whole batch
//    - timeout returns Err(Elapsed) and drops the unit's future
//
// 3. What is a JoinError?
//    - Awaiting a spawned task's handle gives Err(JoinError) if the task
//      panicked (or was cancelled)
//    - The panic stays inside that task; we record it for that index
//
// 4. Why Option in the slots?
//    - Vec needs a value in every position before the results exist
//    - None means "not finished yet"; flatten() unwraps the Somes at the end
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn scheduler(batch_size: usize) -> BatchScheduler {
        BatchScheduler::new(batch_size, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_batches_are_separated_by_barriers() {
        let completed = Arc::new(AtomicUsize::new(0));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let seen_at_start = Arc::new(Mutex::new(vec![0usize; 45]));

        let results = scheduler(20)
            .run(45, |index| {
                let completed = completed.clone();
                let in_flight = in_flight.clone();
                let max_in_flight = max_in_flight.clone();
                let seen_at_start = seen_at_start.clone();
                async move {
                    seen_at_start.lock().unwrap()[index] = completed.load(Ordering::SeqCst);
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);

                    tokio::time::sleep(Duration::from_millis(1 + (index % 5) as u64)).await;

                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, CrawlError>(index)
                }
            })
            .await;

        assert_eq!(results.len(), 45);
        assert!(max_in_flight.load(Ordering::SeqCst) <= 20);

        // Units 0-19, 20-39 and 40-44 form three batches of 20, 20 and 5
        let seen = seen_at_start.lock().unwrap();
        for (index, &done_before) in seen.iter().enumerate() {
            let batch_start = (index / 20) * 20;
            let batch_len = if index < 40 { 20 } else { 5 };
            assert!(done_before >= batch_start, "unit {} started before its barrier", index);
            assert!(done_before < batch_start + batch_len);
        }
    }

    #[tokio::test]
    async fn test_results_are_ordered_by_index() {
        // Later indices finish first within each batch
        let results = scheduler(20)
            .run(45, |index| async move {
                tokio::time::sleep(Duration::from_millis(((45 - index) % 11) as u64)).await;
                Ok::<_, CrawlError>(index * 10)
            })
            .await;

        for (index, result) in results.iter().enumerate() {
            assert_eq!(*result.as_ref().unwrap(), index * 10);
        }
    }

    #[tokio::test]
    async fn test_failures_stay_in_their_slot() {
        let results = scheduler(3)
            .run(6, |index| async move {
                if index % 2 == 1 {
                    Err(CrawlError::Fetch {
                        url: format!("page-{}", index),
                        reason: "HTTP 500".to_string(),
                    })
                } else {
                    Ok(index)
                }
            })
            .await;

        assert_eq!(results.len(), 6);
        for (index, result) in results.iter().enumerate() {
            assert_eq!(result.is_err(), index % 2 == 1);
        }
    }

    #[tokio::test]
    async fn test_stuck_unit_times_out() {
        let scheduler = BatchScheduler::new(4, Duration::from_millis(50));
        let results = scheduler
            .run(4, |index| async move {
                if index == 2 {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                Ok::<_, CrawlError>(index)
            })
            .await;

        assert!(matches!(
            results[2],
            Err(CrawlError::UnitTimeout { index: 2, .. })
        ));
        assert_eq!(*results[3].as_ref().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_panicking_unit_is_recorded() {
        let results = scheduler(2)
            .run(3, |index| async move {
                if index == 1 {
                    panic!("unit blew up");
                }
                Ok::<_, CrawlError>(index)
            })
            .await;

        assert!(matches!(results[1], Err(CrawlError::UnitPanicked { index: 1, .. })));
        assert!(results[0].is_ok() && results[2].is_ok());
    }

    #[tokio::test]
    async fn test_zero_units() {
        let results = scheduler(20).run(0, |index| async move { Ok::<_, CrawlError>(index) }).await;
        assert!(results.is_empty());
    }
}
