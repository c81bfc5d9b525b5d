use kanal::{bounded, SendError};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::sync::Arc;
use std::thread;
use tokio::task::{self, JoinError, JoinHandle};
use tracing::{debug, trace};

use crate::memo::{MemoStore, RecurrenceState};
use crate::segment::{self, Segment};

// Walks the recurrence up from F(0) = 0, F(1) = 1 to reach (F(k), F(k+1)).
fn recurrence_state(k: usize) -> RecurrenceState {
    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    for _ in 0..k {
        let next = &a + &b;
        a = b;
        b = next;
    }
    (a, b)
}

/// Sums the Fibonacci terms produced over one segment.
///
/// The recurrence state for `segment.start` is taken from `memo` when a
/// previously finished segment ended exactly there; otherwise it is rebuilt
/// by iterating from zero. The state reached at `segment.end` is stored back
/// so a worker starting there later can pick it up. Each call performs
/// exactly one store, even for an empty segment.
pub fn segment_sum(segment: Segment, memo: &MemoStore) -> BigUint {
    let (mut a, mut b) = match memo.load(segment.start) {
        Some(state) => state,
        None => recurrence_state(segment.start),
    };

    let mut partial = BigUint::zero();
    for _ in segment.start..segment.end {
        let next = &a + &b;
        a = b;
        b = next;
        partial += &a;
    }

    memo.store(segment.end, (a, b));
    trace!(start = segment.start, end = segment.end, "segment summed");

    partial
}

/// Sums the first `n` Fibonacci numbers with a single sequential pass.
///
/// Advances the recurrence once per term and accumulates each produced value,
/// so the result is `F(1) + F(2) + … + F(n)`. Runs in O(n) additions and
/// O(1) space beyond the growing integers. The concurrent drivers are checked
/// against this function in the tests.
///
/// # Example
/// ```
/// use fibonacci_sum::fibonacci;
/// use num_bigint::BigUint;
/// let sum = fibonacci::sum_basic(10);
/// assert_eq!(sum, BigUint::from(143u32));
/// ```
pub fn sum_basic(n: usize) -> BigUint {
    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    let mut sum = BigUint::zero();
    for _ in 0..n {
        let next = &a + &b;
        a = b;
        b = next;
        sum += &a;
    }
    sum
}

#[derive(Debug, thiserror::Error)]
pub enum FibonacciSumError {
    #[error("Tokio Join error: {0:?}")]
    TokioJoin(#[from] JoinError),
    #[error("Std Join error: {0:?}")]
    StdJoin(String),
    #[error("Send error: {0:?}")]
    Send(#[from] SendError),
}

/// Sums the first `n` Fibonacci numbers across `workers` threads.
///
/// The index range is split into one segment per worker. Each worker sums its
/// segment independently, sends the partial sum over a bounded channel, and
/// exits. A dedicated closer thread holds the last sender until every worker
/// has been joined, so the channel closes exactly once, strictly after the
/// final send has returned. The calling thread drains the channel until it
/// closes, adding partial sums in arrival order; addition is commutative, so
/// the result does not depend on which worker finishes first.
///
/// The result is identical for every valid worker count.
pub fn sum_segmented(n: usize, workers: usize) -> Result<BigUint, FibonacciSumError> {
    let segments = segment::plan(n, workers);
    let memo = Arc::new(MemoStore::new());
    debug!(n, workers, "computing segmented fibonacci sum");

    // Room for every partial sum, so no worker blocks on a slow drain.
    let (sender, receiver) = bounded::<BigUint>(workers * 2);

    let mut handles = Vec::with_capacity(segments.len());
    for seg in segments {
        let sender = sender.clone();
        let memo = Arc::clone(&memo);
        let handle = thread::spawn(move || -> Result<(), FibonacciSumError> {
            let partial = segment_sum(seg, &memo);
            sender.send(partial)?;
            Ok(())
        });
        handles.push(handle);
    }

    // The closer owns the original sender: once every worker is joined the
    // workers' clones are gone, and releasing this one closes the channel.
    let closer = thread::spawn(move || -> Result<(), FibonacciSumError> {
        for handle in handles {
            handle
                .join()
                .map_err(|e| FibonacciSumError::StdJoin(format!("Worker panicked: {:?}", e)))??;
        }
        drop(sender);
        Ok(())
    });

    let mut total = BigUint::zero();
    for partial in receiver {
        total += partial;
    }

    closer
        .join()
        .map_err(|e| FibonacciSumError::StdJoin(format!("Closer panicked: {:?}", e)))??;

    Ok(total)
}

/// Rayon version of [`sum_segmented`]: per-segment sums are computed on the
/// rayon pool and reduced by addition.
pub fn sum_segmented_rayon(n: usize, workers: usize) -> BigUint {
    let memo = MemoStore::new();

    segment::plan(n, workers)
        .into_par_iter()
        .map(|seg| segment_sum(seg, &memo))
        .reduce(|| BigUint::zero(), |acc, partial| acc + partial)
}

/// Tokio version of [`sum_segmented`]: one task per segment, partial sums
/// travel over the same bounded channel and are drained once every task has
/// been awaited.
pub async fn sum_segmented_tokio(
    n: usize,
    workers: usize,
) -> Result<BigUint, FibonacciSumError> {
    let segments = segment::plan(n, workers);
    let memo = Arc::new(MemoStore::new());
    debug!(n, workers, "computing segmented fibonacci sum on tokio");

    let (sender, receiver) = bounded::<BigUint>(workers * 2);

    let mut tasks = vec![];
    for seg in segments {
        let sender = sender.clone();
        let memo = Arc::clone(&memo);

        let task: JoinHandle<Result<(), FibonacciSumError>> = task::spawn(async move {
            let partial = segment_sum(seg, &memo);
            sender.send(partial)?;
            Ok(())
        });

        tasks.push(task);
    }

    // Release the original sender so only the task clones keep the channel
    // open.
    drop(sender);

    // Every send has returned once the tasks are joined; the channel is
    // closed and fully buffered by the time the drain below starts.
    for task in tasks {
        task.await??;
    }

    let mut total = BigUint::zero();
    while let Ok(partial) = receiver.recv() {
        total += partial;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_basic_small_values() {
        assert_eq!(sum_basic(0), BigUint::zero());
        assert_eq!(sum_basic(1), BigUint::one());
        assert_eq!(sum_basic(2), BigUint::from(2u32));
        // 1 + 1 + 2 + 3 + 5 + 8 + 13 + 21 + 34 + 55
        assert_eq!(sum_basic(10), BigUint::from(143u32));
        // F(22) - 1
        assert_eq!(sum_basic(20), BigUint::from(17710u32));
    }

    #[test]
    fn segment_sum_over_full_range_matches_basic() {
        let memo = MemoStore::new();
        let sum = segment_sum(Segment { start: 0, end: 25 }, &memo);
        assert_eq!(sum, sum_basic(25));
        assert_eq!(memo.load(25), Some(recurrence_state(25)));
    }

    #[test]
    fn segment_sum_seeded_from_store_matches_cold_start() {
        let cold = MemoStore::new();
        let expected = segment_sum(Segment { start: 10, end: 20 }, &cold);

        let warm = MemoStore::new();
        warm.store(10, recurrence_state(10));
        let seeded = segment_sum(Segment { start: 10, end: 20 }, &warm);

        assert_eq!(seeded, expected);
        assert_eq!(seeded, sum_basic(20) - sum_basic(10));
    }

    #[test]
    fn empty_segment_contributes_zero_and_still_stores() {
        let memo = MemoStore::new();
        let sum = segment_sum(Segment { start: 3, end: 3 }, &memo);
        assert_eq!(sum, BigUint::zero());
        assert_eq!(memo.load(3), Some(recurrence_state(3)));
    }

    #[test]
    fn segmented_matches_concrete_scenario() {
        assert_eq!(sum_segmented(10, 4).unwrap(), BigUint::from(143u32));
    }

    #[test]
    fn segmented_is_invariant_over_worker_count() {
        let expected = sum_basic(100);
        for workers in [1, 2, 3, 4, 7, 16, 64] {
            assert_eq!(sum_segmented(100, workers).unwrap(), expected);
        }
    }

    #[test]
    fn segmented_handles_fewer_terms_than_workers() {
        assert_eq!(sum_segmented(3, 8).unwrap(), BigUint::from(4u32));
        assert_eq!(sum_segmented(0, 8).unwrap(), BigUint::zero());
    }

    #[test]
    fn segmented_is_repeatable() {
        assert_eq!(sum_segmented(50, 4).unwrap(), sum_segmented(50, 4).unwrap());
    }

    #[test]
    fn rayon_driver_agrees_with_basic() {
        let expected = sum_basic(200);
        for workers in [1, 4, 32] {
            assert_eq!(sum_segmented_rayon(200, workers), expected);
        }
    }

    #[tokio::test]
    async fn tokio_driver_agrees_with_basic() {
        let expected = sum_basic(200);
        for workers in [1, 4, 32] {
            assert_eq!(sum_segmented_tokio(200, workers).await.unwrap(), expected);
        }
    }
}
