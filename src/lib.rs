//! # Fibonacci Sum Library
//!
//! This library computes the sum of the first `n` Fibonacci numbers using
//! arbitrary-precision integers, splitting the index range into segments that
//! are summed concurrently by a fixed pool of workers. Partial sums flow back
//! through a bounded channel and are combined into one deterministic total:
//! the same `(n, workers)` input produces the same result for every worker
//! count.
//!
//! ## Key Pieces
//! - **Segment Planner**: divides `[0, n)` into one contiguous range per
//!   worker, with the last range absorbing any remainder.
//! - **Memoization Store**: a thread-safe map from a segment boundary to the
//!   recurrence state reached there, so a worker starting at that boundary
//!   can skip iterating from zero. Concurrent writers race and the last
//!   write wins.
//! - **Segment Workers**: each advances the standard recurrence
//!   `F(k) = F(k-1) + F(k-2)` across its range and accumulates the produced
//!   terms into a partial sum.
//! - **Aggregation Pipeline**: a bounded `kanal` channel drained by the
//!   caller, closed exactly once by a closer thread after every worker has
//!   finished.
//!
//! ## Overview of Functions
//!
//! ### Errors
//! - `FibonacciSumError`: Enum representing the errors that might occur
//!   during execution, such as Tokio or standard join errors and send errors
//!   in threaded communication.
//!
//! ### Summation Drivers
//!
//! #### `sum_basic`
//! Sums the first `n` Fibonacci numbers with a plain sequential pass. This is
//! the O(n) reference the concurrent drivers are checked against.
//!
//! #### `sum_segmented`
//! The primary driver: one `std::thread` per segment, partial sums sent over
//! a bounded `kanal` channel, a closer thread gating the channel close behind
//! the last worker.
//!
//! #### `sum_segmented_rayon`
//! Data-parallel version of `sum_segmented`, computing the per-segment sums
//! on the Rayon pool and reducing them by addition.
//!
//! #### `sum_segmented_tokio`
//! Asynchronous version using Tokio: one task per segment, the same bounded
//! channel carrying the partial sums back.
//!
//! ## Usage Example
//! ```rust
//! use fibonacci_sum::fibonacci::sum_segmented;
//! use num_bigint::BigUint;
//! let sum = sum_segmented(10, 4).unwrap();
//! assert_eq!(sum, BigUint::from(143u32));
//! ```

pub mod fibonacci;
pub mod memo;
pub mod segment;
