//! Data transformations for precipitation series.
//!
//! # Example
//!
//! ```
//! use precip_indices::transform::rolling_sum;
//!
//! let monthly = vec![10.0, 20.0, 30.0, 40.0];
//! let sums = rolling_sum(&monthly, 3);
//! assert!(sums[1].is_nan());
//! assert_eq!(sums[3], 90.0);
//! ```

pub mod window;

pub use window::rolling_sum;
