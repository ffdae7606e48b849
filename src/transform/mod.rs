//! Data transformations for sequence-model training.
//!
//! Provides min-max scaling and supervised windowing.
//!
//! # Example
//!
//! ```
//! use salecast::transform::{sliding_windows, MinMaxScaler};
//!
//! let series = vec![10.0, 12.0, 9.0, 15.0, 20.0];
//!
//! let (scaler, scaled) = MinMaxScaler::fit_transform(&series).unwrap();
//! let windows = sliding_windows(&scaled, 2);
//! assert_eq!(windows.len(), 3);
//!
//! let recovered = scaler.inverse_transform(&scaled);
//! assert!((recovered[0] - 10.0).abs() < 1e-9);
//! ```

pub mod scale;
pub mod window;

pub use scale::MinMaxScaler;
pub use window::{sliding_windows, WindowedData};
