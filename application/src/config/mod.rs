//! Application-level configuration.
//!
//! - [`StreamParams`] — flush window control for the aggregator

pub mod stream_params;

pub use stream_params::StreamParams;
