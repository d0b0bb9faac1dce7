pub mod batch;
pub mod pipeline;
pub mod resolution;
pub mod sink;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
