// Domain layer: lookup models and ports. No HTTP or runtime types beyond the deadline handle.

pub mod model;
pub mod ports;
