#![expect(clippy::unwrap_used, clippy::indexing_slicing)]

mod chart;
mod cleaning;
