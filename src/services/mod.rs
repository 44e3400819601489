pub mod enrichment;
pub mod features;
pub mod lookup;
pub mod merge;
pub mod providers;
pub mod ranking;
pub mod recommendations;
