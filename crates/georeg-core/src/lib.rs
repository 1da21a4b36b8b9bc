pub mod artifact;
pub mod export;
pub mod ingest;
pub mod region;
pub mod route;
pub mod session;
pub mod tabular;
pub mod verdict;

pub use artifact::FeatureArtifact;
pub use region::RegionConstraint;
pub use route::{BatchPlan, Mode, SinglePlan};
pub use verdict::{BatchOutcome, BatchRow, GeoDecision, LawRef, Provenance, Verdict};
