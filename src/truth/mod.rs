//! Hidden ground-truth population
//!
//! Villages, households, individuals with latent infection status, and the
//! lab/environment tables that drive simulated test results. Generated once
//! per seed and never mutated; the player only ever sees it through the
//! disclosure layer.

pub mod generation;
pub mod household;
pub mod individual;
pub mod infection;
pub mod samples;
pub mod village;
pub mod world;

pub use generation::generate_world;
pub use household::Household;
pub use individual::{ClinicalCourse, Exposures, Individual};
pub use samples::{EnvironmentalSite, LabSample, SiteType};
pub use village::Village;
pub use world::{shared_world, TruthWorld};
