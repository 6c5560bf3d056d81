pub mod error;
pub mod orchestrator;
pub mod reconcile;
pub mod samples;
pub mod scripts;
pub mod slurm;
pub mod validate;
