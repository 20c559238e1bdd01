pub mod category;
pub mod claim;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod fan_out;
pub mod integrity;
pub mod policy;
pub mod pricing;
pub mod rng;
pub mod sampler;
pub mod summary;
pub mod transaction;
pub mod types;
