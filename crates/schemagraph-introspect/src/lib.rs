//! Statistics gateways and the inference pass that drives the classifiers.

pub mod adapter;
pub mod config;
pub mod engine;
pub mod options;
pub mod postgres;

pub use adapter::StatisticsGateway;
pub use config::{ConnectionConfig, ENV_PREFIX, RedactedConnection};
pub use engine::{InferenceReport, infer};
pub use options::InferOptions;
pub use postgres::PostgresGateway;
