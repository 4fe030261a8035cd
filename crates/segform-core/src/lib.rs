//! # segform-core
//!
//! Types shared by every segform crate:
//!
//! - [`ids`]: the [`FullName`] / [`ShortId`] identifier pair
//! - [`model`]: request and response bodies of the Config API
//! - [`config`]: client configuration loaded from YAML

pub mod config;
pub mod error;
pub mod ids;
pub mod model;

pub use config::ClientConfig;
pub use error::ConfigError;
pub use ids::{FullName, ShortId, derive_identifier};
pub use model::{
    ConfigValue, Destination, DestinationConfig, Event, Rule, Rules, SourceConnection,
    SourceConnections, TrackingPlan, TrackingPlans, UpdateMask,
};
