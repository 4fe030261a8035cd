//! # segform-client
//!
//! Transport layer for the Segment Config API.
//!
//! - [`Transport`]: the `do_request(method, path, body)` primitive
//! - [`HttpTransport`]: reqwest-backed implementation with bearer auth
//! - [`Paths`]: workspace-scoped resource paths
//! - [`SegmentClient`]: typed calls for tracking plans, destinations and
//!   source connections
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use segform_client::SegmentClient;
//! use segform_core::ClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_file("segform.yaml")?;
//! let client = SegmentClient::from_config(&config)?;
//!
//! for plan in client.list_tracking_plans().await?.tracking_plans {
//!     println!("{:?} {}", plan.name, plan.display_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod paths;
pub mod transport;

pub use client::{DESTINATION_UPDATE_PATHS, SegmentClient};
pub use error::{ClientError, ClientResult};
pub use paths::Paths;
pub use transport::{HttpTransport, Method, Transport};
