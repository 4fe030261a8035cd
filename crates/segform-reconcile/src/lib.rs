//! # segform-reconcile
//!
//! Lifecycle reconciliation for Segment tracking plans, destinations and
//! source connections.
//!
//! Each entity type has a [`Reconciler`] implementing create, read, update,
//! delete and import against a [`SegmentClient`](segform_client::SegmentClient)
//! handle passed to every call. The [`plan`] module decides which of those
//! operations a desired record needs.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use segform_client::SegmentClient;
//! use segform_core::ClientConfig;
//! use segform_reconcile::{
//!     Change, Reconciler, TrackingPlanReconciler, TrackingPlanRecord, apply, plan_tracking_plan,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SegmentClient::from_config(&ClientConfig::from_file("segform.yaml")?)?;
//! let reconciler = TrackingPlanReconciler;
//!
//! let observed = reconciler.import(&client, "rs_1a2b").await?;
//! let desired = TrackingPlanRecord::new("Checkout", r#"{"events":[{"name":"Order Completed"}]}"#);
//!
//! let change = plan_tracking_plan(Some(&observed), &desired)?;
//! if change != Change::None {
//!     apply(&reconciler, &client, change, Some(observed), desired).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod destination;
pub mod error;
pub mod identity;
pub mod plan;
pub mod reconciler;
pub mod source_connection;
pub mod tracking_plan;

pub use codec::{CodecError, ConfigEntry, ConfigSet, canonicalize};
pub use destination::{DestinationReconciler, DestinationRecord};
pub use error::{ErrorKind, Operation, ReconcileError, ReconcileResult};
pub use identity::{IdentifierMap, derive_identifier, resolve_identifier_map};
pub use plan::{Change, apply, plan_destination, plan_source_connection, plan_tracking_plan};
pub use reconciler::{EntityRecord, Reconciler};
pub use source_connection::{SourceConnectionReconciler, SourceConnectionRecord};
pub use tracking_plan::{TRACKING_PLAN_UPDATE_PATHS, TrackingPlanReconciler, TrackingPlanRecord};
