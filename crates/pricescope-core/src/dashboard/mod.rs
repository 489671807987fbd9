//! Dashboard orchestration
//!
//! [`DashboardController`] is a synchronous state machine: intents go in,
//! [`Fetch`] requests come out, and completed fetches are applied back as
//! [`Outcome`]s. [`DashboardRuntime`] runs it as a single tokio actor and
//! publishes a [`DashboardView`] after every change.

pub mod controller;
pub mod runtime;
pub mod view;

pub use controller::{DashboardController, Fetch, Intent, Outcome, Slot, Ticket};
pub use runtime::DashboardRuntime;
pub use view::{DashboardState, DashboardView, OverlayView, SelectionView};
