//! Child viewports: small hardware-sized bitmaps presenting a moving window into a mega parent.
//!
//! The planner decides where in the parent the child pulls from and which rectangles need to be
//! re-rendered; the engine executes the plan with ordinary stretch blits.

pub(crate) mod params;
pub(crate) mod planner;

pub use params::{ChildParams, ChildReport, ConsumerKind};
pub use planner::{ChildPlan, ChildState, ChildViewport};
