//! Progressive layout coordination.
//!
//! Dimensions of gallery images become known one by one, in any order, and
//! some never do. This module decides when a layout is good enough to show,
//! re-emits it as more dimensions arrive and bounds the whole process with a
//! batch timeout and a hard timeout.
//!
//! # Submodules
//!
//! - [`state`] - The synchronous [`LayoutCoordinator`] state machine
//! - [`resolver`] - Collaborator traits: [`DimensionResolver`] and [`OrderingSource`]
//! - [`runtime`] - The tokio driver executing coordinator commands

pub mod resolver;
pub mod runtime;
pub mod state;

pub use resolver::{
    DimensionFuture, DimensionResolver, LocalOrderingSource, OrderingSource, Resolution,
    StaticOrderingSource, TableResolver,
};
pub use runtime::{CoordinatorHandle, CoordinatorRuntime};
pub use state::{Command, Event, LayoutCoordinator, LayoutEmission, LoadTicket, Phase, Timer};
