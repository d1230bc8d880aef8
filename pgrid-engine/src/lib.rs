//! # PGRID Grid Engine
//!
//! Headless dynamic grid engine: holds an ordered item collection, collects
//! filter control state, resolves the matching item subset through a catalog
//! service, and lays the visible items out on a responsive column grid.
//!
//! The engine is driven through a [`GridHandle`]: filter interactions and
//! size notifications go in as commands, grid snapshots and [`GridEvent`]s
//! come out. A rendering front-end consumes the snapshot; nothing in here
//! touches a display.

pub mod breakpoints;
pub mod config;
pub mod events;
pub mod filter;
pub mod grid;
pub mod layout;
pub mod resolver;
pub mod session;

pub use breakpoints::{resolve_columns, Breakpoint, DEFAULT_BREAKPOINTS, FALLBACK_COLS};
pub use config::GridConfig;
pub use events::{EventBus, GridEvent};
pub use filter::{FilterGroup, FilterPanel};
pub use grid::{GridSnapshot, GridState};
pub use layout::{compute_layout, GridLayout, ItemPlacement};
pub use resolver::{FilterResolver, HttpResolver, ResolverError};
pub use session::{GridHandle, GridSession};
