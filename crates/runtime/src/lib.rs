//! Dashboard UI state as immutable snapshots plus a pure reducer.

pub mod event_bus;
pub mod state;
pub mod store;
pub mod view;

pub use event_bus::*;
pub use state::*;
pub use store::*;
pub use view::*;
