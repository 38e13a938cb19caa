//! # dacviz-tui
//!
//! Interactive step-through of the recursive multiplications, built on
//! ratatui with Elm architecture.

pub mod bridge;
pub mod computation;
pub mod footer;
pub mod header;
pub mod keymap;
pub mod logs;
pub mod matrices;
pub mod messages;
pub mod model;
pub mod styles;

pub use bridge::TuiBridgeObserver;
pub use logs::LogScrollState;
pub use messages::TuiMessage;
pub use model::TuiApp;
