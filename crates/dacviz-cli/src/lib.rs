//! # dacviz-cli
//!
//! Plain-text front end: matrix rendering, step presenter, autoplay driver,
//! algorithm comparison and shell completion.

pub mod autoplay;
pub mod compare;
pub mod completion;
pub mod error;
pub mod output;
pub mod presenter;
pub mod render;
pub mod ui;

pub use autoplay::{autoplay, AutoplayPolicy, AutoplayReport};
pub use compare::{compare, ComparisonRow};
pub use error::CliError;
pub use presenter::{CliPresenter, DemoPresenter};
