//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: statement stepper state and its keyboard event loop
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   normalized output, tokens, parse trace, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Normalized`] parse result and call [`App::run`] to start the event loop.
//!
//! [`Normalized`]: crate::Normalized
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
