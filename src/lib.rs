pub mod client;
pub mod collectors;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod presenters;
pub mod shell;

pub use client::{ReviewClient, ReviewService};
pub use collectors::{CodeEditor, ProjectUploader};
pub use config::Config;
pub use error::GateError;
pub use gate::{GateOutcome, GatePolicy};
pub use models::*;
pub use shell::Route;
