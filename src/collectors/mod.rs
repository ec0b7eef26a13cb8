pub mod editor;
pub mod upload;

pub use editor::CodeEditor;
pub use upload::ProjectUploader;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{GateError, Result};

/// Label shown on the submit control while idle
pub const IDLE_LABEL: &str = "Run Analysis";
/// Label shown on the submit control while a request is outstanding
pub const BUSY_LABEL: &str = "Analyzing...";

/// Marks a request as outstanding until dropped
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    /// Claim the flag, failing if another request already holds it
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GateError::InFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
