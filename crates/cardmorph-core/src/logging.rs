#![forbid(unsafe_code)]

//! Logging shims.
//!
//! With the `tracing` feature the `tracing` macros are re-exported here so
//! downstream crates can log through `cardmorph_core::logging::*` without a
//! direct dependency. Without the feature the same names expand to nothing,
//! so call sites never need their own `cfg` gates.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __cardmorph_log_noop {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
pub use crate::__cardmorph_log_noop as debug;
#[cfg(not(feature = "tracing"))]
pub use crate::__cardmorph_log_noop as error;
#[cfg(not(feature = "tracing"))]
pub use crate::__cardmorph_log_noop as info;
#[cfg(not(feature = "tracing"))]
pub use crate::__cardmorph_log_noop as trace;
#[cfg(not(feature = "tracing"))]
pub use crate::__cardmorph_log_noop as warn;

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_structured_fields() {
        let phase = "lifted";
        super::debug!(phase, index = 1, "phase advanced");
        super::trace!("plain message");
    }
}
