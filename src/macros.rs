//! Internal logging shims.
//!
//! With the `tracing` feature enabled these forward to `tracing`; otherwise they
//! expand to nothing and their arguments are never evaluated.

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::trace!($($arg)*);
        }
    };
}

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            ::tracing::debug!($($arg)*);
        }
    };
}

pub(crate) use {debug_event, trace_event};
