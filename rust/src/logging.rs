//! Logging macros for the CPM engine with verbosity level control.
//!
//! Provides zero-cost logging when disabled (verbosity=0).
//! Levels:
//! - 0: SILENT (nothing)
//! - 1: PHASES (graph size, total time, critical path)
//! - 2: TASKS (per-task timings and reserves)
//! - 3: DEBUG (topological order, late-finish tightening)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PHASES: u8 = 1;
pub const VERBOSITY_TASKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at PHASES level (verbosity >= 1).
///
/// Used for: one line per pass, project duration, critical path.
#[macro_export]
macro_rules! log_phases {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PHASES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at TASKS level (verbosity >= 2).
///
/// Used for: computed timings of individual tasks.
#[macro_export]
macro_rules! log_tasks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TASKS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
