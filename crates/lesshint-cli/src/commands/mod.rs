// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command implementations. Each returns the process exit status.

pub mod css;
pub mod explain;
pub mod lint;

/// Exit status: nothing to report.
pub const EXIT_OK: i32 = 0;
/// Exit status: violations, unparsable or unreadable files.
pub const EXIT_VIOLATIONS: i32 = 1;
/// Exit status: bad usage or an internal fault.
pub const EXIT_FAULT: i32 = 2;
