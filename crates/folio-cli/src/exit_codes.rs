//! Process exit codes for the `folio` binary.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIG_ERROR: i32 = 2; // Invalid flags/config, or setup failed
