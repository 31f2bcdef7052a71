//! Process exit codes, following BSD sysexits.h
//!
//! Most failures inside a session are reported and the menu continues, so
//! these only apply to errors that end the process before or during a run.

/// Normal exit, also used after `--completions` and `--show-config`
pub const OK: i32 = 0;

/// A menu selection that could not be parsed escaped the session
pub const USAGE: i32 = 64;

/// Catalog content rejected: domain rule violation or non-UTF-8 source
pub const DATAERR: i32 = 65;

/// Catalog source missing or unreadable at start-up (`LOOKUP` argument)
pub const NOINPUT: i32 = 66;

/// Unexpected failure of a catalog operation
pub const SOFTWARE: i32 = 70;

/// Terminal I/O failed
pub const IOERR: i32 = 74;

/// Invalid or missing configuration, including a bad `id_pattern`
pub const CONFIG: i32 = 78;
