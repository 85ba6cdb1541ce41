//! Shared database access
//!
//! All cinedex services share one SQLite file (`cinedex.db`) in the root
//! folder. cinedex-mi is the single writer; cinedex-dr opens the same file
//! read-only.

pub mod init;

pub use init::init_database;
