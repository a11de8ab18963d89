//! Mover module for staging files into the collection tree.
//!
//! This module provides the `Mover` trait and [`SafeMover`], which copies a
//! file into a destination directory without ever losing or overwriting data.
//!
//! # Guarantees
//!
//! - Missing destination directories are created (permissive mode)
//! - An identical file already at the destination makes the move a skip
//! - A different file at the destination diverts the copy to `<stem>_01.<ext>`
//! - Every copy is re-hashed; a mismatched copy is deleted and reported as
//!   retryable
//! - The source file is never deleted
//!
//! # Example
//!
//! ```ignore
//! use snapstage_core::mover::{Mover, MoveOutcome, SafeMover};
//!
//! let mover = SafeMover::with_defaults();
//! match mover.move_file(&src, Path::new("/tmp/picsToCopy/2021/06/15"), OsStr::new("a.jpg")).await? {
//!     MoveOutcome::Moved { destination } => println!("stored at {}", destination.display()),
//!     MoveOutcome::Skipped { .. } => println!("already there"),
//!     MoveOutcome::Failed { .. } => println!("copy did not verify, try again"),
//! }
//! ```

mod config;
mod error;
mod safe_mover;
mod traits;
mod types;

pub use config::MoverConfig;
pub use error::MoveError;
pub use safe_mover::SafeMover;
pub use traits::Mover;
pub use types::{MoveFailure, MoveOutcome, SkipReason, COLLISION_SUFFIX};
