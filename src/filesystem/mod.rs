//! Declarative directory/file trees and the routine that writes them to disk.
//!
//! A [`TreeDescriptor`] maps names to nodes that are either directories
//! (holding further named nodes) or files (holding their contents). The
//! [`Materializer`] walks a descriptor below a base path and creates whatever
//! is missing, never touching entries that already exist.

mod fingerprint;
mod materializer;
mod report;
mod tree;

pub use fingerprint::ContentFingerprint;
pub use materializer::{MaterializeError, MaterializeMode, Materializer};
pub use report::{EntryOutcome, MaterializationReport, ReportEntry};
pub use tree::{Entries, TreeDescriptor, TreeError, TreeNode, validate_segment};
