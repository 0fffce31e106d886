//! # Batch Module
//!
//! Driver che applicano il compressore a più file:
//! - `directory_walker`: albero di directory, struttura replicata in output
//! - `file_list`: lista esplicita di file verso una sola directory
//! - `path_resolver`: logica di calcolo path centralizzata

pub mod directory_walker;
pub mod file_list;
pub mod path_resolver;

pub use directory_walker::{walk, DirectoryWalk, WalkOutcome};
pub use file_list::{compress_files, FileOutcome};
pub use path_resolver::PathResolver;
