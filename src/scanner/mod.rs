pub mod directory_scanner;
pub mod file_filter;

pub use directory_scanner::{ensure_directory, DirectoryScanner, Enumeration, FileRecord, ScanStatistics};
pub use file_filter::{extension_of, FilterSet, TraversalFilter};
