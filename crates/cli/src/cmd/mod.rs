pub mod cache;
pub mod list;
pub mod report;
pub mod scan;
