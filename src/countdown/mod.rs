pub mod format;
pub mod ticker;
