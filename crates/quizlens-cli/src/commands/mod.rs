pub mod files;
pub mod filters;
pub mod init;
pub mod report;
