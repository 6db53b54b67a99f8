//! CLI Commands

pub mod init;
pub mod serve;

pub use init::InitCommand;
pub use serve::ServeCommand;
