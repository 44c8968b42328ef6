//! CLI command implementations

pub mod config;
pub mod init;
pub mod inject;
pub mod manifest;
pub mod routes;

pub use config::execute as config;
pub use init::execute as init;
pub use inject::execute as inject;
pub use manifest::execute as manifest;
pub use routes::execute as routes;
