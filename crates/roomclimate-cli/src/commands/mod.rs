//! Command implementations for the CLI.

mod config;
mod device;
mod predict;
mod record;
mod room;
mod stats;

pub use config::cmd_config;
pub use device::cmd_device;
pub use predict::cmd_predict;
pub use record::cmd_record;
pub use room::cmd_room;
pub use stats::cmd_stats;
