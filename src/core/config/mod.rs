pub mod data;
pub mod defaults;
pub mod io;

pub use data::{path_display, Config, FriendConfig};
pub use io::ConfigError;

#[cfg(test)]
pub mod tests;
