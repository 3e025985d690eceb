pub mod bridge;
pub mod commands;
pub mod config;
pub mod demo;
pub mod dispatch;
pub mod emitter;
pub mod error;
pub mod host;

pub use bridge::{DENIED_MESSAGE, register_commands};
pub use commands::{CommandBuilder, CommandContext, CommandRegistry, PermissionLevel};
pub use dispatch::DispatchBus;
pub use error::CommandError;

#[cfg(test)]
pub mod test_helpers;
