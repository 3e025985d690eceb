//! Custom command declarations.
//!
//! Commands are declared on a [`CommandRegistry`] during load and handed to
//! the host at startup by [`crate::bridge::register_commands`].
//!
//! # Architecture
//!
//! - `types`: Permission levels, parameter tags, origins, arguments and events
//! - `builder`: Fluent builder for one command
//! - `registry`: Declared commands and their handlers
//! - `context`: What a handler receives when it runs
//! - `render`: Help text generation

mod builder;
mod context;
mod registry;
mod render;
mod types;

pub use builder::{CommandBuilder, Guard};
pub use context::CommandContext;
pub use registry::{Callback, CommandRegistry, DEFAULT_PREFIX};
pub use render::{COMMANDS_PER_PAGE, clamp_page, help_line, help_page, total_pages};
pub use types::{
    CommandArg, CommandEvent, CommandOrigin, CommandParameter, CommandResult, CommandSource,
    CommandStatus, ParamType, PermissionLevel,
};
