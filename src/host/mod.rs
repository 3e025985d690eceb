//! Interface to the host game's scripting runtime.
//!
//! The host owns the native command registry, the entity model and the tick
//! scheduler. The rest of the crate only talks to it through the traits here.
//! [`memory::MemoryHost`] is an in-process host used by tests and the console demo.

pub mod memory;

use std::fmt;

use thiserror::Error;

use crate::commands::{CommandArg, CommandOrigin, CommandParameter, CommandResult, PermissionLevel};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A live entity owned by the host.
pub trait Entity: fmt::Debug {
    fn id(&self) -> &str;

    /// Namespaced type identifier (e.g., "minecraft:player")
    fn type_id(&self) -> &str;

    fn name(&self) -> String;

    fn is_player(&self) -> bool {
        self.type_id() == "minecraft:player"
    }

    fn send_message(&self, message: &str);

    fn apply_knockback(&self, horizontal: Vec2, vertical: f32);
}

/// Error raised by the host when it refuses a registration.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// Command descriptor in the shape the host expects.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomCommand {
    /// Fully namespaced name (`<prefix>:<name>`)
    pub name: String,
    pub description: String,
    pub permission_level: PermissionLevel,
    pub cheats_required: bool,
    pub mandatory_parameters: Vec<CommandParameter>,
    pub optional_parameters: Vec<CommandParameter>,
}

/// Called synchronously by the host for every invocation of a registered command.
pub type NativeCallback = Box<dyn Fn(&CommandOrigin, &[CommandArg]) -> CommandResult>;

/// Work deferred to a later tick.
pub type Task = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// The host's native command registry, only available during startup.
pub trait CustomCommandRegistry {
    fn register_enum(&mut self, name: &str, values: &[String]) -> Result<(), HostError>;

    fn register_command(
        &mut self,
        command: CustomCommand,
        callback: NativeCallback,
    ) -> Result<(), HostError>;
}

/// The host's "run on next tick" facility.
pub trait Scheduler {
    fn run(&self, task: Task);
}
