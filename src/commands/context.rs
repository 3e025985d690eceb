//! What a command handler receives when it runs.

use std::rc::Rc;

use super::registry::CommandRegistry;
use super::types::{CommandArg, CommandOrigin};
use crate::host::{Entity, Vec3};

/// One invocation as seen by the user's handler.
///
/// Arguments are positional: mandatory parameters first, then the optional
/// ones the caller actually supplied.
pub struct CommandContext<'a> {
    pub registry: &'a CommandRegistry,
    pub origin: &'a CommandOrigin,
    pub args: &'a [CommandArg],
}

impl<'a> CommandContext<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        origin: &'a CommandOrigin,
        args: &'a [CommandArg],
    ) -> Self {
        Self {
            registry,
            origin,
            args,
        }
    }

    pub fn arg(&self, index: usize) -> Option<&CommandArg> {
        self.args.get(index)
    }

    pub fn string(&self, index: usize) -> Option<&str> {
        self.arg(index).and_then(CommandArg::as_str)
    }

    pub fn int(&self, index: usize) -> Option<i32> {
        self.arg(index).and_then(CommandArg::as_int)
    }

    pub fn float(&self, index: usize) -> Option<f32> {
        self.arg(index).and_then(CommandArg::as_float)
    }

    pub fn bool(&self, index: usize) -> Option<bool> {
        self.arg(index).and_then(CommandArg::as_bool)
    }

    pub fn entities(&self, index: usize) -> Option<&[Rc<dyn Entity>]> {
        self.arg(index).and_then(CommandArg::as_entities)
    }

    pub fn location(&self, index: usize) -> Option<Vec3> {
        self.arg(index).and_then(CommandArg::as_location)
    }
}
