//! In-process host: native command table, enum table, entities and tick queue.
//!
//! It plays the host's part end to end, including turning invocation text into
//! typed arguments, so registered commands can be exercised without a game.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use super::{
    CustomCommand, CustomCommandRegistry, Entity, HostError, NativeCallback, Scheduler, Task, Vec2,
    Vec3,
};
use crate::commands::{
    CommandArg, CommandOrigin, CommandParameter, CommandResult, ParamType, PermissionLevel,
};

type SharedCallback = Rc<dyn Fn(&CommandOrigin, &[CommandArg]) -> CommandResult>;

struct RegisteredCommand {
    descriptor: CustomCommand,
    callback: SharedCallback,
}

/// Reasons the host refuses invocation text before calling the command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Tokenize(String),
    #[error("missing argument <{0}>")]
    Missing(String),
    #[error("\"{value}\" is not a valid {expected} for <{param}>")]
    Invalid {
        param: String,
        value: String,
        expected: &'static str,
    },
    #[error("\"{value}\" is not one of: {}", .allowed.join(", "))]
    NotInEnum { value: String, allowed: Vec<String> },
    #[error("no targets matched selector \"{0}\"")]
    NoTargets(String),
    #[error("unexpected \"{0}\"")]
    Unexpected(String),
}

#[derive(Default)]
pub struct MemoryHost {
    commands: RefCell<Vec<RegisteredCommand>>,
    enums: RefCell<HashMap<String, Vec<String>>>,
    entities: RefCell<Vec<Rc<dyn Entity>>>,
    tasks: RefCell<VecDeque<Task>>,
    last_entity_id: Cell<u64>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The startup-phase registry handle.
    pub fn registry(&self) -> MemoryRegistry<'_> {
        MemoryRegistry { host: self }
    }

    pub fn spawn(&self, entity: Rc<dyn Entity>) {
        self.entities.borrow_mut().push(entity);
    }

    /// Create a recording entity with the next free id and add it to the world.
    pub fn spawn_entity(&self, type_id: &str, name: &str) -> Rc<MemoryEntity> {
        let id = self.last_entity_id.get() + 1;
        self.last_entity_id.set(id);
        let entity = Rc::new(MemoryEntity::new(id.to_string(), type_id, name));
        self.spawn(entity.clone());
        entity
    }

    pub fn spawn_player(&self, name: &str) -> Rc<MemoryEntity> {
        self.spawn_entity(PLAYER_TYPE, name)
    }

    /// Registered command names, in registration order.
    pub fn command_names(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(|c| c.descriptor.name.clone())
            .collect()
    }

    pub fn command(&self, name: &str) -> Option<CustomCommand> {
        self.commands
            .borrow()
            .iter()
            .find(|c| c.descriptor.name == name)
            .map(|c| c.descriptor.clone())
    }

    pub fn enum_values(&self, id: &str) -> Option<Vec<String>> {
        self.enums.borrow().get(id).cloned()
    }

    /// Call a registered command with already-coerced arguments.
    pub fn invoke_native(
        &self,
        name: &str,
        origin: &CommandOrigin,
        args: &[CommandArg],
    ) -> CommandResult {
        let callback = self
            .commands
            .borrow()
            .iter()
            .find(|c| c.descriptor.name == name)
            .map(|c| Rc::clone(&c.callback));

        match callback {
            Some(callback) => callback(origin, args),
            None => CommandResult::failure(format!("Unknown command: {name}")),
        }
    }

    /// Run a command line such as `/ccm:give @s diamond 3` on behalf of `origin`.
    ///
    /// The namespace may be omitted when only one registered command has that name.
    pub fn execute(
        &self,
        line: &str,
        origin: &CommandOrigin,
        level: PermissionLevel,
    ) -> CommandResult {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => return syntax_error(&ParseError::Tokenize(err.to_string())),
        };
        let Some((head, rest)) = tokens.split_first() else {
            return CommandResult::failure("Syntax error: empty command");
        };

        let Some(descriptor) = self.resolve(head) else {
            return CommandResult::failure(format!(
                "Unknown command: {head}. Please check that the command exists \
                 and that you have permission to use it."
            ));
        };

        if level < descriptor.permission_level {
            return CommandResult::failure(format!(
                "You need {} permission to run {}.",
                descriptor.permission_level, descriptor.name
            ));
        }

        match self.coerce(&descriptor, rest, origin) {
            Ok(args) => self.invoke_native(&descriptor.name, origin, &args),
            Err(err) => syntax_error(&err),
        }
    }

    /// Run every task queued before this call. Tasks queued meanwhile wait for the next tick.
    pub fn tick(&self) -> Vec<anyhow::Error> {
        let tasks: Vec<Task> = self.tasks.borrow_mut().drain(..).collect();
        let mut errors = Vec::new();
        for task in tasks {
            if let Err(err) = task() {
                debug!("deferred task failed: {err:#}");
                errors.push(err);
            }
        }
        errors
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    fn resolve(&self, token: &str) -> Option<CustomCommand> {
        let commands = self.commands.borrow();
        if let Some(found) = commands.iter().find(|c| c.descriptor.name == token) {
            return Some(found.descriptor.clone());
        }
        if token.contains(':') {
            return None;
        }

        let suffix = format!(":{token}");
        let mut matches = commands.iter().filter(|c| c.descriptor.name.ends_with(&suffix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only.descriptor.clone()),
            _ => None,
        }
    }

    fn coerce(
        &self,
        descriptor: &CustomCommand,
        tokens: &[String],
        origin: &CommandOrigin,
    ) -> Result<Vec<CommandArg>, ParseError> {
        let mut rest = tokens;
        let mut args = Vec::new();

        for param in &descriptor.mandatory_parameters {
            if rest.is_empty() {
                return Err(ParseError::Missing(param.name.clone()));
            }
            args.push(self.coerce_one(param, &mut rest, origin)?);
        }
        for param in &descriptor.optional_parameters {
            if rest.is_empty() {
                break;
            }
            args.push(self.coerce_one(param, &mut rest, origin)?);
        }

        match rest.first() {
            Some(extra) => Err(ParseError::Unexpected(extra.clone())),
            None => Ok(args),
        }
    }

    fn coerce_one(
        &self,
        param: &CommandParameter,
        rest: &mut &[String],
        origin: &CommandOrigin,
    ) -> Result<CommandArg, ParseError> {
        let take = token_count(param.param_type);
        let tokens: &[String] = *rest;
        if tokens.len() < take {
            return Err(ParseError::Missing(param.name.clone()));
        }
        let (used, remaining) = tokens.split_at(take);
        *rest = remaining;
        let value = &used[0];

        let invalid = |expected: &'static str| ParseError::Invalid {
            param: param.name.clone(),
            value: used.join(" "),
            expected,
        };

        let arg = match param.param_type {
            ParamType::String => CommandArg::String(value.clone()),
            ParamType::Integer => CommandArg::Int(value.parse().map_err(|_| invalid("integer"))?),
            ParamType::Float => CommandArg::Float(value.parse().map_err(|_| invalid("number"))?),
            ParamType::Boolean => match value.as_str() {
                "true" => CommandArg::Bool(true),
                "false" => CommandArg::Bool(false),
                _ => return Err(invalid("boolean")),
            },
            ParamType::PlayerSelector => CommandArg::Entities(self.select(value, origin, true)?),
            ParamType::EntitySelector => CommandArg::Entities(self.select(value, origin, false)?),
            ParamType::Location => {
                let mut coords = [0.0f32; 3];
                for (slot, token) in coords.iter_mut().zip(used) {
                    *slot = token.parse().map_err(|_| invalid("position"))?;
                }
                CommandArg::Location(Vec3 {
                    x: coords[0],
                    y: coords[1],
                    z: coords[2],
                })
            }
            ParamType::ItemType => CommandArg::ItemType(namespaced(value)),
            ParamType::BlockType => CommandArg::BlockType(namespaced(value)),
            ParamType::Enum => {
                let allowed = self.enum_values(&param.name).unwrap_or_default();
                if !allowed.iter().any(|v| v == value) {
                    return Err(ParseError::NotInEnum {
                        value: value.clone(),
                        allowed,
                    });
                }
                CommandArg::Enum(value.clone())
            }
        };
        Ok(arg)
    }

    fn select(
        &self,
        selector: &str,
        origin: &CommandOrigin,
        players_only: bool,
    ) -> Result<Vec<Rc<dyn Entity>>, ParseError> {
        let entities = self.entities.borrow();
        let eligible = |e: &&Rc<dyn Entity>| !players_only || e.is_player();

        let selected: Vec<Rc<dyn Entity>> = match selector {
            "@s" => origin.source_entity.iter().filter(eligible).cloned().collect(),
            "@a" => entities.iter().filter(|e| e.is_player()).cloned().collect(),
            "@e" => entities.iter().filter(eligible).cloned().collect(),
            "@p" => origin
                .player()
                .cloned()
                .or_else(|| entities.iter().find(|e| e.is_player()).cloned())
                .into_iter()
                .collect(),
            name => entities
                .iter()
                .filter(eligible)
                .filter(|e| e.name().eq_ignore_ascii_case(name))
                .cloned()
                .collect(),
        };

        if selected.is_empty() {
            return Err(ParseError::NoTargets(selector.to_string()));
        }
        Ok(selected)
    }
}

impl Scheduler for MemoryHost {
    fn run(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Registration handle handed out during startup.
pub struct MemoryRegistry<'a> {
    host: &'a MemoryHost,
}

impl CustomCommandRegistry for MemoryRegistry<'_> {
    /// Re-registering an id is accepted only with the same values.
    fn register_enum(&mut self, name: &str, values: &[String]) -> Result<(), HostError> {
        if values.is_empty() {
            return Err(HostError(format!("enum {name} has no values")));
        }
        let mut enums = self.host.enums.borrow_mut();
        if let Some(existing) = enums.get(name) {
            if existing.as_slice() == values {
                return Ok(());
            }
            return Err(HostError(format!(
                "enum {name} is already registered with values: {}",
                existing.join(", ")
            )));
        }
        enums.insert(name.to_string(), values.to_vec());
        Ok(())
    }

    fn register_command(
        &mut self,
        command: CustomCommand,
        callback: NativeCallback,
    ) -> Result<(), HostError> {
        let mut commands = self.host.commands.borrow_mut();
        if commands.iter().any(|c| c.descriptor.name == command.name) {
            return Err(HostError(format!("command {} is already registered", command.name)));
        }
        for param in command
            .mandatory_parameters
            .iter()
            .chain(&command.optional_parameters)
            .filter(|p| p.param_type == ParamType::Enum)
        {
            if !self.host.enums.borrow().contains_key(&param.name) {
                return Err(HostError(format!(
                    "command {} uses unknown enum {}",
                    command.name, param.name
                )));
            }
        }
        commands.push(RegisteredCommand {
            descriptor: command,
            callback: Rc::from(callback),
        });
        Ok(())
    }
}

/// Tokens a parameter consumes from the command line.
fn token_count(param_type: ParamType) -> usize {
    match param_type {
        ParamType::Location => 3,
        _ => 1,
    }
}

fn namespaced(id: &str) -> String {
    if id.contains(':') {
        id.to_string()
    } else {
        format!("minecraft:{id}")
    }
}

fn syntax_error(err: &ParseError) -> CommandResult {
    CommandResult::failure(format!("Syntax error: {err}"))
}

const PLAYER_TYPE: &str = "minecraft:player";

/// Entity that records what the host would have shown or applied to it.
#[derive(Debug)]
pub struct MemoryEntity {
    id: String,
    type_id: String,
    name: String,
    messages: RefCell<Vec<String>>,
    knockbacks: RefCell<Vec<(Vec2, f32)>>,
}

impl MemoryEntity {
    pub fn new(id: impl Into<String>, type_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_id: type_id.into(),
            name: name.into(),
            messages: RefCell::new(Vec::new()),
            knockbacks: RefCell::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Messages received since the last call.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }

    pub fn knockbacks(&self) -> Vec<(Vec2, f32)> {
        self.knockbacks.borrow().clone()
    }
}

impl Entity for MemoryEntity {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_id(&self) -> &str {
        &self.type_id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_message(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn apply_knockback(&self, horizontal: Vec2, vertical: f32) {
        self.knockbacks.borrow_mut().push((horizontal, vertical));
    }
}
