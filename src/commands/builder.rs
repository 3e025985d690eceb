//! Fluent builder for a single command's metadata.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::types::{CommandOrigin, CommandParameter, ParamType, PermissionLevel};
use crate::error::CommandError;
use crate::host::CustomCommand;

/// Predicate deciding whether an origin may execute a command.
pub type Guard = Rc<dyn Fn(&CommandOrigin) -> bool>;

/// Accumulates one command's configuration before host registration.
///
/// Every method mutates in place and hands back `&mut Self`, so a command reads
/// as a single chain:
///
/// ```ignore
/// registry
///     .register("kick")
///     .describe("Kick a player")
///     .permission("Admin")?
///     .player("target", true)
///     .alias("k");
/// ```
#[derive(Clone)]
pub struct CommandBuilder {
    pub name: String,
    pub description: String,
    pub permission_level: PermissionLevel,
    pub cheats_required: bool,
    pub mandatory_parameters: Vec<CommandParameter>,
    pub optional_parameters: Vec<CommandParameter>,
    /// Allowed values keyed by the short (unprefixed) enum name
    pub enums: HashMap<String, Vec<String>>,
    /// Enum short names in declaration order, so host registration is stable
    enum_order: Vec<String>,
    pub aliases: Vec<String>,
    guard: Option<Guard>,
    prefix: String,
}

impl CommandBuilder {
    pub(crate) fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            permission_level: PermissionLevel::Any,
            cheats_required: false,
            mandatory_parameters: Vec::new(),
            optional_parameters: Vec::new(),
            enums: HashMap::new(),
            enum_order: Vec::new(),
            aliases: Vec::new(),
            guard: None,
            prefix: prefix.into(),
        }
    }

    /// Register another name for this command, sharing all of its metadata.
    pub fn alias(&mut self, value: impl Into<String>) -> &mut Self {
        self.aliases.push(value.into());
        self
    }

    pub fn describe(&mut self, text: impl Into<String>) -> &mut Self {
        self.description = text.into();
        self
    }

    /// Set the required permission from a level or one of its string keys.
    pub fn permission<P>(&mut self, level: P) -> Result<&mut Self, CommandError>
    where
        P: TryInto<PermissionLevel>,
        CommandError: From<P::Error>,
    {
        self.permission_level = level.try_into()?;
        Ok(self)
    }

    /// Whether the host should only allow the command with cheats enabled.
    pub fn cheats(&mut self, required: bool) -> &mut Self {
        self.cheats_required = required;
        self
    }

    /// Only let origins that satisfy `guard` execute the command.
    pub fn requires<F>(&mut self, guard: F) -> &mut Self
    where
        F: Fn(&CommandOrigin) -> bool + 'static,
    {
        self.guard = Some(Rc::new(guard));
        self
    }

    fn add_param(
        &mut self,
        param_type: ParamType,
        name: impl Into<String>,
        required: bool,
    ) -> &mut Self {
        let mut name: String = name.into();
        if name.is_empty() {
            name = param_type.default_name().unwrap_or_default().to_string();
        }
        let param = CommandParameter::new(name, param_type);
        if required {
            self.mandatory_parameters.push(param);
        } else {
            self.optional_parameters.push(param);
        }
        self
    }

    pub fn string(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::String, name, required)
    }

    pub fn int(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::Integer, name, required)
    }

    pub fn float(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::Float, name, required)
    }

    pub fn bool(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::Boolean, name, required)
    }

    /// Selector and type parameters given an empty name fall back to the
    /// type's default (`player`, `entity`, `position`, `item`, `block`).
    pub fn player(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::PlayerSelector, name, required)
    }

    pub fn entity(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::EntitySelector, name, required)
    }

    pub fn position(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::Location, name, required)
    }

    pub fn item(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::ItemType, name, required)
    }

    pub fn block(&mut self, name: impl Into<String>, required: bool) -> &mut Self {
        self.add_param(ParamType::BlockType, name, required)
    }

    /// Add an enum parameter with a fixed set of values.
    ///
    /// The parameter is named `<prefix>:<name>`, which is also the id the enum is
    /// registered under. Names that already carry a namespace are ignored.
    pub fn enumeration<I, S>(&mut self, name: &str, values: I, required: bool) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if name.contains(':') {
            return self;
        }
        let id = self.enum_id(name);
        self.add_param(ParamType::Enum, id, required);
        if !self.enums.contains_key(name) {
            self.enum_order.push(name.to_string());
        }
        self.enums
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Host identifier for an enum declared under `name`.
    pub fn enum_id(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }

    /// Declared enums in declaration order.
    pub fn enum_entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.enum_order
            .iter()
            .filter_map(|name| self.enums.get(name).map(|v| (name.as_str(), v.as_slice())))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn guard(&self) -> Option<&Guard> {
        self.guard.as_ref()
    }

    /// Evaluate the guard; commands without one are open to every origin.
    pub fn check(&self, origin: &CommandOrigin) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(origin))
    }

    /// Usage line such as `/ccm:tp <target: player> [pos: x y z]`.
    pub fn usage(&self) -> String {
        let mut usage = format!("/{}:{}", self.prefix, self.name);
        for param in &self.mandatory_parameters {
            usage.push_str(&format!(" <{}: {}>", param.name, param.param_type.display_name()));
        }
        for param in &self.optional_parameters {
            usage.push_str(&format!(" [{}: {}]", param.name, param.param_type.display_name()));
        }
        usage
    }

    /// Host descriptor for this command registered under `name` (the primary name or an alias).
    pub fn to_custom_command(&self, name: &str) -> CustomCommand {
        CustomCommand {
            name: format!("{}:{}", self.prefix, name),
            description: self.description.clone(),
            permission_level: self.permission_level,
            cheats_required: self.cheats_required,
            mandatory_parameters: self.mandatory_parameters.clone(),
            optional_parameters: self.optional_parameters.clone(),
        }
    }
}

impl fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("permission_level", &self.permission_level)
            .field("cheats_required", &self.cheats_required)
            .field("mandatory_parameters", &self.mandatory_parameters)
            .field("optional_parameters", &self.optional_parameters)
            .field("enums", &self.enums)
            .field("aliases", &self.aliases)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
