//! Command system types.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::host::{Entity, Vec3};

/// Permission required to execute a command, lowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PermissionLevel {
    #[default]
    Any,
    GameDirectors,
    Admin,
    Host,
    Owner,
}

impl PermissionLevel {
    pub const ALL: [PermissionLevel; 5] = [
        Self::Any,
        Self::GameDirectors,
        Self::Admin,
        Self::Host,
        Self::Owner,
    ];

    /// String key accepted by [`PermissionLevel::from_str`].
    pub fn key(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::GameDirectors => "GameDirectors",
            Self::Admin => "Admin",
            Self::Host => "Host",
            Self::Owner => "Owner",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PermissionLevel {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.key() == s)
            .ok_or_else(|| CommandError::InvalidPermission(s.to_string()))
    }
}

impl TryFrom<&str> for PermissionLevel {
    type Error = CommandError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PermissionLevel {
    type Error = CommandError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PermissionLevel> for String {
    fn from(level: PermissionLevel) -> Self {
        level.key().to_string()
    }
}

/// Parameter type tags understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
    PlayerSelector,
    EntitySelector,
    Location,
    ItemType,
    BlockType,
    Enum,
}

impl ParamType {
    /// Short name shown in usage strings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Boolean => "bool",
            Self::PlayerSelector => "player",
            Self::EntitySelector => "entity",
            Self::Location => "x y z",
            Self::ItemType => "item",
            Self::BlockType => "block",
            Self::Enum => "enum",
        }
    }

    /// Parameter name used when a selector or type parameter is added without one.
    pub fn default_name(&self) -> Option<&'static str> {
        match self {
            Self::PlayerSelector => Some("player"),
            Self::EntitySelector => Some("entity"),
            Self::Location => Some("position"),
            Self::ItemType => Some("item"),
            Self::BlockType => Some("block"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParameter {
    pub name: String,
    pub param_type: ParamType,
}

impl CommandParameter {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

/// Status returned to the host from a native command callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            status: CommandStatus::Success,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

/// What kind of source triggered a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Block,
    Entity,
    NpcDialogue,
    Server,
}

/// Host-provided context describing who triggered an invocation.
#[derive(Debug, Clone)]
pub struct CommandOrigin {
    pub source_type: CommandSource,
    pub source_entity: Option<Rc<dyn Entity>>,
    pub initiator: Option<Rc<dyn Entity>>,
}

impl CommandOrigin {
    pub fn server() -> Self {
        Self {
            source_type: CommandSource::Server,
            source_entity: None,
            initiator: None,
        }
    }

    pub fn entity(entity: Rc<dyn Entity>) -> Self {
        Self {
            source_type: CommandSource::Entity,
            source_entity: Some(entity),
            initiator: None,
        }
    }

    /// The source entity, if the command was run by a player.
    pub fn player(&self) -> Option<&Rc<dyn Entity>> {
        match (self.source_type, &self.source_entity) {
            (CommandSource::Entity, Some(entity)) if entity.is_player() => Some(entity),
            _ => None,
        }
    }
}

/// A positional argument value, already coerced by the host.
#[derive(Debug, Clone)]
pub enum CommandArg {
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Entities(Vec<Rc<dyn Entity>>),
    Location(Vec3),
    ItemType(String),
    BlockType(String),
    Enum(String),
}

impl CommandArg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::ItemType(s) | Self::BlockType(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to floats, as the host does for numeric parameters.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&[Rc<dyn Entity>]> {
        match self {
            Self::Entities(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_location(&self) -> Option<Vec3> {
        match self {
            Self::Location(v) => Some(*v),
            _ => None,
        }
    }
}

/// One invocation travelling over the dispatch bus.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    /// Primary command name, even when invoked through an alias
    pub name: String,
    pub origin: CommandOrigin,
    pub args: Vec<CommandArg>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_keys_resolve() {
        for level in PermissionLevel::ALL {
            assert_eq!(level.key().parse::<PermissionLevel>().unwrap(), level);
        }
        assert_eq!(PermissionLevel::try_from("Admin").unwrap(), PermissionLevel::Admin);
    }

    #[test]
    fn unknown_permission_key_is_rejected() {
        let err = "NotALevel".parse::<PermissionLevel>().unwrap_err();
        assert!(matches!(err, CommandError::InvalidPermission(ref k) if k == "NotALevel"));
        assert_eq!(err.to_string(), "Invalid permission level: NotALevel");

        // Keys are case sensitive
        assert!("admin".parse::<PermissionLevel>().is_err());
    }

    #[test]
    fn permission_levels_are_ordered() {
        assert!(PermissionLevel::Any < PermissionLevel::GameDirectors);
        assert!(PermissionLevel::Admin < PermissionLevel::Host);
        assert!(PermissionLevel::Host < PermissionLevel::Owner);
    }

    #[test]
    fn permission_serde_uses_keys() {
        let json = serde_json::to_string(&PermissionLevel::GameDirectors).unwrap();
        assert_eq!(json, "\"GameDirectors\"");
        assert!(serde_json::from_str::<PermissionLevel>("\"Root\"").is_err());
    }

    #[test]
    fn float_accessor_widens_ints() {
        assert_eq!(CommandArg::Int(3).as_float(), Some(3.0));
        assert_eq!(CommandArg::Float(1.5).as_float(), Some(1.5));
        assert_eq!(CommandArg::Bool(true).as_float(), None);
    }

    #[test]
    fn server_origin_has_no_player() {
        assert!(CommandOrigin::server().player().is_none());
    }
}
