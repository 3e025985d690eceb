//! Command registry: declared commands plus their handlers.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::builder::CommandBuilder;
use super::context::CommandContext;

/// Namespace used when none is configured.
pub const DEFAULT_PREFIX: &str = "ccm";

/// User handler bound to a command with [`CommandRegistry::run`].
pub type Callback = Rc<dyn Fn(&CommandContext<'_>) -> anyhow::Result<()>>;

/// Central registry for all custom commands.
///
/// Populate it during load, then hand it to [`crate::bridge::register_commands`]
/// at startup. It is never mutated afterwards.
pub struct CommandRegistry {
    prefix: String,
    /// Declared commands, in registration order.
    commands: Vec<CommandBuilder>,
    callbacks: HashMap<String, Callback>,
    installed: Cell<bool>,
}

impl CommandRegistry {
    /// Create an empty registry using the default `ccm` namespace.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create an empty registry whose host identifiers use `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: Vec::new(),
            callbacks: HashMap::new(),
            installed: Cell::new(false),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Declare a command and return its builder for chaining.
    pub fn register(&mut self, name: impl Into<String>) -> &mut CommandBuilder {
        let builder = CommandBuilder::new(name, self.prefix.clone());
        self.commands.push(builder);
        let last = self.commands.len() - 1;
        &mut self.commands[last]
    }

    /// Bind `callback` to the command declared as `name`.
    ///
    /// Only primary names are matched. Unknown names are ignored and `false`
    /// is returned; a later call for the same name replaces the handler.
    pub fn run<F>(&mut self, name: &str, callback: F) -> bool
    where
        F: Fn(&CommandContext<'_>) -> anyhow::Result<()> + 'static,
    {
        if self.get(name).is_none() {
            debug!(command = name, "ignoring handler for undeclared command");
            return false;
        }
        self.callbacks.insert(name.to_string(), Rc::new(callback));
        true
    }

    /// All declared commands, in registration order.
    pub fn commands(&self) -> &[CommandBuilder] {
        &self.commands
    }

    /// First command declared under `name`.
    pub fn get(&self, name: &str) -> Option<&CommandBuilder> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn callback(&self, name: &str) -> Option<Callback> {
        self.callbacks.get(name).cloned()
    }

    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Marks the registry as handed to the host. Returns `false` if it already was.
    pub(crate) fn mark_installed(&self) -> bool {
        !self.installed.replace(true)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandOrigin, PermissionLevel};
    use std::cell::RefCell;

    #[test]
    fn register_returns_chainable_builder() {
        let mut registry = CommandRegistry::new();
        registry
            .register("foo")
            .describe("x")
            .permission("Admin")
            .unwrap();

        let foo = registry.get("foo").unwrap();
        assert_eq!(foo.permission_level, PermissionLevel::Admin);
        assert_eq!(foo.description, "x");
        assert_eq!(foo.prefix(), "ccm");
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut registry = CommandRegistry::with_prefix("demo");
        registry.register("zeta");
        registry.register("alpha");
        registry.register("mid");

        let names: Vec<_> = registry.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.prefix(), "demo");
        assert_eq!(registry.commands()[0].prefix(), "demo");
    }

    #[test]
    fn run_ignores_undeclared_command() {
        let mut registry = CommandRegistry::new();
        registry.register("declared");

        assert!(!registry.run("unregistered", |_| Ok(())));
        assert!(!registry.has_callback("unregistered"));
        assert!(registry.run("declared", |_| Ok(())));
        assert!(registry.has_callback("declared"));
    }

    #[test]
    fn later_run_replaces_handler() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CommandRegistry::new();
        registry.register("spawn");

        let first = Rc::clone(&calls);
        assert!(registry.run("spawn", move |_| {
            first.borrow_mut().push("first");
            Ok(())
        }));
        let second = Rc::clone(&calls);
        assert!(registry.run("spawn", move |_| {
            second.borrow_mut().push("second");
            Ok(())
        }));

        let callback = registry.callback("spawn").unwrap();
        let origin = CommandOrigin::server();
        callback(&CommandContext::new(&registry, &origin, &[])).unwrap();
        assert_eq!(*calls.borrow(), vec!["second"]);
    }

    #[test]
    fn run_does_not_match_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register("kick").alias("k");

        assert!(!registry.run("k", |_| Ok(())));
        assert!(!registry.has_callback("k"));
    }

    #[test]
    fn installed_flag_flips_once() {
        let registry = CommandRegistry::new();
        assert!(registry.mark_installed());
        assert!(!registry.mark_installed());
    }
}
