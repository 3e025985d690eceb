//! Example commands shipped with the console demo.

mod help;
mod launch;

use crate::commands::CommandRegistry;

/// Declare the example commands and bind their handlers.
pub fn register(registry: &mut CommandRegistry) {
    help::register(registry);
    launch::register(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_and_binds_every_example() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);

        for name in ["help", "launch"] {
            assert!(registry.get(name).is_some(), "{name} not declared");
            assert!(registry.has_callback(name), "{name} not bound");
        }
    }
}
