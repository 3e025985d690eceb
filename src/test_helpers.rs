use std::rc::Rc;

use crate::bridge::register_commands;
use crate::commands::{CommandOrigin, CommandRegistry, CommandResult, PermissionLevel};
use crate::dispatch::DispatchBus;
use crate::host::memory::{MemoryEntity, MemoryHost};
use crate::host::{Entity, Scheduler};

/// A started host with one player, ready to run commands.
pub struct TestWorld {
    pub host: Rc<MemoryHost>,
    pub bus: Rc<DispatchBus>,
    pub player: Rc<MemoryEntity>,
}

impl TestWorld {
    pub fn start(registry: CommandRegistry) -> Self {
        let host = Rc::new(MemoryHost::new());
        let scheduler: Rc<dyn Scheduler> = host.clone();
        let bus = register_commands(Rc::new(registry), &mut host.registry(), scheduler)
            .expect("registration should succeed");

        let player = host.spawn_player("Steve");

        Self { host, bus, player }
    }

    pub fn with_demo() -> Self {
        let mut registry = CommandRegistry::new();
        crate::demo::register(&mut registry);
        Self::start(registry)
    }

    pub fn player_origin(&self) -> CommandOrigin {
        let entity: Rc<dyn Entity> = self.player.clone();
        CommandOrigin::entity(entity)
    }

    pub fn player_runs(&self, line: &str) -> CommandResult {
        self.host
            .execute(line, &self.player_origin(), PermissionLevel::Any)
    }

    pub fn server_runs(&self, line: &str) -> CommandResult {
        self.host
            .execute(line, &CommandOrigin::server(), PermissionLevel::Owner)
    }
}
