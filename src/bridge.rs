//! Startup bridge from the command registry to the host's native registry.

use std::rc::Rc;

use tracing::{error, info, warn};

use crate::commands::{
    CommandArg, CommandBuilder, CommandEvent, CommandOrigin, CommandRegistry, CommandResult,
};
use crate::dispatch::DispatchBus;
use crate::error::CommandError;
use crate::host::{CustomCommandRegistry, NativeCallback, Scheduler};

/// Message shown to an origin rejected by a command's guard.
pub const DENIED_MESSAGE: &str = "You do not have permission to use this command.";

/// Register every declared command, alias and enum with the host.
///
/// Must run once, during the host's startup phase. Returns the dispatch bus
/// that accepted invocations are published on.
pub fn register_commands(
    registry: Rc<CommandRegistry>,
    host: &mut dyn CustomCommandRegistry,
    scheduler: Rc<dyn Scheduler>,
) -> Result<Rc<DispatchBus>, CommandError> {
    if !registry.mark_installed() {
        return Err(CommandError::AlreadyRegistered);
    }

    let bus = Rc::new(DispatchBus::new(Rc::clone(&registry)));

    for command in registry.commands() {
        for (name, values) in command.enum_entries() {
            let id = command.enum_id(name);
            info!(%id, "Registering enum {name}");
            host.register_enum(&id, values)
                .map_err(|source| CommandError::Host { name: id, source })?;
        }

        if command.name.contains(':') {
            warn!(command = %command.name, "skipping command with a namespaced name");
            continue;
        }

        info!("Registering command {}", command.name);
        register_one(host, command, &command.name, &bus, &scheduler)?;

        for alias in &command.aliases {
            info!("Registering command alias {alias} for {}", command.name);
            register_one(host, command, alias, &bus, &scheduler)?;
        }
    }

    Ok(bus)
}

fn register_one(
    host: &mut dyn CustomCommandRegistry,
    command: &CommandBuilder,
    registered_as: &str,
    bus: &Rc<DispatchBus>,
    scheduler: &Rc<dyn Scheduler>,
) -> Result<(), CommandError> {
    let descriptor = command.to_custom_command(registered_as);
    let host_name = descriptor.name.clone();
    let callback = native_callback(command, Rc::clone(bus), Rc::clone(scheduler));
    host.register_command(descriptor, callback)
        .map_err(|source| CommandError::Host {
            name: host_name,
            source,
        })
}

/// The callback the host runs on invocation: guard check, then defer to the bus.
///
/// The returned status only says whether the invocation was accepted; the
/// handler itself runs on a later tick.
fn native_callback(
    command: &CommandBuilder,
    bus: Rc<DispatchBus>,
    scheduler: Rc<dyn Scheduler>,
) -> NativeCallback {
    let name = command.name.clone();
    let guard = command.guard().cloned();

    Box::new(move |origin: &CommandOrigin, args: &[CommandArg]| {
        if !guard.as_ref().is_none_or(|guard| guard(origin)) {
            return CommandResult::failure(DENIED_MESSAGE);
        }

        let event = CommandEvent {
            name: name.clone(),
            origin: origin.clone(),
            args: args.to_vec(),
        };
        let bus = Rc::clone(&bus);
        scheduler.run(Box::new(move || {
            bus.emit(&event).inspect_err(|err| {
                error!(command = %event.name, "command handler failed: {err:#}");
            })
        }));

        CommandResult::success()
    })
}
