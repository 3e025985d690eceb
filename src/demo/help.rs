use crate::commands::{CommandRegistry, help_page};

pub fn register(registry: &mut CommandRegistry) {
    registry
        .register("help")
        .describe("List available commands")
        .alias("?")
        .int("page", false);

    registry.run("help", |ctx| {
        let Some(player) = ctx.origin.player() else {
            return Ok(());
        };
        let page = ctx.int(0).unwrap_or(1);
        for line in help_page(ctx.registry.commands(), page) {
            player.send_message(&line);
        }
        Ok(())
    });
}
