use crate::commands::{CommandRegistry, CommandSource};
use crate::host::Vec2;

const DEFAULT_HEIGHT: f32 = 1.0;

pub fn register(registry: &mut CommandRegistry) {
    registry
        .register("launch")
        .describe("Launch yourself into the air")
        .float("height", false);

    registry.run("launch", |ctx| {
        if ctx.origin.source_type != CommandSource::Entity {
            return Ok(());
        }
        if let Some(entity) = &ctx.origin.source_entity {
            let height = ctx.float(0).unwrap_or(DEFAULT_HEIGHT);
            entity.apply_knockback(Vec2 { x: 0.0, z: 0.0 }, height);
        }
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use crate::host::Vec2;
    use crate::test_helpers::TestWorld;

    #[test]
    fn launches_the_source_entity() {
        let world = TestWorld::with_demo();

        assert!(world.player_runs("/launch").is_success());
        assert!(world.player_runs("/ccm:launch 3").is_success());
        assert!(world.player.knockbacks().is_empty());

        world.host.tick();
        assert_eq!(
            world.player.knockbacks(),
            vec![(Vec2::default(), 1.0), (Vec2::default(), 3.0)]
        );
    }

    #[test]
    fn bad_height_is_rejected_by_the_host() {
        let world = TestWorld::with_demo();

        let result = world.player_runs("/ccm:launch high");
        assert!(!result.is_success());
        assert_eq!(world.host.pending_tasks(), 0);
    }
}
