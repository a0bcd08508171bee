//! Headless прогон сцены с добиванием
//!
//! Спавнит игрока и врага, скриптует commit и печатает ключевые моменты
//! lifecycle: захват цели, смерть, respawn.

use bevy::prelude::*;
use takedown_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting TAKEDOWN headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    let enemy = spawn_enemy(
        world,
        Vec3::new(0.0, 0.0, 3.0),
        RespawnArea::new((-49.0, 49.0), (-49.0, 49.0), 5.0),
    );

    // Враг уже в радиусе detection volume — цель захватится на первом тике
    run_ticks(&mut app, 1);
    println!(
        "Prompt visible: {}",
        app.world().resource::<FinishingPrompt>().visible
    );

    // Commit
    app.world_mut().resource_mut::<PlayerInput>().finish_pressed = true;

    let mut last_alive = true;
    for tick in 0..900 {
        run_ticks(&mut app, 1);

        let alive = app
            .world()
            .get::<Enemy>(enemy)
            .map(|e| e.alive)
            .unwrap_or(false);
        if alive != last_alive {
            let position = app.world().get::<Transform>(enemy).unwrap().translation;
            println!(
                "Tick {}: enemy {} at ({:.1}, {:.1}, {:.1})",
                tick,
                if alive { "respawned" } else { "died" },
                position.x,
                position.y,
                position.z
            );
            last_alive = alive;
        }
    }

    let state = app.world().get::<CombatState>(player).unwrap();
    println!("Final player state: {:?}", state);
    println!("Simulation complete!");
}
