//! TAKEDOWN Simulation Core
//!
//! Headless ECS-симуляция (Bevy 0.16) сцены с добиваниями: игрок захватывает
//! ближайшего живого врага, по commit-input бежит в точку за его спиной и
//! запускает finishing sequence; враг умирает в середине анимации,
//! замораживается и возрождается в случайной точке области через delay.
//!
//! Слои вне core (рендер, устройства ввода, физика, UI-виджеты) общаются
//! с ним через boundary-ресурсы и компоненты: PlayerInput, Animator,
//! WeaponSocket, FinishingPrompt, CameraRig, PhysicsBody.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod animation;
pub mod camera;
pub mod components;
pub mod detection;
pub mod enemy;
pub mod input;
pub mod logger;
pub mod player;
pub mod scheduler;
pub mod ui;

// Re-export основных типов
pub use animation::{Animator, PARAM_HORIZONTAL, PARAM_IS_FINISHING, PARAM_VERTICAL};
pub use camera::CameraRig;
pub use components::*;
pub use detection::{VolumeEntered, VolumeExited};
pub use enemy::{kill_enemy, respawn_enemy, spawn_enemy};
pub use input::PlayerInput;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use player::{spawn_player, APPROACH_EPSILON, FINISHING_CLIP_LENGTH};
pub use scheduler::{ScheduledCallback, ScheduledCallbacks, SimulationClock, SIMULATION_HZ};
pub use ui::FinishingPrompt;

/// Главный plugin симуляции
///
/// Порядок систем в тике (chain):
/// 1. advance_clock — tick counter
/// 2. fire_due_callbacks — созревшие отложенные события (death, respawn,
///    sequence-end) до per-tick логики
/// 3. detect_enemy_proximity / acquire_targets — захват цели
/// 4. player_movement / finishing_approach — движение и finishing sequence
/// 5. mirror_finishing_playback — stand-in анимационного playback
/// 6. aim_torso_at_cursor, follow_player — look-поведения
/// 7. clear_pressed — сброс edge-input
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>()
            .init_resource::<ScheduledCallbacks>()
            .init_resource::<PlayerInput>()
            .init_resource::<FinishingPrompt>()
            .init_resource::<CameraRig>();

        // Детерминистичный RNG (не перетирает заранее вставленный seed)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_event::<VolumeEntered>().add_event::<VolumeExited>();

        app.add_systems(
            FixedUpdate,
            (
                scheduler::advance_clock,
                scheduler::fire_due_callbacks,
                detection::detect_enemy_proximity,
                detection::acquire_targets,
                player::player_movement,
                player::finishing_approach,
                animation::mirror_finishing_playback,
                player::aim_torso_at_cursor,
                camera::follow_player,
                input::clear_pressed,
            )
                .chain(),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Прогоняет N тиков симуляции (FixedUpdate напрямую, без wall clock)
///
/// Тесты и headless-бинарь шагают только так — реальное время не участвует,
/// прогон детерминирован.
pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Snapshot мира для сравнения детерминизма
///
/// Собирает компонент T со всех entities в детерминированный байтовый
/// формат (сортировка по Entity ID, сериализация через Debug).
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
