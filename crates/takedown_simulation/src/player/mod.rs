//! Player combat state machine: движение, commit, бег к цели, добивание.
//!
//! Состояния и переходы — в `CombatState` (components/player.rs). Здесь
//! per-tick системы плюс sequence-end callback. Тайминги finishing sequence
//! задаёт длина клипа: death notification в её середине, возврат управления
//! в конце. Оба callback'а не отменяемы после планирования.

use bevy::prelude::*;

use crate::animation::{
    AnimationClip, Animator, CLIP_FINISHING, PARAM_HORIZONTAL, PARAM_IS_FINISHING, PARAM_VERTICAL,
    STATE_FINISHING,
};
use crate::camera::CameraRig;
use crate::components::{
    CombatState, DetectionVolume, Enemy, FinishingTimings, MovementConfig, Player, TorsoAim,
    WeaponMesh, WeaponSocket,
};
use crate::input::PlayerInput;
use crate::logger::{log, log_info};
use crate::scheduler::{ScheduledCallbacks, SimulationClock};
use crate::ui::FinishingPrompt;

/// Порог достижения approach point (units)
pub const APPROACH_EPSILON: f32 = 0.001;

/// Длина клипа "Finishing" в дефолтной таблице аниматора (секунды)
pub const FINISHING_CLIP_LENGTH: f32 = 2.4;

/// Спавнит игрока со всеми компонентами core'а
///
/// Длина finishing-клипа читается из таблицы аниматора ровно один раз,
/// здесь — дальше работают только выведенные тайминги.
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    let animator = Animator::new(vec![AnimationClip {
        name: CLIP_FINISHING,
        length: FINISHING_CLIP_LENGTH,
    }]);
    let clip_length = animator
        .clip_length(CLIP_FINISHING)
        .unwrap_or(FINISHING_CLIP_LENGTH);

    world
        .spawn((
            Transform::from_translation(position),
            Player,
            CombatState::default(),
            MovementConfig::default(),
            FinishingTimings::from_clip_length(clip_length),
            DetectionVolume::default(),
            TorsoAim::default(),
            WeaponSocket::default(),
            animator,
        ))
        .id()
}

/// System: обычное движение + commit добивания (Moving/Targeting)
///
/// Input-оси пишутся в аниматор, поворачиваются в camera-relative
/// пространство, двигают персонажа; выше deadzone — персонаж доворачивается
/// в направлении движения. Во время finishing sequence система не работает.
///
/// Commit: prompt видим + нажат commit + цель есть → прячем prompt, меч в
/// руки, state = Finishing. Commit без цели молча игнорируется.
pub fn player_movement(
    input: Res<PlayerInput>,
    camera: Res<CameraRig>,
    clock: Res<SimulationClock>,
    mut prompt: ResMut<FinishingPrompt>,
    mut players: Query<
        (
            &mut Transform,
            &mut CombatState,
            &MovementConfig,
            &mut Animator,
            &mut WeaponSocket,
        ),
        With<Player>,
    >,
) {
    let Ok((mut transform, mut state, config, mut animator, mut socket)) = players.single_mut()
    else {
        return;
    };

    if state.is_locked() {
        return;
    }

    let axes = input.axes;
    animator.set_float(PARAM_HORIZONTAL, axes.x);
    animator.set_float(PARAM_VERTICAL, axes.y);

    if axes != Vec2::ZERO {
        let movement = Vec3::new(axes.x, 0.0, axes.y);
        let rotated = Quat::from_rotation_y(camera.yaw) * movement;

        if movement.length() > config.turn_deadzone {
            transform.look_to(rotated, Vec3::Y);
        }

        let step = config.movement_speed * clock.delta_secs();
        transform.translation += rotated * step;
    }

    // Commit finishing
    if !prompt.visible || !input.finish_pressed {
        return;
    }
    let CombatState::Targeting {
        target,
        approach_point,
    } = *state
    else {
        return;
    };

    prompt.visible = false;
    socket.mesh = WeaponMesh::Sword;

    let delta = approach_point - transform.translation;
    animator.set_float(PARAM_HORIZONTAL, delta.x);
    animator.set_float(PARAM_VERTICAL, delta.z);

    *state = CombatState::Finishing {
        target,
        approach_point,
    };
    log_info(&format!("Finishing committed on {:?}", target));
}

/// System: бег к approach point и запуск анимации добивания (Finishing)
///
/// Каждый тик: шаг к точке на running speed, взгляд на врага. В пределах
/// ε от точки: стоп, `IsFinishing = true`, state = AwaitingFinish, и два
/// отложенных callback'а — смерть цели на середине клипа, сброс состояния
/// в его конце. Смерть через weak lookup: исчезнувший враг пропускается.
pub fn finishing_approach(
    clock: Res<SimulationClock>,
    mut scheduled: ResMut<ScheduledCallbacks>,
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &mut CombatState,
            &MovementConfig,
            &FinishingTimings,
            &mut Animator,
        ),
        With<Player>,
    >,
    enemies: Query<&Transform, (With<Enemy>, Without<Player>)>,
) {
    let Ok((player, mut transform, mut state, config, timings, mut animator)) =
        players.single_mut()
    else {
        return;
    };

    let CombatState::Finishing {
        target,
        approach_point,
    } = *state
    else {
        return;
    };

    let step = config.running_speed() * clock.delta_secs();
    let to_point = approach_point - transform.translation;
    if to_point.length() > step {
        transform.translation += to_point.normalize() * step;
    } else {
        transform.translation = approach_point;
    }

    // Всё время бега смотрим на цель
    if let Ok(enemy_transform) = enemies.get(target) {
        let direction = enemy_transform.translation - transform.translation;
        if direction.length_squared() > f32::EPSILON {
            transform.look_to(direction, Vec3::Y);
        }
    }

    if transform.translation.distance(approach_point) > APPROACH_EPSILON {
        return;
    }

    animator.set_bool(PARAM_IS_FINISHING, true);
    *state = CombatState::AwaitingFinish { target };

    let now = clock.elapsed();
    scheduled.schedule(
        now + timings.mid_point_delay,
        Box::new(move |world| crate::enemy::kill_enemy(world, target)),
    );
    scheduled.schedule(
        now + timings.animation_duration,
        Box::new(move |world| finish_sequence_end(world, player)),
    );

    log(&format!(
        "Approach point reached, finishing animation started ({}s)",
        timings.animation_duration
    ));
}

/// Конец finishing sequence (callback)
///
/// Снимает анимационный флаг, возвращает автомат в руки, сбрасывает цель и
/// отдаёт управление (state = Moving).
pub fn finish_sequence_end(world: &mut World, player: Entity) {
    if let Some(mut animator) = world.get_mut::<Animator>(player) {
        animator.set_bool(PARAM_IS_FINISHING, false);
    }
    if let Some(mut socket) = world.get_mut::<WeaponSocket>(player) {
        socket.mesh = WeaponMesh::AssaultRifle;
    }
    if let Some(mut state) = world.get_mut::<CombatState>(player) {
        *state = CombatState::Moving;
    }

    log("Finishing sequence complete, control returned");
}

/// System: прицеливание торсом в экранный курсор
///
/// Подавляется пока идёт finishing sequence или пока аниматор находится в
/// состоянии "Finishing". Угол считается от проекции torso bone на экран.
pub fn aim_torso_at_cursor(
    input: Res<PlayerInput>,
    camera: Res<CameraRig>,
    mut players: Query<(&Transform, &CombatState, &Animator, &mut TorsoAim), With<Player>>,
) {
    let Ok((transform, state, animator, mut torso)) = players.single_mut() else {
        return;
    };

    if state.is_locked() || animator.is_in_state(STATE_FINISHING) {
        return;
    }

    let bone_screen = camera.world_to_screen(transform.translation + torso.offset);
    let direction = input.cursor_position - bone_screen;
    if direction == Vec2::ZERO {
        return;
    }

    // -45° и roll/pitch-поправки — под ориентацию кости в риге
    let angle = -direction.y.atan2(direction.x) - std::f32::consts::FRAC_PI_4;
    torso.rotation = Quat::from_rotation_y(angle)
        * Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2)
        * Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
}
