//! Lifecycle врага: kill → freeze → отложенный respawn.
//!
//! Враг никогда не деспавнится — смерть это toggle `alive` плюс заморозка
//! тел, respawn возвращает его в случайную точку области. Обе операции
//! вызываются из callbacks планировщика, поэтому работают напрямую с
//! `&mut World` и делают weak lookup: исчезнувший entity — тихий no-op.

use bevy::prelude::*;
use rand::Rng;

use crate::animation::Animator;
use crate::components::{
    CollisionCategory, DetectionCollider, Enemy, PhysicsBodies, PhysicsBody, RespawnArea,
};
use crate::logger::{log, log_info};
use crate::scheduler::{ScheduledCallbacks, SimulationClock};
use crate::DeterministicRng;

/// Количество ragdoll-тел у врага по умолчанию (торс, таз, конечности)
const DEFAULT_BODY_COUNT: usize = 6;

/// Спавнит врага с ragdoll-телами и включённым detection-коллайдером
///
/// Тела собираются в `PhysicsBodies` один раз, здесь; после init список
/// не мутируется.
pub fn spawn_enemy(world: &mut World, position: Vec3, area: RespawnArea) -> Entity {
    let bodies: Vec<Entity> = (0..DEFAULT_BODY_COUNT)
        .map(|_| world.spawn(PhysicsBody::default()).id())
        .collect();

    world
        .spawn((
            Transform::from_translation(position),
            Enemy::default(),
            area,
            PhysicsBodies { entities: bodies },
            DetectionCollider::default(),
            CollisionCategory::Enemy,
            Animator::default(),
        ))
        .id()
}

/// Смерть врага (idempotent)
///
/// Уже мёртвый враг — немедленный no-op: повторный вызов до истечения
/// respawn delay не планирует второй respawn. Иначе: alive=false, коллайдер
/// и аниматор выключены, скорость каждого тела обнулена (пустой список тел —
/// нормально), respawn запланирован через `respawn_delay`.
pub fn kill_enemy(world: &mut World, entity: Entity) {
    let Some(mut enemy) = world.get_mut::<Enemy>(entity) else {
        // Цель исчезла до того как callback выстрелил
        return;
    };

    if !enemy.alive {
        return;
    }
    enemy.alive = false;

    if let Some(mut collider) = world.get_mut::<DetectionCollider>(entity) {
        collider.enabled = false;
    }
    if let Some(mut animator) = world.get_mut::<Animator>(entity) {
        animator.enabled = false;
    }

    // Freeze in place: тела больше не двигаются
    let bodies = world
        .get::<PhysicsBodies>(entity)
        .map(|bodies| bodies.entities.clone())
        .unwrap_or_default();
    for body in bodies {
        if let Some(mut physics) = world.get_mut::<PhysicsBody>(body) {
            physics.velocity = Vec3::ZERO;
        }
    }

    let delay = world
        .get::<RespawnArea>(entity)
        .map(|area| area.respawn_delay)
        .unwrap_or_else(|| RespawnArea::default().respawn_delay);
    let fire_at = world.resource::<SimulationClock>().elapsed() + delay;

    world
        .resource_mut::<ScheduledCallbacks>()
        .schedule(fire_at, Box::new(move |world| respawn_enemy(world, entity)));

    log_info(&format!(
        "Enemy {:?} killed, respawn in {:.1}s",
        entity, delay
    ));
}

/// Возрождение врага в случайной точке области
///
/// alive=true, коллайдер и аниматор обратно включены, позиция — uniform
/// random внутри bounds на высоте 0, ориентация сброшена в identity.
pub fn respawn_enemy(world: &mut World, entity: Entity) {
    let Some(area) = world.get::<RespawnArea>(entity).copied() else {
        return;
    };

    let (x, z) = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        (
            rng.rng.gen_range(area.bounds_x.0..=area.bounds_x.1),
            rng.rng.gen_range(area.bounds_z.0..=area.bounds_z.1),
        )
    };

    let Some(mut enemy) = world.get_mut::<Enemy>(entity) else {
        return;
    };
    enemy.alive = true;

    if let Some(mut collider) = world.get_mut::<DetectionCollider>(entity) {
        collider.enabled = true;
    }
    if let Some(mut animator) = world.get_mut::<Animator>(entity) {
        animator.enabled = true;
    }

    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation = Vec3::new(x, 0.0, z);
        transform.rotation = Quat::IDENTITY;
    }

    log(&format!("Enemy {:?} respawned at ({:.1}, {:.1})", entity, x, z));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifecycle_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(ScheduledCallbacks::default());
        world.insert_resource(DeterministicRng::new(42));
        world
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut world = lifecycle_world();
        let enemy = spawn_enemy(&mut world, Vec3::ZERO, RespawnArea::default());

        kill_enemy(&mut world, enemy);
        kill_enemy(&mut world, enemy); // до истечения delay

        assert!(!world.get::<Enemy>(enemy).unwrap().alive);
        // Ровно один respawn запланирован
        assert_eq!(world.resource::<ScheduledCallbacks>().pending(), 1);
    }

    #[test]
    fn test_kill_freezes_bodies_and_disables_collider() {
        let mut world = lifecycle_world();
        let enemy = spawn_enemy(&mut world, Vec3::ZERO, RespawnArea::default());

        // Разгоняем тела
        let bodies = world.get::<PhysicsBodies>(enemy).unwrap().entities.clone();
        for body in &bodies {
            world.get_mut::<PhysicsBody>(*body).unwrap().velocity = Vec3::new(1.0, 2.0, 3.0);
        }

        kill_enemy(&mut world, enemy);

        for body in &bodies {
            assert_eq!(world.get::<PhysicsBody>(*body).unwrap().velocity, Vec3::ZERO);
        }
        assert!(!world.get::<DetectionCollider>(enemy).unwrap().enabled);
        assert!(!world.get::<Animator>(enemy).unwrap().enabled);
    }

    #[test]
    fn test_respawn_inside_bounds_at_ground_identity() {
        let mut world = lifecycle_world();
        let area = RespawnArea::new((-49.0, 49.0), (-49.0, 49.0), 5.0);
        let enemy = spawn_enemy(&mut world, Vec3::new(100.0, 3.0, 100.0), area);

        kill_enemy(&mut world, enemy);
        world.get_mut::<Transform>(enemy).unwrap().rotation = Quat::from_rotation_y(1.0);

        respawn_enemy(&mut world, enemy);

        let transform = world.get::<Transform>(enemy).unwrap();
        assert!(area.contains(transform.translation));
        assert_eq!(transform.translation.y, 0.0);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert!(world.get::<Enemy>(enemy).unwrap().alive);
        assert!(world.get::<DetectionCollider>(enemy).unwrap().enabled);
    }

    #[test]
    fn test_kill_despawned_enemy_is_noop() {
        let mut world = lifecycle_world();
        let enemy = spawn_enemy(&mut world, Vec3::ZERO, RespawnArea::default());
        world.despawn(enemy);

        // Не паникует и ничего не планирует
        kill_enemy(&mut world, enemy);
        assert_eq!(world.resource::<ScheduledCallbacks>().pending(), 0);
    }

    #[test]
    fn test_enemy_with_no_bodies_still_dies() {
        let mut world = lifecycle_world();
        let enemy = world
            .spawn((
                Transform::default(),
                Enemy::default(),
                RespawnArea::default(),
                PhysicsBodies::default(),
                DetectionCollider::default(),
                CollisionCategory::Enemy,
                Animator::default(),
            ))
            .id();

        kill_enemy(&mut world, enemy);
        assert!(!world.get::<Enemy>(enemy).unwrap().alive);
        assert_eq!(world.resource::<ScheduledCallbacks>().pending(), 1);
    }
}
