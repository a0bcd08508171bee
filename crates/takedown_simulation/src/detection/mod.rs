//! Proximity acquisition: обнаружение врагов detection volume'ом игрока.
//!
//! Две системы: `detect_enemy_proximity` превращает occupancy-переходы в
//! enter/exit события, `acquire_targets` превращает события в захват/сброс
//! цели. Разделение повторяет границу "сенсор → игровая логика".

use bevy::prelude::*;

use crate::components::{
    CollisionCategory, CombatState, DetectionCollider, DetectionVolume, Enemy, Player,
};
use crate::logger::log;
use crate::ui::FinishingPrompt;

/// Событие: entity вошёл в detection volume игрока
#[derive(Event, Debug, Clone)]
pub struct VolumeEntered {
    pub entity: Entity,
}

/// Событие: entity покинул detection volume игрока
///
/// Генерируется и при выключении коллайдера внутри volume (смерть врага
/// выглядит как выход).
#[derive(Event, Debug, Clone)]
pub struct VolumeExited {
    pub entity: Entity,
}

/// System: occupancy-трекинг detection volume
///
/// Участвуют только entities категории Enemy с включённым коллайдером;
/// остальные столкновения игнорируются. Дистанция — от корня игрока до
/// корня врага, радиус из `DetectionVolume`.
pub fn detect_enemy_proximity(
    mut entered: EventWriter<VolumeEntered>,
    mut exited: EventWriter<VolumeExited>,
    mut players: Query<(&Transform, &mut DetectionVolume), With<Player>>,
    colliders: Query<
        (Entity, &Transform, &DetectionCollider, &CollisionCategory),
        Without<Player>,
    >,
) {
    let Ok((player_transform, mut volume)) = players.single_mut() else {
        return;
    };

    for (entity, transform, collider, category) in colliders.iter() {
        if *category != CollisionCategory::Enemy {
            continue;
        }

        let inside_now = collider.enabled
            && player_transform
                .translation
                .distance(transform.translation)
                <= volume.radius;
        let was_inside = volume.inside.contains(&entity);

        if inside_now && !was_inside {
            volume.inside.push(entity);
            entered.write(VolumeEntered { entity });
        } else if !inside_now && was_inside {
            volume.inside.retain(|e| *e != entity);
            exited.write(VolumeExited { entity });
        }
    }
}

/// System: захват и сброс текущей цели по enter/exit событиям
///
/// Пока идёт finishing sequence (Finishing/AwaitingFinish) повторный захват
/// приостановлен — события этого тика просто пропускаются.
///
/// Выход обрабатывается БЕЗ сравнения identity: любой вышедший враг
/// сбрасывает цель и прячет prompt (поведение источника, сохранено
/// намеренно). Вход захватывает цель только когда её нет, и только живого
/// врага — мёртвый проверяется на входе, повторной проверки у уже
/// захваченной цели не делается.
pub fn acquire_targets(
    mut entered: EventReader<VolumeEntered>,
    mut exited: EventReader<VolumeExited>,
    mut prompt: ResMut<FinishingPrompt>,
    mut players: Query<(&mut CombatState, &DetectionVolume), With<Player>>,
    enemies: Query<(&Enemy, &Transform)>,
) {
    let Ok((mut state, volume)) = players.single_mut() else {
        return;
    };

    if state.is_locked() {
        entered.clear();
        exited.clear();
        return;
    }

    for _exit in exited.read() {
        if state.current_target().is_some() {
            log("Target lost: enemy left detection volume");
        }
        *state = CombatState::Moving;
        prompt.visible = false;
    }

    for enter in entered.read() {
        if state.current_target().is_some() {
            continue; // максимум одна цель
        }

        let Ok((enemy, transform)) = enemies.get(enter.entity) else {
            continue;
        };
        if !enemy.alive {
            continue;
        }

        let approach_point = transform.translation
            - volume.distance_coefficient * transform.forward().as_vec3();

        *state = CombatState::Targeting {
            target: enter.entity,
            approach_point,
        };
        prompt.visible = true;
        log(&format!("Target acquired: {:?}", enter.entity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_event_carries_entity() {
        let event = VolumeExited {
            entity: Entity::PLACEHOLDER,
        };
        assert_eq!(event.entity, Entity::PLACEHOLDER);
    }
}
