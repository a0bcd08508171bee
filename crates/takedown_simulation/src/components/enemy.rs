//! Компоненты lifecycle врага: Enemy, RespawnArea, PhysicsBodies, коллайдер.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Враг — пассивная мишень для добивания
///
/// Инвариант: `alive == false` только между kill и respawn.
/// Entity никогда не деспавнится — lifecycle это toggle alive, не пересоздание.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub alive: bool,
}

impl Default for Enemy {
    fn default() -> Self {
        Self { alive: true }
    }
}

/// Область возрождения врага (axis-aligned прямоугольник в мире)
///
/// Инвариант: min ≤ max по обеим осям (конструктор нормализует).
/// Высота respawn-точки всегда 0, ориентация — identity.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct RespawnArea {
    pub bounds_x: (f32, f32),
    pub bounds_z: (f32, f32),
    /// Задержка возрождения (секунды симуляции)
    pub respawn_delay: f32,
}

impl Default for RespawnArea {
    fn default() -> Self {
        Self::new((-49.0, 49.0), (-49.0, 49.0), 5.0)
    }
}

impl RespawnArea {
    pub fn new(bounds_x: (f32, f32), bounds_z: (f32, f32), respawn_delay: f32) -> Self {
        Self {
            bounds_x: normalize(bounds_x),
            bounds_z: normalize(bounds_z),
            respawn_delay,
        }
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.bounds_x.0
            && position.x <= self.bounds_x.1
            && position.z >= self.bounds_z.0
            && position.z <= self.bounds_z.1
    }
}

fn normalize(bounds: (f32, f32)) -> (f32, f32) {
    if bounds.0 <= bounds.1 {
        bounds
    } else {
        (bounds.1, bounds.0)
    }
}

/// Физические тела под корнем врага (ragdoll-сегменты)
///
/// Собирается ОДИН раз при спавне, после init не мутируется.
/// При смерти скорость каждого тела обнуляется (freeze in place).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBodies {
    pub entities: Vec<Entity>,
}

/// Коллайдер, через который враг виден detection volume игрока
///
/// Выключается на время смерти — мёртвый враг не детектится.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DetectionCollider {
    pub enabled: bool,
}

impl Default for DetectionCollider {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Явная категория collidable entity
///
/// Заменяет неявный integer layer id: acquisition-система проверяет enum,
/// всё кроме Enemy игнорируется.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum CollisionCategory {
    Enemy,
    Prop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respawn_area_normalizes_bounds() {
        let area = RespawnArea::new((49.0, -49.0), (-10.0, 10.0), 5.0);
        assert_eq!(area.bounds_x, (-49.0, 49.0));
        assert_eq!(area.bounds_z, (-10.0, 10.0));
    }

    #[test]
    fn test_respawn_area_contains() {
        let area = RespawnArea::new((-49.0, 49.0), (-49.0, 49.0), 5.0);
        assert!(area.contains(Vec3::new(0.0, 0.0, 0.0)));
        assert!(area.contains(Vec3::new(-49.0, 0.0, 49.0))); // границы включительно
        assert!(!area.contains(Vec3::new(50.0, 0.0, 0.0)));
    }
}
