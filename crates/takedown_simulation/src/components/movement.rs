//! Носитель скорости для физических тел.

use bevy::prelude::*;

/// Физическое тело (velocity carrier)
///
/// Core не интегрирует силы и не читает физику обратно — единственная
/// операция над чужими телами это обнуление скорости при смерти врага.
/// Интеграция velocity → position принадлежит внешнему физическому слою.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}
