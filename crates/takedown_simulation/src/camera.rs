//! Камера-коллаборатор: offset-следование за игроком.
//!
//! Core нужны от камеры две вещи: yaw (для camera-relative движения) и
//! проекция world → screen (для прицеливания торсом в курсор). Настоящий
//! рендер-камерой владеет внешний слой; здесь — её минимальная модель.

use bevy::prelude::*;

use crate::components::Player;

/// Модель следящей камеры
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraRig {
    pub position: Vec3,
    /// Смещение от игрока, захваченное при старте сцены
    pub offset: Vec3,
    /// Поворот камеры вокруг вертикали (радианы); input вращается на него
    pub yaw: f32,
    /// Размер viewport в пикселях
    pub viewport: Vec2,
    pub pixels_per_unit: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 12.0, -8.0),
            offset: Vec3::new(0.0, 12.0, -8.0),
            yaw: 0.0,
            viewport: Vec2::new(1920.0, 1080.0),
            pixels_per_unit: 64.0,
        }
    }
}

impl CameraRig {
    /// Упрощённая проекция world → screen (top-down, без перспективы)
    ///
    /// Достаточно для направления "курсор минус проекция торса"; точная
    /// матрица проекции принадлежит рендеру.
    pub fn world_to_screen(&self, world: Vec3) -> Vec2 {
        let half = self.viewport * 0.5;
        Vec2::new(
            half.x + (world.x - self.position.x) * self.pixels_per_unit,
            half.y - (world.z - self.position.z) * self.pixels_per_unit,
        )
    }
}

/// System: позиция камеры = игрок + offset (каждый тик, после движения)
pub fn follow_player(
    mut rig: ResMut<CameraRig>,
    players: Query<&Transform, With<Player>>,
) {
    let Ok(player) = players.single() else {
        return;
    };

    rig.position = player.translation + rig.offset;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_screen_centers_camera_target() {
        let rig = CameraRig {
            position: Vec3::new(3.0, 12.0, -5.0),
            ..Default::default()
        };

        let screen = rig.world_to_screen(Vec3::new(3.0, 0.0, -5.0));
        assert_eq!(screen, rig.viewport * 0.5);
    }

    #[test]
    fn test_world_to_screen_axes() {
        let rig = CameraRig {
            position: Vec3::ZERO,
            ..Default::default()
        };

        // +x мира → вправо по экрану, +z мира → вверх по экрану
        let right = rig.world_to_screen(Vec3::new(1.0, 0.0, 0.0));
        let up = rig.world_to_screen(Vec3::new(0.0, 0.0, 1.0));
        let center = rig.viewport * 0.5;

        assert!(right.x > center.x);
        assert!(up.y < center.y);
    }
}
