//! Граница с input source.
//!
//! Core не владеет устройствами ввода: внешний слой (или тест) пишет в
//! `PlayerInput`, core только читает. Edge-события (commit press)
//! сбрасываются core'ом в конце тика, чтобы press сработал ровно один раз.

use bevy::prelude::*;

/// Снимок ввода игрока на текущий тик
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Две ортогональные оси движения, каждая в [-1, 1]
    pub axes: Vec2,
    /// Дискретное нажатие "commit finishing" (edge, не hold)
    pub finish_pressed: bool,
    /// Позиция курсора в screen space (пиксели)
    pub cursor_position: Vec2,
}

/// System: сброс edge-событий в конце цепочки тика
pub fn clear_pressed(mut input: ResMut<PlayerInput>) {
    input.finish_pressed = false;
}
