//! Компоненты игрока: marker, combat state machine, конфиги.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker component для player-controlled entity
///
/// Input-системы работают только по `With<Player>`.
/// В single-player сцене компонент ровно у одного entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Combat state machine игрока
///
/// Цель и approach point живут в вариантах — нелегальные комбинации
/// ("finishing без цели", "две цели") непредставимы. Ссылка на врага
/// слабая: Entity может исчезнуть, все потребители делают lookup.
///
/// Переходы:
/// - Moving → Targeting: живой враг вошёл в detection volume
/// - Targeting → Moving: любой враг покинул volume (без сравнения identity —
///   поведение источника сохранено намеренно)
/// - Targeting → Finishing: commit input при видимом prompt
/// - Finishing → AwaitingFinish: добежали до approach point (ε = 0.001)
/// - AwaitingFinish → Moving: sequence-end callback
///
/// В Finishing и AwaitingFinish обычный movement/look input не обрабатывается
/// и повторный захват цели приостановлен.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum CombatState {
    /// Свободное перемещение, цели нет
    Moving,

    /// Цель захвачена, игрок ещё свободно двигается
    Targeting {
        target: Entity,
        approach_point: Vec3,
    },

    /// Commit сделан: бежим к точке за спиной врага
    Finishing {
        target: Entity,
        approach_point: Vec3,
    },

    /// Анимация добивания играет, управление заблокировано
    AwaitingFinish { target: Entity },
}

impl Default for CombatState {
    fn default() -> Self {
        Self::Moving
    }
}

impl CombatState {
    /// Захвачена ли сейчас цель (в любом состоянии)
    pub fn current_target(&self) -> Option<Entity> {
        match self {
            CombatState::Moving => None,
            CombatState::Targeting { target, .. }
            | CombatState::Finishing { target, .. }
            | CombatState::AwaitingFinish { target } => Some(*target),
        }
    }

    /// Заблокировано ли обычное управление (finishing sequence идёт)
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            CombatState::Finishing { .. } | CombatState::AwaitingFinish { .. }
        )
    }
}

/// Параметры движения игрока
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct MovementConfig {
    /// Скорость ходьбы (m/s)
    pub movement_speed: f32,
    /// Во сколько раз ускоряется бег к врагу во время добивания
    pub running_multiplier: f32,
    /// Deadzone: ниже этой длины input-вектора персонаж не поворачивается
    pub turn_deadzone: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            running_multiplier: 2.0,
            turn_deadzone: 0.1,
        }
    }
}

impl MovementConfig {
    /// Скорость бега к approach point (m/s)
    pub fn running_speed(&self) -> f32 {
        self.movement_speed * self.running_multiplier
    }
}

/// Тайминги finishing sequence, выведенные из длины клипа при спавне
///
/// Инвариант: mid_point_delay = animation_duration × 0.5 ≤ animation_duration,
/// поэтому death notification всегда раньше sequence-end.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FinishingTimings {
    pub animation_duration: f32,
    pub mid_point_delay: f32,
}

impl FinishingTimings {
    pub fn from_clip_length(length: f32) -> Self {
        Self {
            animation_duration: length,
            mid_point_delay: length * 0.5,
        }
    }
}

/// Верхняя часть «тела» (torso bone), которой игрок целится в курсор
///
/// Core пишет сюда rotation; скелет/рендер — забота внешнего слоя.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TorsoAim {
    /// Смещение кости от корня персонажа
    pub offset: Vec3,
    pub rotation: Quat,
}

impl Default for TorsoAim {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 1.2, 0.0),
            rotation: Quat::IDENTITY,
        }
    }
}

/// Detection volume игрока (сенсор захвата цели)
///
/// `inside` трекает occupancy: enter/exit события генерируются на переходах,
/// не каждый тик. Дистанция проверяется от корня игрока до корня врага.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DetectionVolume {
    /// Радиус сенсора (на каком расстоянии доступно добивание)
    pub radius: f32,
    /// Коэффициент расстояния до approach point за спиной врага
    pub distance_coefficient: f32,
    /// Entities сейчас внутри volume
    pub inside: Vec<Entity>,
}

impl Default for DetectionVolume {
    fn default() -> Self {
        Self {
            radius: 5.0,
            distance_coefficient: 1.5,
            inside: Vec::new(),
        }
    }
}
