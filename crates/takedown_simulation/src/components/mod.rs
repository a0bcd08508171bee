//! ECS Components игровых entity
//!
//! Организация по доменам:
//! - player: player marker, combat state machine, конфиги движения/добивания
//! - enemy: lifecycle врага (alive, respawn область, физ. тела, коллайдер)
//! - movement: носители скорости (PhysicsBody)
//! - equipment: слот оружия (автомат / меч)

pub mod enemy;
pub mod equipment;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use enemy::*;
pub use equipment::*;
pub use movement::*;
pub use player::*;
