//! Слот оружия: какой mesh сейчас в руках.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Pre-defined mesh handles оружия
///
/// Core только выбирает один из двух; сами ассеты — забота рендера.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum WeaponMesh {
    AssaultRifle,
    Sword,
}

/// Слот оружия на игроке
///
/// Swap происходит в двух местах finishing sequence:
/// commit → Sword, sequence-end → обратно AssaultRifle.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct WeaponSocket {
    pub mesh: WeaponMesh,
}

impl Default for WeaponSocket {
    fn default() -> Self {
        Self {
            mesh: WeaponMesh::AssaultRifle,
        }
    }
}
