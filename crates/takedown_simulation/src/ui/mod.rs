//! Граница с UI: индикатор "добивание доступно".
//!
//! Core только переключает видимость, никогда не читает из UI.

use bevy::prelude::*;

/// Флаг видимости индикатора добивания
///
/// Показывается при захвате цели, прячется при потере цели или commit'е.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FinishingPrompt {
    pub visible: bool,
}
