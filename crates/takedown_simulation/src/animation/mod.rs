//! Граница с animation driver'ом.
//!
//! Core не проигрывает анимации: он пишет именованные параметры, читает
//! текущее состояние и длину клипа (один раз, при инициализации). Playback —
//! забота внешнего слоя; для headless-режима есть stand-in система, которая
//! зеркалит bool `IsFinishing` в имя текущего состояния.

use bevy::prelude::*;
use std::collections::HashMap;

pub const PARAM_HORIZONTAL: &str = "Horizontal";
pub const PARAM_VERTICAL: &str = "Vertical";
pub const PARAM_IS_FINISHING: &str = "IsFinishing";

pub const STATE_LOCOMOTION: &str = "Locomotion";
pub const STATE_FINISHING: &str = "Finishing";

pub const CLIP_FINISHING: &str = "Finishing";

/// Описание клипа в таблице аниматора
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: &'static str,
    pub length: f32,
}

/// Animator boundary component
///
/// `enabled == false` замораживает playback (используется на мёртвых врагах).
/// Параметры — по имени, как у реальных animation-граф движков.
#[derive(Component, Debug, Clone)]
pub struct Animator {
    pub enabled: bool,
    floats: HashMap<&'static str, f32>,
    bools: HashMap<&'static str, bool>,
    current_state: &'static str,
    clips: Vec<AnimationClip>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Animator {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            enabled: true,
            floats: HashMap::new(),
            bools: HashMap::new(),
            current_state: STATE_LOCOMOTION,
            clips,
        }
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    /// Длина именованного клипа (читается один раз при инициализации)
    pub fn clip_length(&self, name: &str) -> Option<f32> {
        self.clips
            .iter()
            .find(|clip| clip.name == name)
            .map(|clip| clip.length)
    }

    pub fn is_in_state(&self, name: &str) -> bool {
        self.current_state == name
    }

    pub fn enter_state(&mut self, name: &'static str) {
        self.current_state = name;
    }
}

/// System: headless stand-in playback
///
/// Зеркалит `IsFinishing` в current state, чтобы `is_in_state("Finishing")`
/// работал без настоящего animation-графа. У выключенного аниматора
/// состояние не меняется.
pub fn mirror_finishing_playback(mut animators: Query<&mut Animator>) {
    for mut animator in animators.iter_mut() {
        if !animator.enabled {
            continue;
        }

        let state = if animator.bool(PARAM_IS_FINISHING) {
            STATE_FINISHING
        } else {
            STATE_LOCOMOTION
        };

        if !animator.is_in_state(state) {
            animator.enter_state(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator_with_finishing_clip() -> Animator {
        Animator::new(vec![AnimationClip {
            name: CLIP_FINISHING,
            length: 2.4,
        }])
    }

    #[test]
    fn test_params_default_to_zero_and_false() {
        let animator = Animator::default();
        assert_eq!(animator.float(PARAM_HORIZONTAL), 0.0);
        assert!(!animator.bool(PARAM_IS_FINISHING));
    }

    #[test]
    fn test_set_and_read_params() {
        let mut animator = Animator::default();
        animator.set_float(PARAM_HORIZONTAL, -0.5);
        animator.set_bool(PARAM_IS_FINISHING, true);

        assert_eq!(animator.float(PARAM_HORIZONTAL), -0.5);
        assert!(animator.bool(PARAM_IS_FINISHING));
    }

    #[test]
    fn test_clip_length_lookup() {
        let animator = animator_with_finishing_clip();
        assert_eq!(animator.clip_length(CLIP_FINISHING), Some(2.4));
        assert_eq!(animator.clip_length("Nonexistent"), None);
    }

    #[test]
    fn test_starts_in_locomotion() {
        let animator = Animator::default();
        assert!(animator.is_in_state(STATE_LOCOMOTION));
        assert!(!animator.is_in_state(STATE_FINISHING));
    }
}
