//! Tick clock + отложенные one-shot callbacks.
//!
//! Симуляция идёт фиксированным шагом 60 Hz. Всё время считается от tick
//! counter'а (никакого wall clock — иначе прощай детерминизм).
//!
//! `ScheduledCallbacks` — единственный механизм отложенных событий:
//! death notification в середине finishing-анимации, сброс состояния в её
//! конце, respawn врага. Callback стреляет ровно один раз, на первом тике
//! где `elapsed >= fire_at`, и отмены НЕТ: запланированный callback нельзя
//! отозвать, даже если состояние мира успело измениться. Сами callbacks
//! переживают исчезновение целевого entity через weak lookup.

use bevy::prelude::*;

/// Частота simulation tick (Hz)
pub const SIMULATION_HZ: f32 = 60.0;

/// Tick counter симуляции (fixed timestep)
///
/// Инкрементируется ПЕРВЫМ в цепочке систем каждый тик.
/// Wraparound safe: u64 хватит на миллиарды лет при 60 Hz.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SimulationClock {
    pub tick: u64,
    pub timestep: f32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            tick: 0,
            timestep: 1.0 / SIMULATION_HZ,
        }
    }
}

impl SimulationClock {
    /// Секунд симуляции с момента старта
    pub fn elapsed(&self) -> f32 {
        self.tick as f32 * self.timestep
    }

    /// Длительность одного тика (секунды)
    pub fn delta_secs(&self) -> f32 {
        self.timestep
    }
}

/// System: инкремент tick counter (запускается первым в FixedUpdate)
pub fn advance_clock(mut clock: ResMut<SimulationClock>) {
    clock.tick = clock.tick.wrapping_add(1);
}

/// One-shot callback, выполняется с полным доступом к миру
pub type ScheduledCallback = Box<dyn FnOnce(&mut World) + Send + Sync + 'static>;

struct ScheduledEntry {
    fire_at: f32,
    seq: u64,
    callback: ScheduledCallback,
}

/// Очередь отложенных one-shot callbacks
///
/// `fire_at` — абсолютное время симуляции (секунды), как у despawn-таймеров:
/// вызывающий сам считает `now + delay`. Callbacks с одинаковым `fire_at`
/// стреляют в порядке планирования (seq — monotonic tiebreaker, это даёт
/// гарантию "death notification раньше sequence-end" у одного entity).
#[derive(Resource, Default)]
pub struct ScheduledCallbacks {
    entries: Vec<ScheduledEntry>,
    next_seq: u64,
}

impl ScheduledCallbacks {
    /// Планирует callback на абсолютное время `fire_at` (секунды симуляции)
    pub fn schedule(&mut self, fire_at: f32, callback: ScheduledCallback) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(ScheduledEntry {
            fire_at,
            seq,
            callback,
        });
    }

    /// Количество ещё не выстреливших callbacks
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    fn drain_due(&mut self, now: f32) -> Vec<ScheduledEntry> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].fire_at <= now {
                due.push(self.entries.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due
    }
}

/// System: выстреливает все созревшие callbacks (exclusive, `&mut World`)
///
/// Запускается сразу после advance_clock, ДО per-tick игровых систем —
/// выбор реализации, порядок callbacks vs per-tick логики в пределах тика
/// внешне не гарантируется. Callback, запланированный из другого callback
/// (respawn из kill), стреляет не раньше следующего тика.
pub fn fire_due_callbacks(world: &mut World) {
    let now = world.resource::<SimulationClock>().elapsed();
    let due = world.resource_mut::<ScheduledCallbacks>().drain_due(now);

    for entry in due {
        (entry.callback)(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn run_tick(world: &mut World) {
        world.resource_mut::<SimulationClock>().tick += 1;
        fire_due_callbacks(world);
    }

    fn test_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(ScheduledCallbacks::default());
        world
    }

    #[test]
    fn test_callback_fires_once_after_delay() {
        let mut world = test_world();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        world.resource_mut::<ScheduledCallbacks>().schedule(
            0.05, // 3 тика при 60 Hz
            Box::new(move |_world| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        run_tick(&mut world); // t ≈ 0.0167
        run_tick(&mut world); // t ≈ 0.0333
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        run_tick(&mut world); // t ≈ 0.05 — созрел
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // One-shot: больше не стреляет
        for _ in 0..10 {
            run_tick(&mut world);
        }
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(world.resource::<ScheduledCallbacks>().pending(), 0);
    }

    #[test]
    fn test_same_tick_callbacks_fire_in_schedule_order() {
        let mut world = test_world();
        let order = Arc::new(Mutex::new(Vec::new()));

        // Оба созревают на одном тике; короткий delay запланирован первым
        for label in ["death", "sequence_end"] {
            let order = order.clone();
            world.resource_mut::<ScheduledCallbacks>().schedule(
                0.01,
                Box::new(move |_world| {
                    order.lock().unwrap().push(label);
                }),
            );
        }

        run_tick(&mut world);
        assert_eq!(*order.lock().unwrap(), vec!["death", "sequence_end"]);
    }

    #[test]
    fn test_callback_scheduled_from_callback_fires_later() {
        let mut world = test_world();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        world.resource_mut::<ScheduledCallbacks>().schedule(
            0.01,
            Box::new(move |world| {
                // Перепланирование изнутри callback (как respawn из kill)
                let now = world.resource::<SimulationClock>().elapsed();
                let counter = counter.clone();
                world.resource_mut::<ScheduledCallbacks>().schedule(
                    now + 0.02,
                    Box::new(move |_world| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        run_tick(&mut world); // внешний стреляет, внутренний запланирован
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        run_tick(&mut world);
        run_tick(&mut world); // +0.02 от планирования
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clock_elapsed() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.elapsed(), 0.0);

        clock.tick = 60;
        assert!((clock.elapsed() - 1.0).abs() < 1e-4);
    }
}
