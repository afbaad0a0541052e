//! Zeitgesteuerte Animationen: Überblenden, Pulsieren, Blinken
//!
//! Alle Animationen sind nicht-blockierend. Sie werden pro Schleifendurchlauf
//! mit der aktuellen Zeit abgefragt und liefern die anzuzeigende Basisfarbe.

use rgb::RGB8;

use crate::logic::{lerp_color, scale_percent};
use crate::types::ControllerConfig;

/// Ergebnis einer Abfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub color: RGB8,
    pub finished: bool,
}

/// Lineare Überblendung in festen Schritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    from: RGB8,
    to: RGB8,
    started_ms: u64,
    steps: u16,
    step_ms: u64,
}

impl Fade {
    pub fn new(from: RGB8, to: RGB8, now_ms: u64, config: &ControllerConfig) -> Self {
        Self {
            from,
            to,
            started_ms: now_ms,
            steps: config.fade_steps,
            step_ms: config.fade_step_ms(),
        }
    }

    pub fn target(&self) -> RGB8 {
        self.to
    }

    /// Aktueller Schritt; ein verspäteter Durchlauf überspringt Schritte
    pub fn step_at(&self, now_ms: u64) -> u16 {
        let elapsed = now_ms.saturating_sub(self.started_ms) / self.step_ms;
        elapsed.min(self.steps as u64) as u16
    }

    pub fn sample(&self, now_ms: u64) -> Sample {
        let step = self.step_at(now_ms);
        Sample {
            color: lerp_color(self.from, self.to, step, self.steps),
            finished: step >= self.steps,
        }
    }
}

/// Helligkeits-Puls auf einer festen Basisfarbe
///
/// Ein Zyklus blendet von 100 % in Prozent-Schritten bis zur Untergrenze
/// ab und wieder auf 100 % auf. Jeder Schritt steht `step_ms` lang.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    base: RGB8,
    started_ms: u64,
    step_ms: u64,
    step_percent: u8,
    /// Schritte pro Richtung
    half_cycle: u32,
    repeats: u32,
}

impl Pulse {
    pub fn new(base: RGB8, now_ms: u64, config: &ControllerConfig) -> Self {
        let floor = config.pulse_floor_percent.min(100);
        let half_cycle = if config.pulse_step_percent == 0 {
            0
        } else {
            ((100 - floor) / config.pulse_step_percent) as u32
        };
        Self {
            base,
            started_ms: now_ms,
            step_ms: config.pulse_step_ms.max(1),
            step_percent: config.pulse_step_percent,
            half_cycle,
            repeats: config.pulse_repeats as u32,
        }
    }

    pub fn base(&self) -> RGB8 {
        self.base
    }

    /// Gesamtzahl der Schritte über alle Wiederholungen
    pub fn total_steps(&self) -> u32 {
        self.half_cycle * 2 * self.repeats
    }

    /// Helligkeit in Prozent für Schritt `tick` (0-basiert)
    pub fn percent_at(&self, tick: u32) -> u8 {
        if self.half_cycle == 0 {
            return 100;
        }
        let index = tick % (self.half_cycle * 2);
        let down = if index < self.half_cycle {
            index + 1
        } else {
            self.half_cycle * 2 - index - 1
        };
        100 - (down * self.step_percent as u32) as u8
    }

    pub fn sample(&self, now_ms: u64) -> Sample {
        let tick = (now_ms.saturating_sub(self.started_ms) / self.step_ms) as u32;
        if tick >= self.total_steps() {
            return Sample {
                color: self.base,
                finished: true,
            };
        }
        Sample {
            color: scale_percent(self.base, self.percent_at(tick)),
            finished: false,
        }
    }
}

/// Blink-Zustand für die Gefahr-Stufe
///
/// Startet in der leuchtenden Phase und wechselt alle `interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    lit: bool,
    last_toggle_ms: u64,
    interval_ms: u64,
}

impl Blink {
    pub fn start(now_ms: u64, interval_ms: u64) -> Self {
        Self {
            lit: true,
            last_toggle_ms: now_ms,
            interval_ms,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Wechselt die Phase, wenn das Intervall abgelaufen ist
    ///
    /// Gibt `true` zurück, wenn gewechselt wurde. Der nächste Wechsel wird
    /// vom geplanten Zeitpunkt aus gerechnet, ein verspäteter Durchlauf
    /// verschiebt den Takt also nicht. Liegt mehr als ein ganzes Intervall
    /// dazwischen, beginnt der Takt ab `now_ms` neu.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_toggle_ms) < self.interval_ms {
            return false;
        }
        self.lit = !self.lit;
        let scheduled = self.last_toggle_ms + self.interval_ms;
        self.last_toggle_ms = if now_ms.saturating_sub(scheduled) >= self.interval_ms {
            now_ms
        } else {
            scheduled
        };
        true
    }
}
