//! Detektions-Controller - die komplette Ampel-Zustandsmaschine
//!
//! Kapselt den gesamten Zustand (Stufe, Zeilenpuffer, letzter Empfang,
//! Verbose-Flag, Frame) in einem Objekt, das der Polling-Loop besitzt.
//!
//! Ablauf pro `poll()`:
//! 1. Serielle Bytes lesen und Kommandos ausführen
//! 2. Überblendung / Puls weiterschalten
//! 3. Blinken aktualisieren
//! 4. Idle-Timeout prüfen
//! 5. Frame schreiben, falls geändert

use rgb::RGB8;

use crate::animation::{Blink, Fade, Pulse, Sample};
use crate::logic::{dim, render_frame};
use crate::parser::CommandParser;
use crate::status;
use crate::traits::{ControllerError, LedError, SerialError, SerialPort, SmartLedWriter};
use crate::types::{Command, ControllerConfig, DetectionLevel, OFF};

/// Obergrenze gelesener Bytes pro Durchlauf, damit ein Dauerstrom
/// den Loop nicht aushungert
pub const MAX_BYTES_PER_POLL: usize = 64;

#[derive(Debug, Clone, Copy)]
enum Animation {
    Fade(Fade),
    Pulse(Pulse),
}

impl Animation {
    fn sample(&self, now_ms: u64) -> Sample {
        match self {
            Animation::Fade(fade) => fade.sample(now_ms),
            Animation::Pulse(pulse) => pulse.sample(now_ms),
        }
    }
}

/// Ampel-Controller für `N` Pixel (1 = einzelne RGB-LED, 64 = 8×8 Matrix)
pub struct DetectionController<const N: usize> {
    config: ControllerConfig,
    parser: CommandParser,
    level: DetectionLevel,
    verbose: bool,
    last_activity_ms: u64,
    /// Angezeigte Basisfarbe (vor Muster und Helligkeit)
    displayed: RGB8,
    animation: Option<Animation>,
    blink: Option<Blink>,
    frame: [RGB8; N],
    /// Frame wurde noch nicht (erfolgreich) geschrieben
    dirty: bool,
}

impl<const N: usize> DetectionController<N> {
    pub fn new(config: ControllerConfig) -> Self {
        let level = DetectionLevel::None;
        let mut frame = [OFF; N];
        render_frame(&mut frame, level.color(), config.pattern);
        Self {
            config,
            parser: CommandParser::new(),
            level,
            verbose: config.verbose,
            last_activity_ms: 0,
            displayed: level.color(),
            animation: None,
            blink: None,
            frame,
            dirty: true,
        }
    }

    /// Erster Frame (grün) und optionale Bereit-Meldung
    pub fn start<S: SerialPort, L: SmartLedWriter>(
        &mut self,
        now_ms: u64,
        serial: &mut S,
        led: &mut L,
    ) -> Result<(), ControllerError> {
        self.last_activity_ms = now_ms;
        self.flush(led)?;
        if self.verbose {
            serial.write_line(&status::ready())?;
        }
        Ok(())
    }

    /// Ein Schleifendurchlauf
    ///
    /// Alle Schritte laufen auch dann, wenn ein früherer Schritt scheitert.
    /// Zurückgegeben wird der erste Fehler.
    pub fn poll<S: SerialPort, L: SmartLedWriter>(
        &mut self,
        now_ms: u64,
        serial: &mut S,
        led: &mut L,
    ) -> Result<(), ControllerError> {
        let drained = self.drain_serial(now_ms, serial);
        self.advance_animation(now_ms);
        self.update_blink(now_ms);
        let idle = self.check_idle_timeout(now_ms, serial);
        let flushed = self.flush(led);

        drained?;
        idle?;
        flushed?;
        Ok(())
    }

    /// Führt ein Kommando aus und schreibt die Status-Zeile
    ///
    /// Der Frame wird beim nächsten `flush()` bzw. `poll()` geschrieben.
    pub fn handle_command<S: SerialPort>(
        &mut self,
        command: Command,
        now_ms: u64,
        serial: &mut S,
    ) -> Result<(), SerialError> {
        match command {
            Command::SetLevel(level) => {
                // Gleiche Stufe erneut: keine neue Überblendung, Blink-Phase bleibt
                if level != self.level {
                    self.set_level(level, now_ms);
                }
                let line = if self.verbose {
                    status::verbose_level(self.level)
                } else {
                    status::ack(self.level)
                };
                serial.write_line(&line)
            }
            Command::Pulse => {
                self.blink = None;
                self.animation = Some(Animation::Pulse(Pulse::new(
                    self.level.color(),
                    now_ms,
                    &self.config,
                )));
                if self.verbose {
                    serial.write_line(&status::pulse(self.level))?;
                }
                Ok(())
            }
            Command::ToggleVerbose => {
                self.verbose = !self.verbose;
                serial.write_line(&status::verbose_toggle(self.verbose))
            }
        }
    }

    /// Schreibt den Frame mit Helligkeits-Obergrenze, falls geändert
    ///
    /// Nach einem Fehler bleibt der Frame markiert und wird beim
    /// nächsten Durchlauf erneut geschrieben.
    pub fn flush<L: SmartLedWriter>(&mut self, led: &mut L) -> Result<(), LedError> {
        if !self.dirty {
            return Ok(());
        }
        let mut out = [OFF; N];
        for (dst, src) in out.iter_mut().zip(self.frame.iter()) {
            *dst = dim(*src, self.config.brightness);
        }
        led.write(&out)?;
        self.dirty = false;
        Ok(())
    }

    pub fn level(&self) -> DetectionLevel {
        self.level
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Logischer Frame (volle Skala, ohne Helligkeits-Obergrenze)
    pub fn frame(&self) -> &[RGB8; N] {
        &self.frame
    }

    pub fn displayed_color(&self) -> RGB8 {
        self.displayed
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    pub fn last_activity_ms(&self) -> u64 {
        self.last_activity_ms
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn drain_serial<S: SerialPort>(
        &mut self,
        now_ms: u64,
        serial: &mut S,
    ) -> Result<(), ControllerError> {
        for _ in 0..MAX_BYTES_PER_POLL {
            match serial.read_byte()? {
                Some(byte) => {
                    self.last_activity_ms = now_ms;
                    if let Some(first) = self.parser.push(byte) {
                        self.dispatch(first, now_ms, serial)?;
                    }
                }
                None => {
                    if let Some(first) = self.parser.flush() {
                        self.dispatch(first, now_ms, serial)?;
                    }
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn dispatch<S: SerialPort>(
        &mut self,
        byte: u8,
        now_ms: u64,
        serial: &mut S,
    ) -> Result<(), SerialError> {
        match Command::from_byte(byte) {
            Some(command) => self.handle_command(command, now_ms, serial),
            // Unbekannte Zeichen: keine Zustandsänderung, keine Antwort
            None => Ok(()),
        }
    }

    fn set_level(&mut self, level: DetectionLevel, now_ms: u64) {
        self.level = level;
        self.blink = None;
        self.animation = Some(Animation::Fade(Fade::new(
            self.displayed,
            level.color(),
            now_ms,
            &self.config,
        )));
    }

    fn show(&mut self, color: RGB8) {
        if color == self.displayed {
            return;
        }
        self.displayed = color;
        render_frame(&mut self.frame, color, self.config.pattern);
        self.dirty = true;
    }

    fn advance_animation(&mut self, now_ms: u64) {
        let Some(animation) = self.animation else {
            return;
        };
        let sample = animation.sample(now_ms);
        self.show(sample.color);
        if sample.finished {
            self.animation = None;
            if self.level.blinks() {
                self.blink = Some(Blink::start(now_ms, self.config.blink_interval_ms));
            }
        }
    }

    fn update_blink(&mut self, now_ms: u64) {
        if self.animation.is_some() {
            return;
        }
        let Some(blink) = self.blink.as_mut() else {
            return;
        };
        if blink.update(now_ms) {
            let color = if blink.is_lit() { self.level.color() } else { OFF };
            self.show(color);
        }
    }

    /// Rückfall auf grün nach Stille; greift nur einmal, da die Stufe danach `None` ist
    fn check_idle_timeout<S: SerialPort>(
        &mut self,
        now_ms: u64,
        serial: &mut S,
    ) -> Result<(), SerialError> {
        if self.level == DetectionLevel::None {
            return Ok(());
        }
        if now_ms.saturating_sub(self.last_activity_ms) <= self.config.idle_timeout_ms {
            return Ok(());
        }
        self.set_level(DetectionLevel::None, now_ms);
        if self.verbose {
            serial.write_line(&status::timeout(self.config.idle_timeout_ms))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GREEN, Pattern, RED};

    struct NullSerial;

    impl SerialPort for NullSerial {
        fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
            Ok(None)
        }

        fn write_line(&mut self, _line: &str) -> Result<(), SerialError> {
            Ok(())
        }
    }

    struct NullLed;

    impl SmartLedWriter for NullLed {
        fn write(&mut self, _pixels: &[RGB8]) -> Result<(), LedError> {
            Ok(())
        }
    }

    fn controller() -> DetectionController<1> {
        DetectionController::new(ControllerConfig::DEFAULT.with_pattern(Pattern::Fill))
    }

    #[test]
    fn test_initial_state_is_green() {
        let ctrl = controller();
        assert_eq!(ctrl.level(), DetectionLevel::None);
        assert_eq!(ctrl.frame(), &[GREEN]);
        assert!(!ctrl.is_verbose());
    }

    #[test]
    fn test_set_level_fades_then_blinks() {
        let mut ctrl = controller();
        ctrl.handle_command(
            Command::SetLevel(DetectionLevel::Danger),
            0,
            &mut NullSerial,
        )
        .unwrap();
        assert!(ctrl.is_animating());
        assert!(!ctrl.is_blinking());

        ctrl.poll(300, &mut NullSerial, &mut NullLed).unwrap();
        assert!(!ctrl.is_animating());
        assert!(ctrl.is_blinking());
        assert_eq!(ctrl.displayed_color(), RED);
    }

    #[test]
    fn test_pulse_keeps_level() {
        let mut ctrl = controller();
        ctrl.handle_command(Command::Pulse, 0, &mut NullSerial).unwrap();
        assert_eq!(ctrl.level(), DetectionLevel::None);
        assert!(ctrl.is_animating());
    }

    #[test]
    fn test_unknown_byte_is_ignored() {
        let mut ctrl = controller();
        ctrl.dispatch(b'x', 0, &mut NullSerial).unwrap();
        assert_eq!(ctrl.level(), DetectionLevel::None);
        assert!(!ctrl.is_animating());
    }
}
