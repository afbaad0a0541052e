//! Kommando-Sender für die Ampel
//!
//! Gleiche Stufen-Kommandos hintereinander werden nur im Abstand von
//! `KEEP_ALIVE` wiederholt. So fällt die Ampel bei andauernder Detektion
//! nicht per Idle-Timeout auf Grün zurück, die Leitung wird aber nicht mit
//! einem Byte pro Frame geflutet. Grün wird nie wiederholt, der Timeout
//! führt ohnehin dorthin. Puls- und Verbose-Kommandos gehen immer raus.

use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use ampel_core::status::{STATUS_CAPACITY, parse_ack};
use ampel_core::{Command, DetectionLevel};
use log::{debug, info, warn};

use crate::LinkResult;

/// Wiederholungs-Intervall für eine unveränderte Stufe
///
/// Muss unter dem kleinsten Idle-Timeout der Ampel (1000 ms) liegen.
pub const KEEP_ALIVE: Duration = Duration::from_millis(500);

/// Obergrenze für eine Antwortzeile ohne Zeilenende
pub const MAX_PARTIAL_LINE: usize = STATUS_CAPACITY * 4;

pub struct DetectionLink<P> {
    port: P,
    /// Zuletzt gesendete Stufe; die Ampel startet grün
    last_level: DetectionLevel,
    /// Zeitpunkt des letzten gesendeten Stufen-Kommandos
    last_sent: Option<Instant>,
    keep_alive: Duration,
    /// Angefangene Antwortzeile ohne Zeilenende
    partial: Vec<u8>,
}

impl<P> DetectionLink<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            last_level: DetectionLevel::None,
            last_sent: None,
            keep_alive: KEEP_ALIVE,
            partial: Vec::new(),
        }
    }

    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn last_level(&self) -> DetectionLevel {
        self.last_level
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    /// Muss `level` zum Zeitpunkt `now` gesendet werden?
    fn needs_send(&self, level: DetectionLevel, now: Instant) -> bool {
        if level != self.last_level {
            return true;
        }
        if level == DetectionLevel::None {
            return false;
        }
        match self.last_sent {
            Some(sent) => now.saturating_duration_since(sent) >= self.keep_alive,
            None => true,
        }
    }
}

impl<P: Write> DetectionLink<P> {
    /// Sendet ein Kommando als einzelnes Byte
    ///
    /// Gibt `false` zurück, wenn ein Stufen-Kommando unterdrückt wurde.
    pub fn send(&mut self, command: Command) -> LinkResult<bool> {
        self.send_at(command, Instant::now())
    }

    /// Wie `send`, mit explizitem Zeitpunkt für die Wiederholungs-Logik
    pub fn send_at(&mut self, command: Command, now: Instant) -> LinkResult<bool> {
        if let Command::SetLevel(level) = command {
            if !self.needs_send(level, now) {
                return Ok(false);
            }
        }

        self.port.write_all(&[command.as_byte()])?;
        self.port.flush()?;

        if let Command::SetLevel(level) = command {
            if level == self.last_level {
                debug!("Kommando wiederholt: {}", command.as_byte() as char);
            } else {
                info!("Kommando gesendet: {}", command.as_byte() as char);
            }
            self.last_level = level;
            self.last_sent = Some(now);
        } else {
            info!("Kommando gesendet: {}", command.as_byte() as char);
        }
        Ok(true)
    }

    pub fn set_level(&mut self, level: DetectionLevel) -> LinkResult<bool> {
        self.send(Command::SetLevel(level))
    }

    /// Grün (keine Detektion)
    pub fn set_green(&mut self) -> LinkResult<bool> {
        self.set_level(DetectionLevel::None)
    }

    /// Orange (Detektion)
    pub fn set_orange(&mut self) -> LinkResult<bool> {
        self.set_level(DetectionLevel::Warn)
    }

    /// Rot (Gefahr)
    pub fn set_red(&mut self) -> LinkResult<bool> {
        self.set_level(DetectionLevel::Danger)
    }

    pub fn pulse(&mut self) -> LinkResult<bool> {
        self.send(Command::Pulse)
    }

    pub fn toggle_verbose(&mut self) -> LinkResult<bool> {
        self.send(Command::ToggleVerbose)
    }

    /// Meldet die Anzahl erkannter Zielobjekte eines Frames
    pub fn report_count(&mut self, count: usize) -> LinkResult<bool> {
        self.report_count_at(count, Instant::now())
    }

    pub fn report_count_at(&mut self, count: usize, now: Instant) -> LinkResult<bool> {
        self.send_at(Command::SetLevel(DetectionLevel::from_count(count)), now)
    }
}

impl<P: Read> DetectionLink<P> {
    /// Liest alle anliegenden Antwortzeilen und gibt die Quittungen zurück
    ///
    /// Ein Timeout des Ports beendet das Lesen und ist kein Fehler.
    /// Eine Zeile ohne Zeilenende über `MAX_PARTIAL_LINE` wird verworfen.
    pub fn read_acks(&mut self) -> LinkResult<Vec<DetectionLevel>> {
        let mut acks = Vec::new();
        let mut chunk = [0u8; 64];
        loop {
            match self.port.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    self.partial.extend_from_slice(&chunk[..n]);
                    self.take_lines(&mut acks);
                    if self.partial.len() > MAX_PARTIAL_LINE {
                        warn!(
                            "Antwortzeile ohne Zeilenende verworfen ({} Bytes)",
                            self.partial.len()
                        );
                        self.partial.clear();
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    break;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(acks)
    }

    fn take_lines(&mut self, acks: &mut Vec<DetectionLevel>) {
        while let Some(end) = self.partial.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=end).collect();
            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end();
            debug!("Ampel: {}", text);
            if let Some(level) = parse_ack(text) {
                acks.push(level);
            }
        }
    }
}
