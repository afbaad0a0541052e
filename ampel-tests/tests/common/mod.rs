//! Mock-Implementierungen der Hardware-Traits für Host-Tests

#![allow(dead_code)]

use std::collections::VecDeque;

use ampel_core::{LedError, SerialError, SerialPort, SmartLedWriter};
use rgb::RGB8;

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_frame: Option<Vec<RGB8>>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstes Pixel des zuletzt geschriebenen Frames
    pub fn first_pixel(&self) -> Option<RGB8> {
        self.last_frame.as_ref().and_then(|frame| frame.first().copied())
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_frame = Some(pixels.to_vec());
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Serial Port
// ============================================================================

#[derive(Default)]
pub struct MockSerialPort {
    pub incoming: VecDeque<u8>,
    pub lines: Vec<String>,
    pub fail_next_write: bool,
    /// Nach so vielen erfolgreichen Lesezugriffen schlägt der nächste fehl
    /// (`Some(0)`: gleich der nächste)
    pub fail_read_after: Option<usize>,
}

impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt Bytes in den Empfangspuffer (wie vom Host gesendet)
    pub fn feed(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    /// Alle bisher geschriebenen Zeilen entnehmen
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl SerialPort for MockSerialPort {
    fn read_byte(&mut self) -> Result<Option<u8>, SerialError> {
        match self.fail_read_after {
            Some(0) => {
                self.fail_read_after = None;
                return Err(SerialError::ReadFailed);
            }
            Some(n) => self.fail_read_after = Some(n - 1),
            None => {}
        }
        Ok(self.incoming.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(SerialError::WriteFailed);
        }
        self.lines.push(line.to_string());
        Ok(())
    }
}
