// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von ampel-core
pub use ampel_core::{
    Command, ControllerConfig, ControllerError, DetectionController, DetectionLevel, LedError,
    SerialError, SerialPort, SmartLedWriter,
};
