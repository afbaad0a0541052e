//! Ampel Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Pure Functions und die Zustandsmaschine
//! der Detektions-Ampel (serielles Kommando → LED-Zustand).

#![no_std]

pub mod animation;
pub mod controller;
pub mod logic;
pub mod parser;
pub mod status;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use animation::{Blink, Fade, Pulse, Sample};
pub use controller::DetectionController;
pub use logic::{
    dim, effective_pattern, in_circle, lerp_color, pixel_coords, pixel_index, render_frame,
    scale_percent,
};
pub use parser::CommandParser;
pub use traits::{ControllerError, LedError, SerialError, SerialPort, SmartLedWriter};
pub use types::{Command, ControllerConfig, DetectionLevel, GREEN, OFF, ORANGE, Pattern, RED};
