// Task-Modul: Enthält den Embassy Task der Ampel
//
// Ein einziger kooperativer Polling-Loop: serielle Leitung lesen,
// Animationen weiterschalten, Idle-Timeout prüfen, kurz schlafen.

pub mod ampel;

// Re-export Tasks für einfachen Import
pub use ampel::ampel_task;
