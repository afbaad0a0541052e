// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use ampel_core::{ControllerConfig, Pattern};

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung der WS2812B-Matrix
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Obergrenze für die LEDs (0-255)
/// 64 LEDs in voller Helligkeit blenden und ziehen zu viel Strom
pub const LED_BRIGHTNESS: u8 = 50;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs (8×8 Matrix)
pub const LED_COUNT: usize = 64;

/// Darstellung: Kreis in der Matrix-Mitte (für eine einzelne LED: Pattern::Fill)
pub const LED_PATTERN: Pattern = Pattern::Circle;

// ============================================================================
// Serielle Kommando-Leitung
// ============================================================================

/// Baudrate der Kommando-Leitung zum Detection Host
pub const UART_BAUD: u32 = 9600;

/// UART1 RX (Daten vom Host)
pub const UART_RX_GPIO_PIN: u8 = 4;

/// UART1 TX (Quittungen an den Host)
pub const UART_TX_GPIO_PIN: u8 = 5;

// ============================================================================
// Zeitverhalten
// ============================================================================

/// Stille auf der Leitung bis zum Rückfall auf Grün (Millisekunden)
/// Überschreibbar zur Build-Zeit mit AMPEL_IDLE_TIMEOUT_MS in .env,
/// begrenzt auf 1000..=5000 ms
pub const IDLE_TIMEOUT_MS: u64 = match option_env!("AMPEL_IDLE_TIMEOUT_MS") {
    Some(value) => clamp_timeout(parse_u64(value, DEFAULT_IDLE_TIMEOUT_MS)),
    None => DEFAULT_IDLE_TIMEOUT_MS,
};

const DEFAULT_IDLE_TIMEOUT_MS: u64 = 3000;
const MIN_IDLE_TIMEOUT_MS: u64 = 1000;
const MAX_IDLE_TIMEOUT_MS: u64 = 5000;

/// Dauer einer Farb-Überblendung
pub const FADE_DURATION_MS: u64 = 300;

/// Blink-Intervall der Gefahr-Stufe
pub const BLINK_INTERVAL_MS: u64 = 500;

/// Pause zwischen zwei Schleifendurchläufen
pub const LOOP_DELAY_MS: u64 = 10;

/// Verbose-Ausgabe direkt nach dem Start (AMPEL_VERBOSE=1 in .env)
pub const VERBOSE_AT_BOOT: bool = match option_env!("AMPEL_VERBOSE") {
    Some(value) => parse_u64(value, 0) == 1,
    None => false,
};

/// Controller-Konfiguration aus den Konstanten oben
pub const CONTROLLER_CONFIG: ControllerConfig = ControllerConfig::DEFAULT
    .with_brightness(LED_BRIGHTNESS)
    .with_pattern(LED_PATTERN)
    .with_idle_timeout_ms(IDLE_TIMEOUT_MS)
    .with_fade_duration_ms(FADE_DURATION_MS)
    .with_blink_interval_ms(BLINK_INTERVAL_MS)
    .with_verbose(VERBOSE_AT_BOOT);

/// Parst eine Dezimalzahl zur Compile-Zeit
///
/// Ungültige Werte fallen auf `default` zurück.
const fn parse_u64(value: &str, default: u64) -> u64 {
    let bytes = value.as_bytes();
    if bytes.is_empty() {
        return default;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            return default;
        }
        result = result.saturating_mul(10).saturating_add((b - b'0') as u64);
        i += 1;
    }
    result
}

const fn clamp_timeout(ms: u64) -> u64 {
    if ms < MIN_IDLE_TIMEOUT_MS {
        MIN_IDLE_TIMEOUT_MS
    } else if ms > MAX_IDLE_TIMEOUT_MS {
        MAX_IDLE_TIMEOUT_MS
    } else {
        ms
    }
}
