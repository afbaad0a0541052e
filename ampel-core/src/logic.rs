//! Pure Business Logic Functions
//!
//! Farb-Mathematik und Matrix-Geometrie ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::{OFF, Pattern};

/// Kantenlänge der LED-Matrix
pub const GRID_WIDTH: usize = 8;
/// Mittelpunkt des Kreismusters (x = y)
pub const CIRCLE_CENTER: i32 = 3;
/// Radius des Kreismusters
pub const CIRCLE_RADIUS: i32 = 4;

/// Skaliert einen Kanal mit einer Helligkeit (0-255)
fn scale_channel(value: u8, brightness: u8) -> u8 {
    ((value as u16 * brightness as u16) / 255) as u8
}

/// Wendet die Helligkeits-Obergrenze auf eine Farbe an
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use ampel_core::dim;
/// let red = RGB8 { r: 255, g: 0, b: 0 };
/// assert_eq!(dim(red, 50), RGB8 { r: 50, g: 0, b: 0 });
/// ```
pub fn dim(color: RGB8, brightness: u8) -> RGB8 {
    RGB8 {
        r: scale_channel(color.r, brightness),
        g: scale_channel(color.g, brightness),
        b: scale_channel(color.b, brightness),
    }
}

/// Skaliert eine Farbe auf einen Prozentwert (Puls-Animation)
pub fn scale_percent(color: RGB8, percent: u8) -> RGB8 {
    let percent = percent.min(100) as u16;
    RGB8 {
        r: (color.r as u16 * percent / 100) as u8,
        g: (color.g as u16 * percent / 100) as u8,
        b: (color.b as u16 * percent / 100) as u8,
    }
}

fn lerp_channel(from: u8, to: u8, step: u16, steps: u16) -> u8 {
    let delta = to as i32 - from as i32;
    // Integer-Division schneidet Richtung 0 ab, Schritt `steps` trifft exakt `to`
    (from as i32 + delta * step as i32 / steps as i32) as u8
}

/// Lineare Interpolation zwischen zwei Farben
///
/// `step` läuft von 0 (= `from`) bis `steps` (= `to`).
pub fn lerp_color(from: RGB8, to: RGB8, step: u16, steps: u16) -> RGB8 {
    if steps == 0 || step >= steps {
        return to;
    }
    RGB8 {
        r: lerp_channel(from.r, to.r, step, steps),
        g: lerp_channel(from.g, to.g, step, steps),
        b: lerp_channel(from.b, to.b, step, steps),
    }
}

/// Matrix-Koordinate → Pixel-Index (zeilenweise verdrahtet)
pub const fn pixel_index(x: usize, y: usize) -> usize {
    y * GRID_WIDTH + x
}

/// Pixel-Index → Matrix-Koordinate `(x, y)`
pub const fn pixel_coords(index: usize) -> (usize, usize) {
    (index % GRID_WIDTH, index / GRID_WIDTH)
}

/// Liegt `(x, y)` im Kreis um (3,3) mit Radius 4?
///
/// Ganzzahlig ohne Wurzel: `dx² + dy² <= r²`.
pub fn in_circle(x: usize, y: usize) -> bool {
    let dx = x as i32 - CIRCLE_CENTER;
    let dy = y as i32 - CIRCLE_CENTER;
    dx * dx + dy * dy <= CIRCLE_RADIUS * CIRCLE_RADIUS
}

/// Anzahl Pixel der vollen Matrix
pub const GRID_PIXELS: usize = GRID_WIDTH * GRID_WIDTH;

/// Muster, das auf `N` Pixeln tatsächlich dargestellt wird
///
/// Der Kreis braucht die volle 8×8 Matrix, auf jeder anderen Länge
/// (z.B. einer einzelnen LED) wird gefüllt.
pub const fn effective_pattern<const N: usize>(pattern: Pattern) -> Pattern {
    match pattern {
        Pattern::Circle if N == GRID_PIXELS => Pattern::Circle,
        _ => Pattern::Fill,
    }
}

/// Berechnet einen Frame für die Basisfarbe
///
/// Bei `Pattern::Circle` bleiben Pixel außerhalb des Kreises aus.
/// Die Helligkeit wird erst beim Schreiben angewendet.
pub fn render_frame<const N: usize>(frame: &mut [RGB8; N], color: RGB8, pattern: Pattern) {
    let pattern = effective_pattern::<N>(pattern);
    for (index, pixel) in frame.iter_mut().enumerate() {
        *pixel = match pattern {
            Pattern::Fill => color,
            Pattern::Circle => {
                let (x, y) = pixel_coords(index);
                if in_circle(x, y) { color } else { OFF }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GREEN, ORANGE, RED};

    #[test]
    fn test_dim_full_and_zero() {
        assert_eq!(dim(RED, 255), RED);
        assert_eq!(dim(RED, 0), OFF);
    }

    #[test]
    fn test_dim_default_brightness() {
        assert_eq!(dim(ORANGE, 50), RGB8 { r: 50, g: 19, b: 0 });
    }

    #[test]
    fn test_scale_percent() {
        assert_eq!(scale_percent(GREEN, 100), GREEN);
        assert_eq!(scale_percent(GREEN, 20), RGB8 { r: 0, g: 51, b: 0 });
        assert_eq!(scale_percent(GREEN, 150), GREEN);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_color(GREEN, RED, 0, 20), GREEN);
        assert_eq!(lerp_color(GREEN, RED, 20, 20), RED);
        assert_eq!(lerp_color(GREEN, RED, 10, 20), RGB8 { r: 127, g: 128, b: 0 });
    }

    #[test]
    fn test_lerp_zero_steps_jumps_to_target() {
        assert_eq!(lerp_color(GREEN, RED, 0, 0), RED);
    }

    #[test]
    fn test_pixel_index_corners() {
        assert_eq!(pixel_index(0, 0), 0);
        assert_eq!(pixel_index(7, 0), 7);
        assert_eq!(pixel_index(0, 1), 8);
        assert_eq!(pixel_index(7, 7), 63);
    }

    #[test]
    fn test_pixel_coords_inverse() {
        for index in 0..64 {
            let (x, y) = pixel_coords(index);
            assert_eq!(pixel_index(x, y), index);
        }
    }

    #[test]
    fn test_circle_edges() {
        assert!(in_circle(3, 3));
        assert!(in_circle(7, 3)); // Abstand genau 4
        assert!(in_circle(3, 7));
        assert!(!in_circle(0, 0));
        assert!(!in_circle(7, 7));
        assert!(!in_circle(6, 7)); // 3² + 4² = 25
    }

    #[test]
    fn test_render_fill() {
        let mut frame = [OFF; 4];
        render_frame(&mut frame, RED, Pattern::Fill);
        assert!(frame.iter().all(|p| *p == RED));
    }

    #[test]
    fn test_circle_needs_full_matrix() {
        assert_eq!(effective_pattern::<64>(Pattern::Circle), Pattern::Circle);
        assert_eq!(effective_pattern::<1>(Pattern::Circle), Pattern::Fill);
        assert_eq!(effective_pattern::<16>(Pattern::Circle), Pattern::Fill);
        assert_eq!(effective_pattern::<64>(Pattern::Fill), Pattern::Fill);

        let mut single = [OFF; 1];
        render_frame(&mut single, GREEN, Pattern::Circle);
        assert_eq!(single, [GREEN]);
    }
}
