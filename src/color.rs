use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues. Used
/// for per-variable boxplot colours and the quality-band series.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous scales
// ---------------------------------------------------------------------------

/// Diverging blue–white–red scale for correlation values in [-1, 1].
pub fn diverging_correlation(r: f64) -> Color32 {
    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let stops = [
        Srgb::new(0.13f32, 0.40, 0.67), // strong negative
        Srgb::new(0.97, 0.97, 0.97),    // no correlation
        Srgb::new(0.70, 0.09, 0.17),    // strong positive
    ];
    lerp_stops(&stops, t)
}

/// Sequential light-to-dark reds for missing-value severity in [0, 1].
pub fn severity(t: f64) -> Color32 {
    let stops = [
        Srgb::new(1.00f32, 0.90, 0.85),
        Srgb::new(0.98, 0.55, 0.38),
        Srgb::new(0.60, 0.05, 0.08),
    ];
    lerp_stops(&stops, t.clamp(0.0, 1.0) as f32)
}

/// Dark-to-bright continuous scale for colouring scatter points by a third
/// column's value, normalised to [0, 1].
pub fn continuous(t: f64) -> Color32 {
    let stops = [
        Srgb::new(0.00f32, 0.01, 0.21),
        Srgb::new(0.45, 0.12, 0.51),
        Srgb::new(0.87, 0.32, 0.33),
        Srgb::new(0.99, 0.75, 0.44),
    ];
    lerp_stops(&stops, t.clamp(0.0, 1.0) as f32)
}

fn lerp_stops(stops: &[Srgb<f32>], t: f32) -> Color32 {
    let segments = stops.len() - 1;
    let scaled = t * segments as f32;
    let idx = (scaled.floor() as usize).min(segments - 1);
    let frac = scaled - idx as f32;

    let a: palette::LinSrgb = stops[idx].into_linear();
    let b: palette::LinSrgb = stops[idx + 1].into_linear();
    let mixed: Srgb = Srgb::from_linear(a.mix(b, frac));
    to_color32(mixed)
}

fn to_color32(rgb: Srgb<f32>) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Apply an opacity in [0, 1] to a colour.
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}
