use palette::Srgb;

pub type Color = Srgb<u8>;

/// Start of the cool middle band, in normalized radius.
pub const COOL_BAND: f32 = 0.3;
/// Start of the outer band, in normalized radius.
pub const OUTER_BAND: f32 = 0.7;

/// Maps a normalized radius to the color of its band.
///
/// - below 0.3: pale yellow core, blue rising from 100 to 155
/// - 0.3 up to 0.7: blue disk, red fading out and green rising
/// - 0.7 and above: violet rim, red rising from 80 to 207
///
/// Inputs outside of `[0, 1]` extrapolate the nearest band and every channel is
/// clamped, so radius jitter can never wrap a channel around.
pub fn band_color(normalized_radius: f32) -> Color {
    let t = normalized_radius;
    if t < COOL_BAND {
        let x = t / COOL_BAND;
        Srgb::new(200, 200, channel(100.0 + 55.0 * x))
    } else if t < OUTER_BAND {
        let x = (t - COOL_BAND) / (OUTER_BAND - COOL_BAND);
        Srgb::new(channel(100.0 * (1.0 - x)), channel(100.0 + 55.0 * x), 200)
    } else {
        let x = (t - OUTER_BAND) / (1.0 - OUTER_BAND);
        Srgb::new(channel(80.0 + 127.0 * x), 0, 180)
    }
}

fn channel(value: f32) -> u8 {
    // NaN saturates to 0 on the cast
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        (color.red, color.green, color.blue)
    }

    #[test]
    fn band_endpoints() {
        assert_eq!(rgb(band_color(0.0)), (200, 200, 100));
        assert_eq!(rgb(band_color(0.3)), (100, 100, 200));
        assert_eq!(rgb(band_color(0.7)), (80, 0, 180));
        assert_eq!(rgb(band_color(1.0)), (207, 0, 180));
    }

    #[test]
    fn band_interior() {
        assert_eq!(rgb(band_color(0.15)), (200, 200, 127));
        let mid = band_color(0.5);
        assert!((49..=50).contains(&mid.red));
        assert_eq!((mid.green, mid.blue), (127, 200));
    }

    #[test]
    fn extreme_inputs_do_not_wrap() {
        // far out of range on both sides
        assert_eq!(rgb(band_color(-10.0)), (200, 200, 0));
        assert_eq!(rgb(band_color(10.0)), (255, 0, 180));
        assert_eq!(rgb(band_color(1.1)).0, 249);
        assert_eq!(rgb(band_color(f32::NAN)).0, 0);
    }

    #[test]
    fn just_below_boundaries_stays_in_lower_band() {
        let below_cool = band_color(COOL_BAND - f32::EPSILON);
        assert_eq!((below_cool.red, below_cool.green), (200, 200));
        assert!(below_cool.blue >= 154);

        let below_outer = band_color(OUTER_BAND - f32::EPSILON);
        assert_eq!(below_outer.blue, 200);
        assert!(below_outer.red <= 1);
    }
}
