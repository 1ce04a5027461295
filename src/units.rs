/// Screen pixels per real-world unit (inch).
pub const PIXELS_PER_UNIT: f32 = 4.0;

/// Pixel length to whole units, truncating toward zero.
pub fn to_units_truncated(px: f32) -> i32 {
    (px / PIXELS_PER_UNIT).trunc() as i32
}

/// Pixel length to whole units, rounding down.
pub fn to_units_floor(px: f32) -> i32 {
    (px / PIXELS_PER_UNIT).floor() as i32
}

pub fn label(units: i32) -> String {
    format!("{units}\"")
}
