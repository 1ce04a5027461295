use eframe::egui;

pub fn distance(a: egui::Pos2, b: egui::Pos2) -> f32 {
    (b - a).length()
}

pub fn midpoint(a: egui::Pos2, b: egui::Pos2) -> egui::Pos2 {
    egui::pos2((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Angle of `v` in degrees, counter-clockwise positive on a y-down screen,
/// in the range (-180, 180].
pub fn screen_angle_degrees(v: egui::Vec2) -> f32 {
    let degrees = (-v.y).atan2(v.x).to_degrees();
    // atan2(-0.0, x < 0) lands on -180
    if degrees <= -180.0 { 180.0 } else { degrees }
}

/// Returns the candidate nearest to `value` that lies strictly within
/// `tolerance`, or `value` itself when none does. Ties keep the earliest
/// candidate.
pub fn snap_axis(value: f32, candidates: impl IntoIterator<Item = f32>, tolerance: f32) -> f32 {
    let mut best: Option<(f32, f32)> = None;
    for c in candidates {
        let d = (c - value).abs();
        if d >= tolerance {
            continue;
        }
        match best {
            Some((best_d, _)) if best_d <= d => {}
            _ => best = Some((d, c)),
        }
    }
    best.map_or(value, |(_, c)| c)
}

/// Axis-aligned bounds of a `size` rectangle rotated by `degrees`.
pub fn rotated_size(size: egui::Vec2, degrees: f32) -> egui::Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    egui::vec2(
        size.x * cos.abs() + size.y * sin.abs(),
        size.x * sin.abs() + size.y * cos.abs(),
    )
}
