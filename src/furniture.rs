use crate::assets::{self, FurnitureArt, Raster};
use crate::geometry::{rotated_size, screen_angle_degrees};
use crate::units;
use eframe::egui;
use std::sync::Arc;

/// Smallest width a piece can be resized to, exclusive.
pub const MIN_FURNITURE_WIDTH: f32 = 15.0;
pub const ROTATION_SNAP_DEGREES: f32 = 10.0;
/// Scale gain for the rotate gesture, relative to the reference width.
const ROTATE_SCALE_GAIN: f32 = 3.1;
/// Longest side a derived raster may have; stays within the smallest GPU
/// texture limit egui backends report.
pub const MAX_RASTER_SIDE: f32 = 2048.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FurnitureKind {
    Bed,
    Desk,
    Nightstand,
    Rug,
    Dresser,
    Chair,
    Tv,
    Lamp,
    Door,
    Window,
}

impl FurnitureKind {
    /// Palette order.
    pub const ALL: [FurnitureKind; 10] = [
        FurnitureKind::Bed,
        FurnitureKind::Desk,
        FurnitureKind::Nightstand,
        FurnitureKind::Rug,
        FurnitureKind::Dresser,
        FurnitureKind::Chair,
        FurnitureKind::Tv,
        FurnitureKind::Lamp,
        FurnitureKind::Door,
        FurnitureKind::Window,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            FurnitureKind::Bed => "Bed",
            FurnitureKind::Desk => "Desk",
            FurnitureKind::Nightstand => "Nightstand",
            FurnitureKind::Rug => "Rug",
            FurnitureKind::Dresser => "Dresser",
            FurnitureKind::Chair => "Chair",
            FurnitureKind::Tv => "TV",
            FurnitureKind::Lamp => "Lamp",
            FurnitureKind::Door => "Door",
            FurnitureKind::Window => "Window",
        }
    }

    pub fn asset_file(self) -> String {
        format!("{}.png", self.label())
    }

    /// Scale applied to the source art when a new piece is placed.
    pub fn spawn_scale(self) -> f32 {
        match self {
            FurnitureKind::Bed => 0.47,
            FurnitureKind::Desk => 0.25,
            FurnitureKind::Nightstand => 0.23,
            FurnitureKind::Rug => 0.24,
            FurnitureKind::Dresser => 0.33,
            _ => 0.32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardinalAngle {
    Deg0,
    Deg90,
    Deg180,
    DegNeg90,
}

impl CardinalAngle {
    pub const ALL: [CardinalAngle; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::DegNeg90];

    /// Exact match only; callers snap first.
    pub fn from_degrees(degrees: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.degrees() == degrees)
    }

    pub fn degrees(self) -> f32 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg90 => 90.0,
            Self::Deg180 => 180.0,
            Self::DegNeg90 => -90.0,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Snaps a raw angle in (-180, 180] to the cardinal direction whose
/// tolerance band contains it; angles outside every band are kept.
pub fn snap_to_cardinal(degrees: f32) -> f32 {
    let tol = ROTATION_SNAP_DEGREES;
    if (-tol..tol).contains(&degrees) {
        0.0
    } else if (90.0 - tol..90.0 + tol).contains(&degrees) {
        90.0
    } else if degrees >= 180.0 - tol || degrees < -180.0 + tol {
        180.0
    } else if (-90.0 - tol..-90.0 + tol).contains(&degrees) {
        -90.0
    } else {
        degrees
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Rotate,
    Delete,
    Width,
    Height,
}

impl HandleKind {
    pub const ALL: [HandleKind; 4] = [
        HandleKind::Rotate,
        HandleKind::Delete,
        HandleKind::Width,
        HandleKind::Height,
    ];

    pub fn asset_file(self) -> &'static str {
        match self {
            HandleKind::Rotate => "rotate_arrow.png",
            HandleKind::Delete => "red_x_circle.png",
            HandleKind::Width => "width_arrow.png",
            HandleKind::Height => "height_arrow.png",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleSizes {
    pub rotate: egui::Vec2,
    pub delete: egui::Vec2,
    pub width: egui::Vec2,
    pub height: egui::Vec2,
}

impl Default for HandleSizes {
    fn default() -> Self {
        let s = egui::vec2(24.0, 24.0);
        Self {
            rotate: s,
            delete: s,
            width: s,
            height: s,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleRects {
    pub rotate: egui::Rect,
    pub delete: egui::Rect,
    pub width: egui::Rect,
    pub height: egui::Rect,
}

impl HandleRects {
    pub fn get(&self, kind: HandleKind) -> egui::Rect {
        match kind {
            HandleKind::Rotate => self.rotate,
            HandleKind::Delete => self.delete,
            HandleKind::Width => self.width,
            HandleKind::Height => self.height,
        }
    }
}

/// One placed piece of furniture.
#[derive(Clone, Debug)]
pub struct Furniture {
    pub id: u64,
    art: Arc<FurnitureArt>,
    rect: egui::Rect,
    angle: f32,
    raster: Raster,
}

impl Furniture {
    /// Places the kind's art, reduced by its spawn scale, centered on `center`.
    pub fn new(id: u64, art: Arc<FurnitureArt>, center: egui::Pos2) -> Self {
        let base = art.base();
        let scale = art.kind.spawn_scale();
        let w = ((base.width() as f32 * scale).round() as u32).max(1);
        let h = ((base.height() as f32 * scale).round() as u32).max(1);
        let raster = Raster::new(assets::stretch(base, w, h));
        let rect = egui::Rect::from_center_size(center, raster.size());
        Self {
            id,
            art,
            rect,
            angle: 0.0,
            raster,
        }
    }

    /// Places the unrotated art stretched to exactly `rect`.
    #[cfg(test)]
    pub fn with_rect(id: u64, art: Arc<FurnitureArt>, rect: egui::Rect) -> Self {
        let raster = Raster::new(assets::stretch(
            art.base(),
            rect.width().round() as u32,
            rect.height().round() as u32,
        ));
        Self {
            id,
            art,
            rect,
            angle: 0.0,
            raster,
        }
    }

    pub fn kind(&self) -> FurnitureKind {
        self.art.kind
    }

    pub fn rect(&self) -> egui::Rect {
        self.rect
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn cardinal(&self) -> Option<CardinalAngle> {
        CardinalAngle::from_degrees(self.angle)
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn contains(&self, pos: egui::Pos2) -> bool {
        self.rect.contains(pos)
    }

    pub fn translate(&mut self, delta: egui::Vec2) {
        self.rect = self.rect.translate(delta);
    }

    /// Points the piece at `pointer`: the angle follows the center-to-pointer
    /// vector (snapped near cardinals) and the size follows its length
    /// relative to `reference_width`. Always re-derived from the source art.
    pub fn rotate_towards(&mut self, pointer: egui::Pos2, reference_width: f32) {
        let center = self.rect.center();
        let v = pointer - center;
        self.angle = snap_to_cardinal(screen_angle_degrees(v));
        let bounds = rotated_size(art_size(self.art.base()), self.angle);
        let scale = (ROTATE_SCALE_GAIN * v.length() / reference_width)
            .abs()
            .min(MAX_RASTER_SIDE / bounds.max_elem().max(1.0));
        self.raster = Raster::new(assets::rotozoom(self.art.base(), self.angle, scale));
        self.rect = egui::Rect::from_center_size(center, self.raster.size());
    }

    /// Returns false, leaving the piece untouched, when the new width would
    /// not exceed the minimum.
    pub fn resize_width(&mut self, dx: f32) -> bool {
        if self.rect.width() + dx <= MIN_FURNITURE_WIDTH {
            return false;
        }
        self.rect.max.x += dx;
        self.restretch();
        true
    }

    /// Grows or shrinks from the top edge, keeping the bottom edge fixed.
    /// Returns false when the height would drop to zero or below.
    pub fn resize_height(&mut self, dy: f32) -> bool {
        if self.rect.height() - dy <= 0.0 {
            return false;
        }
        self.rect.min.y += dy;
        self.restretch();
        true
    }

    fn restretch(&mut self) {
        // Free angles keep their raster; it is painted stretched into the rect.
        let Some(cardinal) = self.cardinal() else {
            return;
        };
        self.raster = Raster::new(assets::stretch(
            self.art.oriented(cardinal),
            self.rect.width().round() as u32,
            self.rect.height().round() as u32,
        ));
    }

    pub fn handles(&self, sizes: &HandleSizes) -> HandleRects {
        let r = self.rect;
        HandleRects {
            rotate: egui::Rect::from_min_size(r.right_bottom(), sizes.rotate),
            delete: egui::Rect::from_min_size(
                egui::pos2(r.max.x, r.min.y - sizes.delete.y),
                sizes.delete,
            ),
            width: egui::Rect::from_min_size(
                egui::pos2(r.max.x, r.center().y - sizes.width.y * 0.5),
                sizes.width,
            ),
            height: egui::Rect::from_min_size(
                egui::pos2(r.center().x - sizes.height.x * 0.5, r.min.y - sizes.height.y),
                sizes.height,
            ),
        }
    }

    pub fn width_units(&self) -> i32 {
        units::to_units_floor(self.rect.width())
    }

    pub fn height_units(&self) -> i32 {
        units::to_units_floor(self.rect.height())
    }
}

fn art_size(image: &image::RgbaImage) -> egui::Vec2 {
    egui::vec2(image.width() as f32, image.height() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn art(kind: FurnitureKind, w: u32, h: u32) -> Arc<FurnitureArt> {
        Arc::new(FurnitureArt::new(kind, RgbaImage::new(w, h)))
    }

    fn desk_100x50() -> Furniture {
        Furniture::with_rect(
            1,
            art(FurnitureKind::Desk, 400, 200),
            egui::Rect::from_min_size(egui::pos2(300.0, 300.0), egui::vec2(100.0, 50.0)),
        )
    }

    #[test]
    fn snap_bands() {
        for a in [0.0, 90.0, 180.0, -90.0] {
            assert_eq!(snap_to_cardinal(a), a);
        }
        assert_eq!(snap_to_cardinal(87.0), 90.0);
        assert_eq!(snap_to_cardinal(-10.0), 0.0);
        assert_eq!(snap_to_cardinal(9.9), 0.0);
        assert_eq!(snap_to_cardinal(10.0), 10.0);
        assert_eq!(snap_to_cardinal(80.0), 90.0);
        assert_eq!(snap_to_cardinal(100.0), 100.0);
        assert_eq!(snap_to_cardinal(170.0), 180.0);
        assert_eq!(snap_to_cardinal(-175.0), 180.0);
        assert_eq!(snap_to_cardinal(-170.0), -170.0);
        assert_eq!(snap_to_cardinal(-100.0), -90.0);
        assert_eq!(snap_to_cardinal(-80.0), -80.0);
        assert_eq!(snap_to_cardinal(45.0), 45.0);
    }

    #[test]
    fn spawn_uses_kind_scale() {
        let f = Furniture::new(7, art(FurnitureKind::Bed, 100, 200), egui::pos2(500.0, 400.0));
        assert_eq!(f.rect().size(), egui::vec2(47.0, 94.0));
        assert_eq!(f.rect().center(), egui::pos2(500.0, 400.0));
        assert_eq!(f.cardinal(), Some(CardinalAngle::Deg0));
        assert_eq!(f.kind(), FurnitureKind::Bed);
    }

    #[test]
    fn width_resize_rejects_floor() {
        let mut f = desk_100x50();
        let before = f.raster().generation();
        assert!(!f.resize_width(-400.0));
        assert_eq!(f.rect().width(), 100.0);
        assert_eq!(f.raster().generation(), before);
        assert!(!f.resize_width(-85.0));
        assert_eq!(f.rect().width(), 100.0);
        assert!(f.resize_width(-84.0));
        assert_eq!(f.rect().width(), 16.0);
        assert!(f.resize_width(30.0));
        assert_eq!(f.rect().width(), 46.0);
        assert_eq!(f.raster().image().dimensions(), (46, 50));
    }

    #[test]
    fn height_resize_keeps_bottom() {
        let mut f = desk_100x50();
        let bottom = f.rect().bottom();
        assert!(f.resize_height(20.0));
        assert_eq!(f.rect().height(), 30.0);
        assert_eq!(f.rect().bottom(), bottom);
        assert!(f.resize_height(-45.0));
        assert_eq!(f.rect().height(), 75.0);
        assert_eq!(f.rect().bottom(), bottom);
        assert!(!f.resize_height(75.0));
        assert_eq!(f.rect().height(), 75.0);
        assert_eq!(f.rect().bottom(), bottom);
    }

    #[test]
    fn rotate_snaps_and_rederives_from_source() {
        let mut f = desk_100x50();
        let center = f.rect().center();
        let (sin, cos) = 87f32.to_radians().sin_cos();
        let pointer = center + egui::vec2(cos, -sin) * 150.0;
        f.rotate_towards(pointer, 1500.0);
        assert_eq!(f.angle(), 90.0);
        assert_eq!(f.cardinal(), Some(CardinalAngle::Deg90));
        // scale 3.1 * 150 / 1500 = 0.31 of the 400x200 source, turned upright
        assert_eq!(f.raster().image().dimensions(), (62, 124));
        assert_eq!(f.rect().center(), center);
        assert_eq!(f.rect().size(), egui::vec2(62.0, 124.0));
    }

    #[test]
    fn rotate_far_from_piece_caps_raster_size() {
        let mut f = desk_100x50();
        let center = f.rect().center();
        f.rotate_towards(center + egui::vec2(30_000.0, 0.0), 1500.0);
        let (w, h) = f.raster().image().dimensions();
        assert!(w as f32 <= MAX_RASTER_SIDE && h as f32 <= MAX_RASTER_SIDE);
        assert_eq!(w as f32, MAX_RASTER_SIDE);
    }

    #[test]
    fn rotate_keeps_free_angle() {
        let mut f = desk_100x50();
        let center = f.rect().center();
        f.rotate_towards(center + egui::vec2(100.0, -100.0), 1500.0);
        assert!((f.angle() - 45.0).abs() < 1e-3);
        assert_eq!(f.cardinal(), None);
        let raster = f.raster().generation();
        assert!(f.resize_width(10.0));
        assert_eq!(f.raster().generation(), raster);
    }

    #[test]
    fn resize_after_rotation_uses_oriented_art() {
        let mut f = desk_100x50();
        let center = f.rect().center();
        f.rotate_towards(center + egui::vec2(0.0, 200.0), 1500.0);
        assert_eq!(f.cardinal(), Some(CardinalAngle::DegNeg90));
        let h = f.rect().height();
        assert!(f.resize_width(5.0));
        let (w, rh) = f.raster().image().dimensions();
        assert_eq!(w as f32, f.rect().width().round());
        assert_eq!(rh as f32, h.round());
    }

    #[test]
    fn handles_sit_outside_edges() {
        let f = desk_100x50();
        let h = f.handles(&HandleSizes::default());
        let r = f.rect();
        assert_eq!(h.rotate.min, r.right_bottom());
        assert_eq!(h.delete.left_bottom(), r.right_top());
        assert_eq!(h.width.left_center(), r.right_center());
        assert_eq!(h.height.center_bottom(), r.center_top());
        assert_eq!(h.get(HandleKind::Delete), h.delete);
    }

    #[test]
    fn dimension_units_floor() {
        let f = desk_100x50();
        assert_eq!(f.width_units(), 25);
        assert_eq!(f.height_units(), 12);
    }
}
