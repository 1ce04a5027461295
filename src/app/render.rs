use crate::assets::{HandleIcons, Raster};
use crate::furniture::{Furniture, HandleKind, HandleSizes};
use crate::geometry::midpoint;
use crate::model::{Room, VERTEX_RADIUS, WallPolygon};
use crate::units;
use eframe::egui;
use std::collections::{HashMap, HashSet};

use super::interaction::Chrome;

pub(super) const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(250, 250, 245);
const GRID_COLOR: egui::Color32 = egui::Color32::from_rgb(225, 225, 225);
const WALL_COLOR: egui::Color32 = egui::Color32::BLACK;
const VERTEX_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 90, 90);
const DIMENSION_TEXT: egui::Color32 = egui::Color32::from_rgb(100, 100, 100);
const BRACKET_COLOR: egui::Color32 = egui::Color32::from_rgb(50, 50, 50);
const DIMENSION_TEXT_SIZE: f32 = 18.0;
const BRACKET_GAP: f32 = 14.0;
const BRACKET_TICK: f32 = 8.0;

/// Identifies a GPU texture slot for an image drawn every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ImageSlot {
    Furniture(u64),
    Handle(HandleKind),
}

/// Drawing primitives the scene needs. Coordinates are canvas pixels.
pub(crate) trait Surface {
    fn line(&mut self, a: egui::Pos2, b: egui::Pos2, stroke: egui::Stroke);
    fn rounded_rect(&mut self, rect: egui::Rect, radius: f32, color: egui::Color32);
    fn image(&mut self, slot: ImageSlot, raster: &Raster, rect: egui::Rect);
    fn text(&mut self, pos: egui::Pos2, text: &str, size: f32, color: egui::Color32);
}

pub(crate) trait Paint {
    fn paint(&self, surface: &mut dyn Surface);
}

pub(crate) struct Grid {
    pub area: egui::Rect,
    pub spacing: f32,
}

impl Paint for Grid {
    fn paint(&self, surface: &mut dyn Surface) {
        if self.spacing <= 0.0 {
            return;
        }
        let stroke = egui::Stroke::new(1.0, GRID_COLOR);
        let mut y = self.area.min.y;
        while y <= self.area.max.y {
            surface.line(egui::pos2(self.area.min.x, y), egui::pos2(self.area.max.x, y), stroke);
            y += self.spacing;
        }
        let mut x = self.area.min.x;
        while x <= self.area.max.x {
            surface.line(egui::pos2(x, self.area.min.y), egui::pos2(x, self.area.max.y), stroke);
            x += self.spacing;
        }
    }
}

impl Paint for WallPolygon {
    fn paint(&self, surface: &mut dyn Surface) {
        let stroke = egui::Stroke::new(1.0, WALL_COLOR);
        for (a, b) in self.edges() {
            surface.line(a, b, stroke);
        }
        for vertex in self.vertices() {
            surface.rounded_rect(vertex.handle_rect(), VERTEX_RADIUS, VERTEX_COLOR);
        }
    }
}

pub(crate) struct WallDimensions<'a>(pub &'a WallPolygon);

impl Paint for WallDimensions<'_> {
    fn paint(&self, surface: &mut dyn Surface) {
        let walls = self.0;
        for (i, (a, b)) in walls.edges().enumerate() {
            let at = midpoint(a, b) + egui::vec2(4.0, -21.0);
            let label = units::label(walls.edge_length(i));
            surface.text(at, &label, DIMENSION_TEXT_SIZE, DIMENSION_TEXT);
        }
    }
}

impl Paint for Furniture {
    fn paint(&self, surface: &mut dyn Surface) {
        surface.image(ImageSlot::Furniture(self.id), self.raster(), self.rect());
    }
}

/// Handle icons and dimension brackets for the selected piece.
pub(crate) struct FurnitureOverlay<'a> {
    pub piece: &'a Furniture,
    pub icons: &'a HandleIcons,
    pub sizes: &'a HandleSizes,
}

impl Paint for FurnitureOverlay<'_> {
    fn paint(&self, surface: &mut dyn Surface) {
        let rects = self.piece.handles(self.sizes);
        for kind in HandleKind::ALL {
            surface.image(ImageSlot::Handle(kind), self.icons.get(kind), rects.get(kind));
        }

        let r = self.piece.rect();
        let stroke = egui::Stroke::new(1.0, BRACKET_COLOR);

        let y = r.bottom() + BRACKET_GAP;
        let tick = r.bottom() + BRACKET_TICK;
        surface.text(
            egui::pos2(r.center().x - 8.0, y),
            &units::label(self.piece.width_units()),
            DIMENSION_TEXT_SIZE,
            DIMENSION_TEXT,
        );
        surface.line(egui::pos2(r.left(), y), egui::pos2(r.right(), y), stroke);
        surface.line(egui::pos2(r.left(), y), egui::pos2(r.left(), tick), stroke);
        surface.line(egui::pos2(r.right(), y), egui::pos2(r.right(), tick), stroke);

        let x = r.left() - BRACKET_GAP;
        let tick = r.left() - BRACKET_TICK;
        surface.text(
            egui::pos2(r.left() - 40.0, r.center().y - 10.0),
            &units::label(self.piece.height_units()),
            DIMENSION_TEXT_SIZE,
            DIMENSION_TEXT,
        );
        surface.line(egui::pos2(x, r.top()), egui::pos2(x, r.bottom()), stroke);
        surface.line(egui::pos2(x, r.top()), egui::pos2(tick, r.top()), stroke);
        surface.line(egui::pos2(x, r.bottom()), egui::pos2(tick, r.bottom()), stroke);
    }
}

/// Paints the whole room from scratch, back to front.
pub(crate) fn compose_scene(
    surface: &mut dyn Surface,
    room: &Room,
    chrome: &Chrome,
    icons: &HandleIcons,
    grid: &Grid,
) {
    if chrome.show_grid {
        grid.paint(surface);
    }
    room.walls.paint(surface);
    WallDimensions(&room.walls).paint(surface);
    for piece in &room.furniture {
        piece.paint(surface);
    }
    if chrome.show_overlay {
        if let Some(piece) = room.topmost() {
            FurnitureOverlay {
                piece,
                icons,
                sizes: &room.handle_sizes,
            }
            .paint(surface);
        }
    }
}

/// GPU copies of rasters, refreshed when a raster's generation changes and
/// dropped when a frame no longer draws them.
#[derive(Default)]
pub(super) struct TextureCache {
    entries: HashMap<ImageSlot, (u64, egui::TextureHandle)>,
    touched: HashSet<ImageSlot>,
}

impl TextureCache {
    pub(super) fn texture(
        &mut self,
        ctx: &egui::Context,
        slot: ImageSlot,
        raster: &Raster,
    ) -> egui::TextureId {
        self.touched.insert(slot);
        if let Some((generation, handle)) = self.entries.get(&slot) {
            if *generation == raster.generation() {
                return handle.id();
            }
        }
        let handle = ctx.load_texture(
            format!("{slot:?}"),
            color_image(raster.image()),
            egui::TextureOptions::LINEAR,
        );
        let id = handle.id();
        self.entries.insert(slot, (raster.generation(), handle));
        id
    }

    pub(super) fn end_frame(&mut self) {
        let touched = std::mem::take(&mut self.touched);
        self.entries.retain(|slot, _| touched.contains(slot));
    }
}

pub(super) fn color_image(image: &image::RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

pub(super) struct PainterSurface<'a> {
    pub painter: &'a egui::Painter,
    pub origin: egui::Vec2,
    pub textures: &'a mut TextureCache,
}

impl Surface for PainterSurface<'_> {
    fn line(&mut self, a: egui::Pos2, b: egui::Pos2, stroke: egui::Stroke) {
        self.painter
            .line_segment([a + self.origin, b + self.origin], stroke);
    }

    fn rounded_rect(&mut self, rect: egui::Rect, radius: f32, color: egui::Color32) {
        self.painter
            .rect_filled(rect.translate(self.origin), radius, color);
    }

    fn image(&mut self, slot: ImageSlot, raster: &Raster, rect: egui::Rect) {
        let id = self.textures.texture(self.painter.ctx(), slot, raster);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        self.painter
            .image(id, rect.translate(self.origin), uv, egui::Color32::WHITE);
    }

    fn text(&mut self, pos: egui::Pos2, text: &str, size: f32, color: egui::Color32) {
        self.painter.text(
            pos + self.origin,
            egui::Align2::LEFT_TOP,
            text,
            egui::FontId::proportional(size),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Catalog, FurnitureArt};
    use crate::furniture::FurnitureKind;
    use image::RgbaImage;
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum Op {
        Line(egui::Pos2, egui::Pos2, egui::Color32),
        RoundedRect(egui::Rect),
        Image(ImageSlot, egui::Rect),
        Text(egui::Pos2, String),
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl Surface for Recorder {
        fn line(&mut self, a: egui::Pos2, b: egui::Pos2, stroke: egui::Stroke) {
            self.0.push(Op::Line(a, b, stroke.color));
        }

        fn rounded_rect(&mut self, rect: egui::Rect, _radius: f32, _color: egui::Color32) {
            self.0.push(Op::RoundedRect(rect));
        }

        fn image(&mut self, slot: ImageSlot, _raster: &Raster, rect: egui::Rect) {
            self.0.push(Op::Image(slot, rect));
        }

        fn text(&mut self, pos: egui::Pos2, text: &str, _size: f32, _color: egui::Color32) {
            self.0.push(Op::Text(pos, text.to_string()));
        }
    }

    fn room_with_two_pieces() -> Room {
        let mut room = Room::default();
        let art = Arc::new(FurnitureArt::new(FurnitureKind::Rug, RgbaImage::new(80, 40)));
        for x in [300.0, 500.0] {
            let id = room.allocate_id();
            let rect = egui::Rect::from_min_size(egui::pos2(x, 300.0), egui::vec2(80.0, 40.0));
            room.add_furniture(Furniture::with_rect(id, art.clone(), rect));
        }
        room
    }

    fn grid() -> Grid {
        Grid {
            area: egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(100.0, 40.0)),
            spacing: 20.0,
        }
    }

    fn position(ops: &[Op], pred: impl Fn(&Op) -> bool) -> usize {
        ops.iter().position(pred).expect("op not drawn")
    }

    fn rposition(ops: &[Op], pred: impl Fn(&Op) -> bool) -> usize {
        ops.iter().rposition(pred).expect("op not drawn")
    }

    #[test]
    fn scene_paints_back_to_front() {
        let room = room_with_two_pieces();
        let catalog = Catalog::placeholder();
        let chrome = Chrome {
            show_overlay: true,
            show_grid: true,
        };
        let mut rec = Recorder::default();
        compose_scene(&mut rec, &room, &chrome, &catalog.icons, &grid());
        let ops = rec.0;

        let last_grid = rposition(&ops, |op| matches!(op, Op::Line(_, _, c) if *c == GRID_COLOR));
        let first_wall = position(&ops, |op| matches!(op, Op::Line(_, _, c) if *c == WALL_COLOR));
        let first_vertex = position(&ops, |op| matches!(op, Op::RoundedRect(_)));
        let last_vertex = rposition(&ops, |op| matches!(op, Op::RoundedRect(_)));
        let first_text = position(&ops, |op| matches!(op, Op::Text(..)));
        let first_piece = position(&ops, |op| matches!(op, Op::Image(ImageSlot::Furniture(_), _)));
        let last_piece = rposition(&ops, |op| matches!(op, Op::Image(ImageSlot::Furniture(_), _)));
        let first_handle = position(&ops, |op| matches!(op, Op::Image(ImageSlot::Handle(_), _)));

        assert!(last_grid < first_wall);
        assert!(first_wall < first_vertex);
        assert!(last_vertex < first_text);
        assert!(first_text < first_piece);
        assert!(last_piece < first_handle);

        // paint order follows the furniture sequence
        let ids: Vec<u64> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Image(ImageSlot::Furniture(id), _) => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, room.furniture.iter().map(|f| f.id).collect::<Vec<_>>());
    }

    #[test]
    fn overlay_and_grid_follow_toggles() {
        let room = room_with_two_pieces();
        let catalog = Catalog::placeholder();
        let mut rec = Recorder::default();
        let chrome = Chrome {
            show_overlay: false,
            show_grid: false,
        };
        compose_scene(&mut rec, &room, &chrome, &catalog.icons, &grid());
        assert!(!rec.0.iter().any(|op| matches!(op, Op::Image(ImageSlot::Handle(_), _))));
        assert!(!rec.0.iter().any(|op| matches!(op, Op::Line(_, _, c) if *c == GRID_COLOR)));
    }

    #[test]
    fn wall_edges_join_vertex_centers_and_close() {
        let room = Room::default();
        let mut rec = Recorder::default();
        room.walls.paint(&mut rec);
        let v = room.walls.vertices();
        assert_eq!(rec.0[0], Op::Line(v[0].center, v[1].center, WALL_COLOR));
        assert_eq!(rec.0[5], Op::Line(v[5].center, v[0].center, WALL_COLOR));
        assert_eq!(rec.0[6], Op::RoundedRect(v[0].handle_rect()));
    }

    #[test]
    fn wall_dimensions_label_each_edge() {
        let room = Room::default();
        let mut rec = Recorder::default();
        WallDimensions(&room.walls).paint(&mut rec);
        assert_eq!(rec.0.len(), 6);
        assert_eq!(rec.0[0], Op::Text(egui::pos2(488.0, 79.0), "117\"".to_string()));
    }

    #[test]
    fn overlay_labels_furniture_size() {
        let room = room_with_two_pieces();
        let catalog = Catalog::placeholder();
        let piece = room.topmost().unwrap();
        let mut rec = Recorder::default();
        FurnitureOverlay {
            piece,
            icons: &catalog.icons,
            sizes: &room.handle_sizes,
        }
        .paint(&mut rec);
        let texts: Vec<&str> = rec
            .0
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["20\"", "10\""]);
        assert_eq!(
            rec.0.iter().filter(|op| matches!(op, Op::Line(..))).count(),
            6
        );
    }

    #[test]
    fn grid_spans_area() {
        let mut rec = Recorder::default();
        grid().paint(&mut rec);
        // rows at 0, 20, 40 and columns at 0..=100 step 20
        assert_eq!(rec.0.len(), 3 + 6);
    }
}
