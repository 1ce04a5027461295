use crate::assets::FurnitureArt;
use crate::furniture::{Furniture, HandleRects, HandleSizes};
use crate::geometry::{distance, midpoint, snap_axis};
use crate::units;
use eframe::egui;
use rand::Rng;
use std::sync::Arc;

pub const VERTEX_RADIUS: f32 = 7.0;
pub const VERTEX_SNAP_TOLERANCE: f32 = 10.0;
const SPAWN_ZONE_SIZE: egui::Vec2 = egui::vec2(340.0, 240.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub center: egui::Pos2,
}

impl Vertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            center: egui::pos2(x, y),
        }
    }

    pub fn handle_rect(&self) -> egui::Rect {
        egui::Rect::from_center_size(self.center, egui::Vec2::splat(VERTEX_RADIUS * 2.0))
    }

    pub fn contains(&self, pos: egui::Pos2) -> bool {
        self.handle_rect().contains(pos)
    }
}

/// Closed wall outline. Edge `i` joins vertex `i` to vertex `(i + 1) % n`.
#[derive(Clone, Debug, PartialEq)]
pub struct WallPolygon {
    vertices: Vec<Vertex>,
}

impl WallPolygon {
    /// Returns `None` for fewer than two vertices.
    #[cfg(test)]
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        (vertices.len() >= 2).then_some(Self { vertices })
    }

    pub fn default_hexagon() -> Self {
        Self {
            vertices: vec![
                Vertex::new(250.0, 100.0),
                Vertex::new(718.0, 100.0),
                Vertex::new(718.0, 688.0),
                Vertex::new(466.0, 688.0),
                Vertex::new(466.0, 788.0),
                Vertex::new(250.0, 788.0),
            ],
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Appends a vertex halfway between the first and the last one.
    pub fn add_vertex(&mut self) {
        let first = self.vertices[0].center;
        let last = self.vertices[self.vertices.len() - 1].center;
        let mid = midpoint(first, last);
        self.vertices.push(Vertex { center: mid });
    }

    /// Drops the last vertex; a two-vertex wall is left as is.
    pub fn remove_vertex(&mut self) -> bool {
        if self.vertices.len() > 2 {
            self.vertices.pop();
            true
        } else {
            false
        }
    }

    pub fn edge(&self, i: usize) -> (egui::Pos2, egui::Pos2) {
        let n = self.vertices.len();
        (self.vertices[i % n].center, self.vertices[(i + 1) % n].center)
    }

    pub fn edges(&self) -> impl Iterator<Item = (egui::Pos2, egui::Pos2)> + '_ {
        (0..self.vertices.len()).map(|i| self.edge(i))
    }

    /// Length of edge `i` in whole real-world units.
    pub fn edge_length(&self, i: usize) -> i32 {
        let (a, b) = self.edge(i);
        units::to_units_truncated(distance(a, b))
    }

    /// Index of the vertex handle under `pos`; later vertices win.
    pub fn vertex_at(&self, pos: egui::Pos2) -> Option<usize> {
        self.vertices.iter().rposition(|v| v.contains(pos))
    }

    /// Moves vertex `index` to `target`, then snaps each axis to the nearest
    /// other vertex coordinate within tolerance.
    pub fn drag_vertex_to(&mut self, index: usize, target: egui::Pos2) {
        if index >= self.vertices.len() {
            return;
        }
        let others = || {
            self.vertices
                .iter()
                .enumerate()
                .filter(move |(i, _)| *i != index)
                .map(|(_, v)| v.center)
        };
        let x = snap_axis(target.x, others().map(|c| c.x), VERTEX_SNAP_TOLERANCE);
        let y = snap_axis(target.y, others().map(|c| c.y), VERTEX_SNAP_TOLERANCE);
        self.vertices[index].center = egui::pos2(x, y);
    }
}

/// The wall outline plus furniture in paint order, back to front.
pub struct Room {
    pub walls: WallPolygon,
    pub furniture: Vec<Furniture>,
    pub handle_sizes: HandleSizes,
    next_id: u64,
}

impl Default for Room {
    fn default() -> Self {
        Self::new(WallPolygon::default_hexagon(), HandleSizes::default())
    }
}

impl Room {
    pub fn new(walls: WallPolygon, handle_sizes: HandleSizes) -> Self {
        Self {
            walls,
            furniture: Vec::new(),
            handle_sizes,
            next_id: 1,
        }
    }

    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_furniture(&mut self, furniture: Furniture) {
        self.furniture.push(furniture);
    }

    /// Places a new piece at a random point of `zone` and returns its index.
    pub fn spawn(&mut self, art: Arc<FurnitureArt>, zone: egui::Rect, rng: &mut impl Rng) -> usize {
        let x = rng.random_range(zone.min.x.round() as i32..=zone.max.x.round() as i32);
        let y = rng.random_range(zone.min.y.round() as i32..=zone.max.y.round() as i32);
        let id = self.allocate_id();
        self.add_furniture(Furniture::new(id, art, egui::pos2(x as f32, y as f32)));
        self.furniture.len() - 1
    }

    pub fn delete_topmost(&mut self) -> Option<Furniture> {
        self.furniture.pop()
    }

    /// Moves the piece at `index` to the end of the paint order and returns
    /// its new index.
    pub fn bring_to_top(&mut self, index: usize) -> usize {
        if index < self.furniture.len() {
            let piece = self.furniture.remove(index);
            self.furniture.push(piece);
        }
        self.furniture.len().saturating_sub(1)
    }

    pub fn topmost(&self) -> Option<&Furniture> {
        self.furniture.last()
    }

    pub fn topmost_mut(&mut self) -> Option<&mut Furniture> {
        self.furniture.last_mut()
    }

    pub fn topmost_handles(&self) -> Option<HandleRects> {
        self.topmost().map(|f| f.handles(&self.handle_sizes))
    }

    /// Index of the topmost piece whose body contains `pos`.
    pub fn furniture_at(&self, pos: egui::Pos2) -> Option<usize> {
        self.furniture.iter().rposition(|f| f.contains(pos))
    }
}

/// Central area of `canvas` where new pieces are dropped.
pub fn spawn_zone(canvas: egui::Rect) -> egui::Rect {
    egui::Rect::from_center_size(canvas.center(), SPAWN_ZONE_SIZE)
}
