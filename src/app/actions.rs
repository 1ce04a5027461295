use crate::furniture::FurnitureKind;
use crate::model::spawn_zone;
use eframe::egui;

use super::RoomPlannerApp;
use super::interaction::PointerEvent;

impl RoomPlannerApp {
    pub(super) fn spawn_furniture(&mut self, kind: FurnitureKind, rng: &mut impl rand::Rng) {
        let canvas = self.canvas_local_rect();
        let art = self.catalog.art(kind).clone();
        let index = self.room.spawn(art, spawn_zone(canvas), rng);
        let piece = &self.room.furniture[index];
        tracing::info!(id = piece.id, ?kind, center = ?piece.rect().center(), "spawned furniture");
    }

    pub(super) fn add_vertex(&mut self) {
        self.room.walls.add_vertex();
        tracing::info!(count = self.room.walls.len(), "added wall vertex");
    }

    pub(super) fn remove_vertex(&mut self) {
        if self.room.walls.remove_vertex() {
            tracing::info!(count = self.room.walls.len(), "removed wall vertex");
        }
    }

    pub(super) fn toggle_grid(&mut self) {
        self.chrome.show_grid = !self.chrome.show_grid;
        tracing::debug!(show_grid = self.chrome.show_grid, "toggled grid");
    }

    pub(super) fn handle_pointer(&mut self, event: PointerEvent) {
        self.manipulation = self.manipulation.step(
            event,
            &mut self.room,
            &mut self.chrome,
            self.settings.window_width,
        );
    }

    /// The canvas in its own coordinates; falls back to the configured
    /// window area before the first frame has been laid out.
    pub(super) fn canvas_local_rect(&self) -> egui::Rect {
        let size = if self.canvas.is_positive() {
            self.canvas.size()
        } else {
            egui::vec2(
                self.settings.window_width - self.settings.panel_width,
                self.settings.window_height,
            )
        };
        egui::Rect::from_min_size(egui::Pos2::ZERO, size)
    }
}
