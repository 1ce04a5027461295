use crate::furniture::FurnitureKind;
use eframe::egui;
use std::time::Duration;

use super::interaction::{Manipulation, PointerButton, PointerEvent};
use super::render::{BACKGROUND, Grid, PainterSurface, compose_scene};
use super::RoomPlannerApp;

const PALETTE_CELL_HEIGHT: f32 = 150.0;
const THUMBNAIL_MAX: egui::Vec2 = egui::vec2(150.0, 110.0);

impl eframe::App for RoomPlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("furniture_panel")
            .exact_width(self.settings.panel_width)
            .resizable(false)
            .show(ctx, |ui| self.furniture_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(BACKGROUND))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                self.canvas = rect;

                let events = ctx.input(|i| i.events.clone());
                for event in &events {
                    if let Some(event) = self.pointer_event(event, rect) {
                        self.handle_pointer(event);
                    }
                }

                let painter = ui.painter_at(rect);
                let grid = Grid {
                    area: egui::Rect::from_min_size(egui::Pos2::ZERO, rect.size()),
                    spacing: self.settings.grid_spacing,
                };
                let mut surface = PainterSurface {
                    painter: &painter,
                    origin: rect.min.to_vec2(),
                    textures: &mut self.textures,
                };
                compose_scene(
                    &mut surface,
                    &self.room,
                    &self.chrome,
                    &self.catalog.icons,
                    &grid,
                );
                self.textures.end_frame();

                if self.manipulation != Manipulation::Idle {
                    ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
                } else if response.hovered() {
                    ctx.set_cursor_icon(egui::CursorIcon::Default);
                }
            });

        let hz = self.settings.refresh_hz.max(1.0);
        ctx.request_repaint_after(Duration::from_secs_f32(1.0 / hz));
    }
}

impl RoomPlannerApp {
    /// Converts a raw egui event into a canvas-space pointer event. Presses
    /// outside the canvas belong to the panel and are dropped.
    fn pointer_event(&mut self, event: &egui::Event, canvas: egui::Rect) -> Option<PointerEvent> {
        let local = |p: egui::Pos2| p - canvas.min.to_vec2();
        match event {
            egui::Event::PointerMoved(pos) => {
                let delta = self.last_pointer.map_or(egui::Vec2::ZERO, |last| *pos - last);
                self.last_pointer = Some(*pos);
                Some(PointerEvent::Move {
                    pos: local(*pos),
                    delta,
                })
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } => {
                self.last_pointer = Some(*pos);
                canvas.contains(*pos).then(|| PointerEvent::Down {
                    button: PointerButton::from_egui(*button),
                    pos: local(*pos),
                })
            }
            egui::Event::PointerButton {
                button,
                pressed: false,
                ..
            } => Some(PointerEvent::Up {
                button: PointerButton::from_egui(*button),
            }),
            egui::Event::PointerGone => {
                self.last_pointer = None;
                None
            }
            _ => None,
        }
    }

    fn furniture_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading("Furniture");
        });
        ui.separator();

        let mut picked = None;
        egui::Grid::new("palette")
            .num_columns(2)
            .spacing([4.0, 4.0])
            .show(ui, |ui| {
                for (i, &kind) in FurnitureKind::ALL.iter().enumerate() {
                    if self.palette_button(ui, kind).clicked() {
                        picked = Some(kind);
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        if let Some(kind) = picked {
            self.spawn_furniture(kind, &mut rand::rng());
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.selectable_label(self.chrome.show_grid, "Grid").clicked() {
                self.toggle_grid();
            }
            ui.separator();
            ui.label("Corners:");
            if ui.button("−").clicked() {
                self.remove_vertex();
            }
            if ui.button("+").clicked() {
                self.add_vertex();
            }
        });
    }

    fn palette_button(&self, ui: &mut egui::Ui, kind: FurnitureKind) -> egui::Response {
        let cell = egui::vec2(self.settings.panel_width * 0.5 - 12.0, PALETTE_CELL_HEIGHT);
        match self.thumbnails.get(&kind) {
            Some(texture) => {
                let size = fit_within(texture.size_vec2(), THUMBNAIL_MAX);
                let image = egui::Image::new(egui::load::SizedTexture::new(texture.id(), size));
                ui.add_sized(cell, egui::Button::image_and_text(image, kind.label()))
            }
            None => ui.add_sized(cell, egui::Button::new(kind.label())),
        }
    }
}

fn fit_within(size: egui::Vec2, max: egui::Vec2) -> egui::Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return max;
    }
    let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
    size * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnails_shrink_but_never_grow() {
        assert_eq!(fit_within(egui::vec2(300.0, 110.0), THUMBNAIL_MAX), egui::vec2(150.0, 55.0));
        assert_eq!(fit_within(egui::vec2(20.0, 10.0), THUMBNAIL_MAX), egui::vec2(20.0, 10.0));
    }
}
