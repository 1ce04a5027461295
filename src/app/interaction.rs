//! Pointer arbitration: at most one entity owns a drag from pointer-down to
//! pointer-up, and every move in between goes to that entity alone.

use crate::model::Room;
use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    pub(crate) fn from_egui(button: egui::PointerButton) -> Self {
        match button {
            egui::PointerButton::Primary => Self::Primary,
            egui::PointerButton::Secondary => Self::Secondary,
            _ => Self::Middle,
        }
    }
}

/// Positions are canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PointerEvent {
    Down {
        button: PointerButton,
        pos: egui::Pos2,
    },
    Up {
        button: PointerButton,
    },
    Move {
        pos: egui::Pos2,
        delta: egui::Vec2,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Manipulation {
    Idle,
    /// `target` is the unsnapped position the pointer has dragged the vertex to.
    DraggingVertex {
        index: usize,
        target: egui::Pos2,
    },
    DraggingFurnitureBody(usize),
    RotatingTopFurniture,
    ResizingTopWidth,
    ResizingTopHeight,
}

/// View toggles that live beside the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Chrome {
    /// Handles and dimensions of the topmost piece are visible.
    pub show_overlay: bool,
    pub show_grid: bool,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            show_overlay: false,
            show_grid: true,
        }
    }
}

impl Manipulation {
    pub(crate) fn step(
        self,
        event: PointerEvent,
        room: &mut Room,
        chrome: &mut Chrome,
        reference_width: f32,
    ) -> Self {
        match event {
            PointerEvent::Down {
                button: PointerButton::Primary,
                pos,
            } => {
                let next = pick(room, chrome, pos);
                if next != Manipulation::Idle {
                    tracing::debug!(?next, "manipulation started");
                }
                next
            }
            PointerEvent::Down { .. } => self,
            PointerEvent::Up { .. } => Manipulation::Idle,
            PointerEvent::Move { pos, delta } => self.drag(room, pos, delta, reference_width),
        }
    }

    fn drag(self, room: &mut Room, pos: egui::Pos2, delta: egui::Vec2, reference_width: f32) -> Self {
        match self {
            Manipulation::Idle => {}
            Manipulation::DraggingVertex { index, target } => {
                let target = target + delta;
                room.walls.drag_vertex_to(index, target);
                return Manipulation::DraggingVertex { index, target };
            }
            Manipulation::DraggingFurnitureBody(index) => {
                if let Some(piece) = room.furniture.get_mut(index) {
                    piece.translate(delta);
                }
            }
            Manipulation::RotatingTopFurniture => {
                if let Some(piece) = room.topmost_mut() {
                    piece.rotate_towards(pos, reference_width);
                }
            }
            Manipulation::ResizingTopWidth => {
                if let Some(piece) = room.topmost_mut() {
                    piece.resize_width(delta.x);
                }
            }
            Manipulation::ResizingTopHeight => {
                if let Some(piece) = room.topmost_mut() {
                    piece.resize_height(delta.y);
                }
            }
        }
        self
    }
}

/// Resolves a primary press. Handles of the topmost piece are checked first,
/// then vertex handles, which outrank any handle, then furniture bodies.
fn pick(room: &mut Room, chrome: &mut Chrome, pos: egui::Pos2) -> Manipulation {
    let mut next = Manipulation::Idle;
    match room.topmost_handles().filter(|_| chrome.show_overlay) {
        Some(handles) if handles.delete.contains(pos) => {
            if let Some(piece) = room.delete_topmost() {
                tracing::info!(id = piece.id, kind = ?piece.kind(), "deleted furniture");
            }
            chrome.show_overlay = false;
        }
        Some(handles) if handles.rotate.contains(pos) => next = Manipulation::RotatingTopFurniture,
        Some(handles) if handles.width.contains(pos) => next = Manipulation::ResizingTopWidth,
        Some(handles) if handles.height.contains(pos) => next = Manipulation::ResizingTopHeight,
        _ => chrome.show_overlay = false,
    }

    if let Some(index) = room.walls.vertex_at(pos) {
        let target = room.walls.vertices()[index].center;
        return Manipulation::DraggingVertex { index, target };
    }
    if next != Manipulation::RotatingTopFurniture {
        if let Some(index) = room.furniture_at(pos) {
            let top = room.bring_to_top(index);
            chrome.show_overlay = true;
            return Manipulation::DraggingFurnitureBody(top);
        }
    }
    next
}
