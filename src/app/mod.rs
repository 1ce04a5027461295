use crate::assets::Catalog;
use crate::furniture::FurnitureKind;
use crate::model::Room;
use eframe::egui;
use std::collections::HashMap;
use std::path::Path;

mod actions;
mod interaction;
mod render;
pub(crate) mod settings;
mod update;

use interaction::{Chrome, Manipulation};
use settings::AppSettings;

pub struct RoomPlannerApp {
    room: Room,
    catalog: Catalog,
    manipulation: Manipulation,
    chrome: Chrome,
    settings: AppSettings,
    textures: render::TextureCache,
    thumbnails: HashMap<FurnitureKind, egui::TextureHandle>,
    /// Canvas rect in screen space from the last frame.
    canvas: egui::Rect,
    last_pointer: Option<egui::Pos2>,
}

impl RoomPlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let catalog = Catalog::load(Path::new(&settings.assets_dir));
        let thumbnails = Self::load_thumbnails(&cc.egui_ctx, &catalog);
        Self::with_catalog(catalog, settings, thumbnails)
    }

    fn with_catalog(
        catalog: Catalog,
        settings: AppSettings,
        thumbnails: HashMap<FurnitureKind, egui::TextureHandle>,
    ) -> Self {
        let mut room = Room::default();
        room.handle_sizes = catalog.icons.sizes();
        let chrome = Chrome {
            show_overlay: false,
            show_grid: settings.show_grid,
        };
        Self {
            room,
            catalog,
            manipulation: Manipulation::Idle,
            chrome,
            settings,
            textures: render::TextureCache::default(),
            thumbnails,
            canvas: egui::Rect::NOTHING,
            last_pointer: None,
        }
    }

    fn load_thumbnails(
        ctx: &egui::Context,
        catalog: &Catalog,
    ) -> HashMap<FurnitureKind, egui::TextureHandle> {
        FurnitureKind::ALL
            .iter()
            .map(|&kind| {
                let handle = ctx.load_texture(
                    format!("thumbnail-{}", kind.label()),
                    render::color_image(catalog.art(kind).base()),
                    egui::TextureOptions::LINEAR,
                );
                (kind, handle)
            })
            .collect()
    }
}
