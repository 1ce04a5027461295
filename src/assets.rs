//! Artwork for the furniture catalog and the manipulation handles.
//!
//! Source art is loaded once at startup. Every derived image (rotated,
//! scaled, stretched) is produced from the untouched source so repeated
//! edits never compound resampling loss.

use crate::error::AssetError;
use crate::furniture::{CardinalAngle, FurnitureKind, HandleKind, HandleSizes};
use crate::geometry::rotated_size;
use eframe::egui;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// An immutable image plus a generation number that changes whenever a new
/// raster is produced, so GPU uploads can be skipped for unchanged images.
#[derive(Clone, Debug)]
pub struct Raster {
    image: Arc<RgbaImage>,
    generation: u64,
}

impl Raster {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.image.width() as f32, self.image.height() as f32)
    }
}

/// Rotates `src` counter-clockwise by `degrees` and scales it uniformly by
/// `scale`. The result is sized to the rotated bounds; uncovered pixels are
/// transparent.
///
/// Scaling is a filtered resize; cardinal angles are then exact pixel
/// rotations and any other angle is resampled bilinearly.
pub fn rotozoom(src: &RgbaImage, degrees: f32, scale: f32) -> RgbaImage {
    let (w, h) = src.dimensions();
    if scale <= f32::EPSILON || w == 0 || h == 0 {
        return RgbaImage::new(1, 1);
    }
    let sw = ((w as f32 * scale).round() as u32).max(1);
    let sh = ((h as f32 * scale).round() as u32).max(1);
    let scaled = if (sw, sh) == (w, h) {
        src.clone()
    } else {
        stretch(src, sw, sh)
    };
    match CardinalAngle::from_degrees(degrees) {
        Some(CardinalAngle::Deg0) => scaled,
        Some(CardinalAngle::Deg90) => imageops::rotate270(&scaled),
        Some(CardinalAngle::Deg180) => imageops::rotate180(&scaled),
        Some(CardinalAngle::DegNeg90) => imageops::rotate90(&scaled),
        None => rotate_bilinear(&scaled, degrees),
    }
}

fn rotate_bilinear(src: &RgbaImage, degrees: f32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let out = rotated_size(egui::vec2(w as f32, h as f32), degrees);
    let out_w = (out.x.round() as u32).max(1);
    let out_h = (out.y.round() as u32).max(1);
    let (Some(mut source), Some(mut target)) = (Pixmap::new(w, h), Pixmap::new(out_w, out_h))
    else {
        return RgbaImage::new(1, 1);
    };
    for (dst, px) in source.pixels_mut().iter_mut().zip(src.pixels()) {
        let [r, g, b, a] = px.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    // tiny-skia rotates clockwise on a y-down surface
    let transform = Transform::from_translate(-(w as f32) * 0.5, -(h as f32) * 0.5)
        .post_rotate(-degrees)
        .post_translate(out_w as f32 * 0.5, out_h as f32 * 0.5);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

    let mut image = RgbaImage::new(out_w, out_h);
    for (dst, px) in image.pixels_mut().zip(target.pixels()) {
        let c = px.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

/// Non-uniform resize to exactly `width` x `height` pixels (at least 1x1).
pub fn stretch(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(src, width.max(1), height.max(1), FilterType::Triangle)
}

/// Source art for one furniture kind with its four cardinal orientations.
#[derive(Debug)]
pub struct FurnitureArt {
    pub kind: FurnitureKind,
    base: Arc<RgbaImage>,
    oriented: [Arc<RgbaImage>; 4],
}

impl FurnitureArt {
    pub fn new(kind: FurnitureKind, base: RgbaImage) -> Self {
        let oriented = [
            Arc::new(base.clone()),
            Arc::new(imageops::rotate270(&base)),
            Arc::new(imageops::rotate180(&base)),
            Arc::new(imageops::rotate90(&base)),
        ];
        Self {
            kind,
            base: Arc::new(base),
            oriented,
        }
    }

    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    pub fn oriented(&self, angle: CardinalAngle) -> &RgbaImage {
        &self.oriented[angle.index()]
    }
}

#[derive(Clone, Debug)]
pub struct HandleIcons {
    pub rotate: Raster,
    pub delete: Raster,
    pub width: Raster,
    pub height: Raster,
}

impl HandleIcons {
    pub fn get(&self, kind: HandleKind) -> &Raster {
        match kind {
            HandleKind::Rotate => &self.rotate,
            HandleKind::Delete => &self.delete,
            HandleKind::Width => &self.width,
            HandleKind::Height => &self.height,
        }
    }

    pub fn sizes(&self) -> HandleSizes {
        HandleSizes {
            rotate: self.rotate.size(),
            delete: self.delete.size(),
            width: self.width.size(),
            height: self.height.size(),
        }
    }
}

pub struct Catalog {
    arts: Vec<Arc<FurnitureArt>>,
    pub icons: HandleIcons,
}

impl Catalog {
    /// Loads every asset from `dir`, substituting generated art for anything
    /// that is missing or unreadable.
    pub fn load(dir: &Path) -> Self {
        let arts = FurnitureKind::ALL
            .iter()
            .map(|&kind| {
                let path = dir.join(kind.asset_file());
                let base = load_or_placeholder(&path, || placeholder_art(kind));
                Arc::new(FurnitureArt::new(kind, base))
            })
            .collect();
        let icon = |kind: HandleKind| {
            let path = dir.join(kind.asset_file());
            Raster::new(load_or_placeholder(&path, || placeholder_icon(kind)))
        };
        let icons = HandleIcons {
            rotate: icon(HandleKind::Rotate),
            delete: icon(HandleKind::Delete),
            width: icon(HandleKind::Width),
            height: icon(HandleKind::Height),
        };
        tracing::info!(dir = %dir.display(), "loaded furniture catalog");
        Self { arts, icons }
    }

    #[cfg(test)]
    pub fn placeholder() -> Self {
        let arts = FurnitureKind::ALL
            .iter()
            .map(|&kind| Arc::new(FurnitureArt::new(kind, placeholder_art(kind))))
            .collect();
        let icons = HandleIcons {
            rotate: Raster::new(placeholder_icon(HandleKind::Rotate)),
            delete: Raster::new(placeholder_icon(HandleKind::Delete)),
            width: Raster::new(placeholder_icon(HandleKind::Width)),
            height: Raster::new(placeholder_icon(HandleKind::Height)),
        };
        Self { arts, icons }
    }

    pub fn art(&self, kind: FurnitureKind) -> &Arc<FurnitureArt> {
        &self.arts[kind.index()]
    }
}

pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Image {
            path: PathBuf::from(path),
            source,
        })
}

fn load_or_placeholder(path: &Path, fallback: impl FnOnce() -> RgbaImage) -> RgbaImage {
    match load_image(path) {
        Ok(img) => img,
        Err(err) => {
            tracing::warn!(%err, "using placeholder art");
            fallback()
        }
    }
}

fn placeholder_spec(kind: FurnitureKind) -> ((u32, u32), [u8; 3]) {
    match kind {
        FurnitureKind::Bed => ((640, 680), [120, 150, 200]),
        FurnitureKind::Desk => ((960, 480), [170, 130, 90]),
        FurnitureKind::Nightstand => ((400, 400), [150, 110, 80]),
        FurnitureKind::Rug => ((1000, 700), [200, 170, 150]),
        FurnitureKind::Dresser => ((720, 420), [140, 100, 70]),
        FurnitureKind::Chair => ((260, 260), [110, 110, 110]),
        FurnitureKind::Tv => ((600, 120), [40, 40, 40]),
        FurnitureKind::Lamp => ((180, 180), [230, 200, 90]),
        FurnitureKind::Door => ((300, 300), [180, 150, 110]),
        FurnitureKind::Window => ((450, 60), [150, 200, 230]),
    }
}

/// Filled block with a border and a darker stripe along the bottom ("front")
/// edge so the orientation stays readable.
pub fn placeholder_art(kind: FurnitureKind) -> RgbaImage {
    let ((w, h), [r, g, b]) = placeholder_spec(kind);
    let border = (w.min(h) / 16).max(2);
    let stripe = (h / 8).max(border + 1);
    let dark = |c: u8| c / 2;
    RgbaImage::from_fn(w, h, |x, y| {
        let on_border = x < border || y < border || x >= w - border || y >= h - border;
        if on_border || y >= h - stripe {
            Rgba([dark(r), dark(g), dark(b), 255])
        } else {
            Rgba([r, g, b, 255])
        }
    })
}

pub fn placeholder_icon(kind: HandleKind) -> RgbaImage {
    let size = 24u32;
    let color = match kind {
        HandleKind::Rotate => Rgba([60, 140, 220, 255]),
        HandleKind::Delete => Rgba([210, 50, 50, 255]),
        HandleKind::Width | HandleKind::Height => Rgba([90, 90, 90, 255]),
    };
    let radius = size as f32 * 0.5;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy <= radius * radius {
            color
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
