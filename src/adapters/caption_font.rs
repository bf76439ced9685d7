use crate::domain::ports::{CaptionPainter, TextMeasure};
use crate::utils::error::{BarcodeError, Result};
use image::{Rgba, RgbaImage};
use resvg::usvg::fontdb;
use rusttype::{point, Font, Scale};
use std::path::Path;

/// 名稱使用的粗體字型；量測以邏輯像素計算
pub struct CaptionFont {
    font: Font<'static>,
    px: f32,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont").field("px", &self.px).finish()
    }
}

impl CaptionFont {
    pub fn from_bytes(data: Vec<u8>, index: u32, px: f32) -> Result<Self> {
        let font = Font::try_from_vec_and_index(data, index)
            .ok_or_else(|| BarcodeError::composite("caption font data is not a valid TTF/OTF face"))?;
        Ok(Self { font, px })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, px: f32) -> Result<Self> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            BarcodeError::composite(format!(
                "cannot read caption font {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_bytes(data, 0, px)
    }

    /// 從字型資料庫找粗體 Arial / sans-serif；找不到時退而求其次取任一粗體或第一個字型
    pub fn from_database(db: &fontdb::Database, px: f32) -> Option<Self> {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name("Arial"), fontdb::Family::SansSerif],
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };

        let id = db
            .query(&query)
            .or_else(|| {
                db.faces()
                    .find(|face| face.weight == fontdb::Weight::BOLD)
                    .map(|face| face.id)
            })
            .or_else(|| db.faces().next().map(|face| face.id))?;

        db.with_face_data(id, |data, index| {
            Font::try_from_vec_and_index(data.to_vec(), index)
        })
        .flatten()
        .map(|font| Self { font, px })
    }

    fn width_at(&self, px: f32, text: &str) -> f32 {
        let scale = Scale::uniform(px);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

impl TextMeasure for CaptionFont {
    fn measure(&self, text: &str) -> f32 {
        self.width_at(self.px, text)
    }
}

impl CaptionPainter for CaptionFont {
    fn draw_line(
        &self,
        img: &mut RgbaImage,
        scale: f32,
        center_x: f32,
        top: f32,
        color: Rgba<u8>,
        text: &str,
    ) {
        let px = self.px * scale;
        let rt_scale = Scale::uniform(px);
        let v_metrics = self.font.v_metrics(rt_scale);
        let start_x = center_x * scale - self.width_at(px, text) / 2.0;
        let baseline_y = top * scale + v_metrics.ascent;

        for glyph in self
            .font
            .layout(text, rt_scale, point(start_x, baseline_y))
        {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
                    return;
                }
                let alpha = v.clamp(0.0, 1.0);
                if alpha == 0.0 {
                    return;
                }
                let dst = img.get_pixel_mut(x as u32, y as u32);
                let inv = 1.0 - alpha;
                for c in 0..3 {
                    dst.0[c] = (color.0[c] as f32 * alpha + dst.0[c] as f32 * inv).round() as u8;
                }
                dst.0[3] = 255;
            });
        }
    }
}

/// 解析 "#rrggbb"
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BarcodeError::config(format!("invalid color: {}", s)));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| BarcodeError::config(format!("invalid color: {}", s)))
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
