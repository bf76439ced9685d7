//! 合成匯出用的 PNG：名稱 (可多行) 在上、條碼在下。
//!
//! 畫布 (邏輯像素) 寬 = 條碼寬 + 2 * padding，高 = 條碼高 + 名稱高 + 2 * padding，
//! 實際輸出再乘上 scale。名稱從 padding 開始每行間隔 line_height，
//! 條碼畫在 (padding, padding + 名稱高 + gap)。

use crate::adapters::caption_font::{parse_hex_color, CaptionFont};
use crate::core::caption::CaptionLayout;
use crate::domain::model::{BarcodeGraphic, CompositeSettings};
use crate::domain::ports::CaptionPainter;
use crate::utils::error::{BarcodeError, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};
use std::sync::Arc;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub struct ImageCompositor {
    settings: CompositeSettings,
    fonts: Arc<fontdb::Database>,
    caption_painter: Option<Box<dyn CaptionPainter>>,
    caption_font_error: Option<String>,
    caption_color: Rgba<u8>,
}

impl ImageCompositor {
    /// 載入系統字型 (SVG 文字與名稱字型都從這裡找)
    ///
    /// 名稱字型載入失敗不會中止建構；只有真正要畫名稱的匯出才會回報錯誤。
    pub fn new(settings: CompositeSettings) -> Result<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());

        let (caption_font, font_error) = match &settings.caption_font {
            Some(path) => match CaptionFont::from_file(path, settings.caption_font_size) {
                Ok(font) => (Some(font), None),
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    let message = match e {
                        BarcodeError::CompositeError { message } => message,
                        other => other.to_string(),
                    };
                    (None, Some(message))
                }
            },
            None => (
                CaptionFont::from_database(&db, settings.caption_font_size),
                None,
            ),
        };
        if caption_font.is_none() {
            tracing::warn!("No caption font available, product names cannot be drawn");
        }

        let mut compositor = Self::from_parts(
            settings,
            db,
            caption_font.map(|font| Box::new(font) as Box<dyn CaptionPainter>),
        )?;
        compositor.caption_font_error = font_error;
        Ok(compositor)
    }

    pub fn from_parts(
        settings: CompositeSettings,
        fonts: fontdb::Database,
        caption_painter: Option<Box<dyn CaptionPainter>>,
    ) -> Result<Self> {
        let caption_color = parse_hex_color(&settings.caption_color)?;

        Ok(Self {
            settings,
            fonts: Arc::new(fonts),
            caption_painter,
            caption_font_error: None,
            caption_color,
        })
    }

    /// 名稱依條碼寬度逐字換行；沒有名稱時高度為 0
    pub fn layout_caption(&self, caption: &str, max_width: f32) -> Result<CaptionLayout> {
        if caption.is_empty() {
            return Ok(CaptionLayout::empty());
        }
        let painter = self.caption_painter.as_deref().ok_or_else(|| {
            BarcodeError::composite(
                self.caption_font_error
                    .as_deref()
                    .unwrap_or("no caption font available"),
            )
        })?;
        Ok(CaptionLayout::new(
            painter,
            caption,
            max_width,
            self.settings.line_height,
        ))
    }

    /// 合成一張 PNG；`graphic` 為 None 代表條碼圖不存在
    pub fn composite(&self, graphic: Option<&BarcodeGraphic>, caption: &str) -> Result<Vec<u8>> {
        let graphic = graphic.ok_or_else(|| BarcodeError::render("barcode graphic not found"))?;
        if graphic.svg.trim().is_empty() {
            return Err(BarcodeError::render("barcode graphic source is empty"));
        }

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&graphic.svg, &options)
            .map_err(|e| BarcodeError::render(format!("failed to load SVG: {}", e)))?;
        let svg_width = if graphic.width > 0.0 {
            graphic.width
        } else {
            tree.size().width()
        };
        let svg_height = if graphic.height > 0.0 {
            graphic.height
        } else {
            tree.size().height()
        };

        let layout = self.layout_caption(caption, svg_width)?;

        let scale = self.settings.scale as f32;
        let padding = self.settings.padding as f32;
        let logical_width = svg_width + padding * 2.0;
        let logical_height = svg_height + layout.height as f32 + padding * 2.0;
        let canvas_width = (logical_width * scale) as u32;
        let canvas_height = (logical_height * scale) as u32;
        if canvas_width == 0 || canvas_height == 0 {
            return Err(BarcodeError::composite("canvas has zero size"));
        }

        let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, WHITE);

        if let Some(painter) = self.caption_painter.as_deref() {
            let mut top = padding;
            for line in &layout.lines {
                painter.draw_line(
                    &mut canvas,
                    scale,
                    logical_width / 2.0,
                    top,
                    self.caption_color,
                    line,
                );
                top += self.settings.line_height as f32;
            }
        }

        let barcode = rasterize(
            &tree,
            (svg_width * scale).round() as u32,
            (svg_height * scale).round() as u32,
        )?;
        let barcode_y = padding + layout.height as f32 + self.settings.gap as f32;
        image::imageops::overlay(
            &mut canvas,
            &barcode,
            (padding * scale).round() as i64,
            (barcode_y * scale).round() as i64,
        );

        tracing::debug!(
            "Composited {}x{} image with {} caption lines",
            canvas_width,
            canvas_height,
            layout.lines.len()
        );

        encode_png(&canvas)
    }
}

/// 將 SVG 點陣化成指定像素大小
fn rasterize(tree: &usvg::Tree, width: u32, height: u32) -> Result<RgbaImage> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        BarcodeError::render(format!("cannot rasterize SVG at {}x{}", width, height))
    })?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    let mut img = RgbaImage::new(width, height);
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(img)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .map_err(|e| BarcodeError::encode(format!("PNG encoding failed: {}", e)))?;

    if buf.is_empty() {
        return Err(BarcodeError::encode("PNG encoder produced no data"));
    }
    Ok(buf)
}
