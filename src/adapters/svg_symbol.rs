//! EAN-13 向量條碼 (SVG)。
//!
//! 版面：起始護線 101、左半 6 位 (依第一位數字決定 L/G 編碼)、中間護線 01010、
//! 右半 6 位 (R 編碼)、結束護線 101，共 95 個模組。

use crate::core::checksum::is_valid_ean13;
use crate::domain::model::{BarcodeGraphic, SymbolOptions};
use crate::domain::ports::SymbolRenderer;
use crate::utils::error::{BarcodeError, Result};
use std::fmt::Write;

const MODULES: u32 = 95;
const TEXT_MARGIN: u32 = 2;

const L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];

const G_CODES: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101",
    "0111001", "0000101", "0010001", "0001001", "0010111",
];

const R_CODES: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100",
    "1001110", "1010000", "1000100", "1001000", "1110100",
];

/// 第一位數字對應左半六位的 L/G 組合
const PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG",
    "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL", "LGGLGL",
];

/// 將 13 位數字編碼成 95 個模組 (true = 黑)
pub fn encode_modules(code: &str) -> Vec<bool> {
    let digits: Vec<usize> = code.bytes().map(|b| (b - b'0') as usize).collect();
    let mut bits = String::with_capacity(MODULES as usize);

    bits.push_str("101");
    for (i, parity) in PARITY[digits[0]].chars().enumerate() {
        let table = if parity == 'L' { &L_CODES } else { &G_CODES };
        bits.push_str(table[digits[i + 1]]);
    }
    bits.push_str("01010");
    for &d in &digits[7..13] {
        bits.push_str(R_CODES[d]);
    }
    bits.push_str("101");

    bits.chars().map(|c| c == '1').collect()
}

fn is_guard(module: u32) -> bool {
    module < 3 || (45..50).contains(&module) || module >= 92
}

/// 內建的 EAN-13 SVG 產生器
#[derive(Debug, Clone, Default)]
pub struct Ean13SvgRenderer;

impl Ean13SvgRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolRenderer for Ean13SvgRenderer {
    fn render(&self, code: &str, options: &SymbolOptions) -> Result<BarcodeGraphic> {
        if !is_valid_ean13(code) {
            return Err(BarcodeError::render(format!(
                "\"{}\" is not a valid EAN-13 code",
                code
            )));
        }
        if options.width == 0 || options.height == 0 {
            return Err(BarcodeError::render("bar width and height must be positive"));
        }

        let bar = options.width;
        let margin = options.margin;
        // 第一位數字印在起始護線左側
        let lead = if options.display_value { options.font_size } else { 0 };
        let guard_extra = if options.display_value { options.font_size / 2 } else { 0 };
        let text_height = if options.display_value {
            TEXT_MARGIN + options.font_size
        } else {
            0
        };

        let x0 = margin + lead;
        let width = x0 + MODULES * bar + margin;
        let height = margin + options.height + text_height + margin;

        let mut svg = String::new();
        // 寫入 String 不會失敗
        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/><g fill="#000000">"##,
            w = width,
            h = height
        );

        let modules = encode_modules(code);
        let mut m = 0u32;
        while m < MODULES {
            if !modules[m as usize] {
                m += 1;
                continue;
            }
            let guard = is_guard(m);
            let start = m;
            while m < MODULES && modules[m as usize] && is_guard(m) == guard {
                m += 1;
            }
            let bar_height = options.height + if guard { guard_extra } else { 0 };
            let _ = write!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
                x0 + start * bar,
                margin,
                (m - start) * bar,
                bar_height
            );
        }
        svg.push_str("</g>");

        if options.display_value {
            let baseline = margin + options.height + TEXT_MARGIN + options.font_size;
            let groups = [
                (margin as f32 + lead as f32 / 2.0, &code[0..1]),
                ((x0 + (3 + 21) * bar) as f32, &code[1..7]),
                ((x0 + (50 + 21) * bar) as f32, &code[7..13]),
            ];
            for (x, text) in groups {
                let _ = write!(
                    svg,
                    r##"<text x="{}" y="{}" font-family="monospace" font-size="{}" text-anchor="middle" fill="#000000">{}</text>"##,
                    x, baseline, options.font_size, text
                );
            }
        }
        svg.push_str("</svg>");

        tracing::debug!("Rendered EAN-13 {} ({}x{})", code, width, height);

        Ok(BarcodeGraphic {
            svg,
            width: width as f32,
            height: height as f32,
        })
    }
}
