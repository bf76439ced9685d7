use crate::utils::error::BarcodeError;
use serde::{Deserialize, Serialize};

/// EAN-13 前 12 位（前綴 + 產品代碼）的長度
pub const BODY_LENGTH: usize = 12;
/// 產品名稱 (與檔名中的名稱部分) 的最大字元數
pub const MAX_NAME_CHARS: usize = 50;

/// 一筆已產生的 EAN-13 條碼，建立後不再變更
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRecord {
    pub full_code: String,
    pub prefix: String,
    pub prefix_length: usize,
    pub product_code: String,
    pub product_code_length: usize,
    pub check_digit: String,
}

impl CodeRecord {
    /// 顯示用前綴，空前綴顯示為 "(none)"
    pub fn prefix_display(&self) -> &str {
        if self.prefix.is_empty() {
            "(none)"
        } else {
            &self.prefix
        }
    }
}

/// 已通過驗證的產生請求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prefix: String,
    pub count: usize,
}

/// 批次產生結果；`records` 可能少於 `requested`
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedBatch {
    pub records: Vec<CodeRecord>,
    pub attempts: usize,
    pub requested: usize,
}

impl GeneratedBatch {
    /// 嘗試次數用盡仍未湊滿時，回傳給使用者看的警告
    pub fn shortfall(&self) -> Option<BarcodeError> {
        if self.records.len() < self.requested {
            Some(BarcodeError::GenerationShortfall {
                generated: self.records.len(),
                requested: self.requested,
                attempts: self.attempts,
            })
        } else {
            None
        }
    }

    /// 摘要行，例如 "Generated 5 barcodes (prefix 3 digits: 690)"
    pub fn summary(&self) -> String {
        let (prefix_length, prefix) = self
            .records
            .first()
            .map(|r| {
                let shown = if r.prefix.is_empty() { "(no prefix)" } else { r.prefix.as_str() };
                (r.prefix_length, shown)
            })
            .unwrap_or((0, "(no prefix)"));
        format!(
            "Generated {} barcodes (prefix {} digits: {})",
            self.records.len(),
            prefix_length,
            prefix
        )
    }
}

/// 外部 symbol renderer 產出的向量圖 (SVG) 與其自然尺寸
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeGraphic {
    pub svg: String,
    pub width: f32,
    pub height: f32,
}

/// 單一條碼項目的狀態，取代頁面上以索引查找的 DOM 元素
#[derive(Debug, Clone)]
pub struct BarcodeItem {
    pub index: usize,
    pub record: CodeRecord,
    pub product_name: Option<String>,
    pub selected: bool,
    pub graphic: Option<BarcodeGraphic>,
}

impl BarcodeItem {
    pub fn new(index: usize, record: CodeRecord) -> Self {
        Self {
            index,
            record,
            product_name: None,
            selected: true,
            graphic: None,
        }
    }

    /// 產品名稱去除前後空白；空字串視為沒有名稱
    pub fn with_product_name(mut self, name: Option<&str>) -> Self {
        self.product_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| n.chars().take(MAX_NAME_CHARS).collect());
        self
    }

    pub fn caption(&self) -> &str {
        self.product_name.as_deref().unwrap_or("")
    }
}

/// 匯出批次中的一筆：檔名與 PNG 內容
#[derive(Debug, Clone)]
pub struct ExportEntry {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Symbol renderer 選項 (對應 format EAN13, width 2, height 34, fontSize 14, margin 8)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolOptions {
    /// 單一模組 (最窄線條) 的寬度
    pub width: u32,
    /// 線條高度
    pub height: u32,
    /// 是否在線條下方顯示數字
    pub display_value: bool,
    pub font_size: u32,
    pub margin: u32,
}

impl Default for SymbolOptions {
    fn default() -> Self {
        Self {
            width: 2,
            height: 34,
            display_value: true,
            font_size: 14,
            margin: 8,
        }
    }
}

/// 合成圖版面參數，單位為邏輯像素 (輸出時再乘以 scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeSettings {
    pub padding: u32,
    pub scale: u32,
    /// 名稱區塊與條碼之間的間距
    pub gap: u32,
    pub line_height: u32,
    pub caption_font_size: f32,
    pub caption_color: String,
    /// 指定名稱字型檔；未指定時從系統字型中找粗體 sans-serif
    pub caption_font: Option<String>,
}

impl Default for CompositeSettings {
    fn default() -> Self {
        Self {
            padding: 20,
            scale: 2,
            gap: 3,
            line_height: 22,
            caption_font_size: 18.0,
            caption_color: "#333333".to_string(),
            caption_font: None,
        }
    }
}

/// 一次執行的結果摘要
#[derive(Debug, Clone)]
pub struct RunReport {
    pub batch: GeneratedBatch,
    pub items: Vec<BarcodeItem>,
    /// 寫出的檔案路徑；dry run 時為 None
    pub output_path: Option<String>,
}

impl RunReport {
    pub fn render_failures(&self) -> usize {
        self.items.iter().filter(|item| item.graphic.is_none()).count()
    }
}
