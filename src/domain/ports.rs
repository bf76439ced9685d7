use crate::domain::model::{
    BarcodeGraphic, BarcodeItem, CompositeSettings, GeneratedBatch, SymbolOptions,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use image::{Rgba, RgbaImage};

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> &str;
    fn symbol_options(&self) -> &SymbolOptions;
    fn composite_settings(&self) -> &CompositeSettings;
}

/// 將數字字串轉成可掃描的向量條碼圖
pub trait SymbolRenderer: Send + Sync {
    fn render(&self, code: &str, options: &SymbolOptions) -> Result<BarcodeGraphic>;
}

/// 壓縮檔產生器：重複 `add_entry`，最後 `finalize` 取得整個檔案內容
pub trait Archiver {
    fn add_entry(&mut self, file_name: &str, data: &[u8]) -> Result<()>;
    fn finalize(self) -> Result<Vec<u8>>;
}

/// 量測一行文字在名稱字型下的寬度 (邏輯像素)
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

/// 在畫布上繪製一行名稱：水平置中於 `center_x`，頂端對齊 `top`，座標為邏輯像素並乘上 `scale`
pub trait CaptionPainter: TextMeasure + Send + Sync {
    fn draw_line(
        &self,
        canvas: &mut RgbaImage,
        scale: f32,
        center_x: f32,
        top: f32,
        color: Rgba<u8>,
        text: &str,
    );
}

#[async_trait]
pub trait BarcodePipeline: Send + Sync {
    async fn generate(&self) -> Result<GeneratedBatch>;
    /// 為每筆條碼建立項目狀態 (名稱、是否選取)
    fn prepare(&self, batch: &GeneratedBatch) -> Result<Vec<BarcodeItem>>;
    async fn render(&self, items: Vec<BarcodeItem>) -> Result<Vec<BarcodeItem>>;
    async fn export(&self, items: &[BarcodeItem]) -> Result<String>;
}
