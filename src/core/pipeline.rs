use crate::adapters::svg_symbol::Ean13SvgRenderer;
use crate::core::batch::generate_batch;
use crate::core::compositor::ImageCompositor;
use crate::core::export::ExportCoordinator;
use crate::core::{BarcodeItem, BarcodePipeline, ConfigProvider, GeneratedBatch, Storage};
use crate::domain::ports::SymbolRenderer;
use crate::utils::error::Result;
use crate::utils::validation::{validate_input, validate_selection};
use std::sync::Arc;

/// 使用者輸入：前綴、數量 (原始字串)、各項目的產品名稱與選取序號 (1-based)
#[derive(Debug, Clone, Default)]
pub struct LabelJob {
    pub prefix: String,
    pub count: String,
    pub names: Vec<String>,
    /// 空白代表全選
    pub selection: Vec<usize>,
}

pub struct LabelPipeline<S: Storage, C: ConfigProvider> {
    config: C,
    job: LabelJob,
    renderer: Box<dyn SymbolRenderer>,
    exporter: ExportCoordinator<S>,
}

impl<S: Storage, C: ConfigProvider> LabelPipeline<S, C> {
    pub fn new(storage: S, config: C, job: LabelJob) -> Result<Self> {
        let compositor = ImageCompositor::new(config.composite_settings().clone())?;
        Ok(Self::with_parts(
            storage,
            config,
            job,
            Box::new(Ean13SvgRenderer::new()),
            Arc::new(compositor),
        ))
    }

    pub fn with_parts(
        storage: S,
        config: C,
        job: LabelJob,
        renderer: Box<dyn SymbolRenderer>,
        compositor: Arc<ImageCompositor>,
    ) -> Self {
        let exporter =
            ExportCoordinator::new(storage, compositor, config.archive_name().to_string());
        Self {
            config,
            job,
            renderer,
            exporter,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> BarcodePipeline for LabelPipeline<S, C> {
    async fn generate(&self) -> Result<GeneratedBatch> {
        let request = validate_input(&self.job.prefix, &self.job.count)?;
        tracing::debug!(
            "Generating {} codes with prefix {:?}",
            request.count,
            request.prefix
        );

        let batch = {
            let mut rng = rand::thread_rng();
            generate_batch(&mut rng, &request)
        };

        if let Some(warning) = batch.shortfall() {
            tracing::warn!("⚠️ {}", warning.user_friendly_message());
        }
        Ok(batch)
    }

    fn prepare(&self, batch: &GeneratedBatch) -> Result<Vec<BarcodeItem>> {
        let selection = validate_selection(&self.job.selection, batch.records.len())?;

        Ok(batch
            .records
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, record)| {
                let mut item = BarcodeItem::new(index, record)
                    .with_product_name(self.job.names.get(index).map(String::as_str));
                item.selected = selection.is_empty() || selection.contains(&index);
                item
            })
            .collect())
    }

    async fn render(&self, mut items: Vec<BarcodeItem>) -> Result<Vec<BarcodeItem>> {
        let options = self.config.symbol_options();
        for item in &mut items {
            // 單一條碼失敗不影響其他項目
            match self.renderer.render(&item.record.full_code, options) {
                Ok(graphic) => item.graphic = Some(graphic),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Barcode {} ({}) could not be rendered: {}",
                        item.index + 1,
                        item.record.full_code,
                        e
                    );
                    item.graphic = None;
                }
            }
        }
        Ok(items)
    }

    async fn export(&self, items: &[BarcodeItem]) -> Result<String> {
        self.exporter.export_selected(items).await
    }
}
