use crate::core::{BarcodePipeline, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

pub struct BarcodeEngine<P: BarcodePipeline> {
    pipeline: P,
    monitor: PhaseMonitor,
    dry_run: bool,
}

impl<P: BarcodePipeline> BarcodeEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: PhaseMonitor::new(monitor_enabled),
            dry_run: false,
        }
    }

    /// 只產生並列出條碼，不渲染也不寫檔
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Generating barcodes...");
        let batch = self.pipeline.generate().await?;
        tracing::info!("{}", batch.summary());
        self.monitor.log_phase("generate");

        let items = self.pipeline.prepare(&batch)?;
        if self.dry_run {
            tracing::info!("🔍 Dry run, skipping render and export");
            return Ok(RunReport {
                batch,
                items,
                output_path: None,
            });
        }

        tracing::info!("Rendering {} barcodes...", items.len());
        let items = self.pipeline.render(items).await?;
        self.monitor.log_phase("render");

        let selected = items.iter().filter(|item| item.selected).count();
        tracing::info!("Exporting {} selected barcodes...", selected);
        let output_path = self.pipeline.export(&items).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("export");

        Ok(RunReport {
            batch,
            items,
            output_path: Some(output_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BarcodeItem, CodeRecord, GeneratedBatch};
    use crate::utils::error::BarcodeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 記錄每個階段被呼叫的次數
    #[derive(Default)]
    struct CountingPipeline {
        renders: AtomicUsize,
        exports: AtomicUsize,
        fail_export: bool,
    }

    fn record() -> CodeRecord {
        CodeRecord {
            full_code: "4006381333931".to_string(),
            prefix: "400".to_string(),
            prefix_length: 3,
            product_code: "638133393".to_string(),
            product_code_length: 9,
            check_digit: "1".to_string(),
        }
    }

    #[async_trait::async_trait]
    impl BarcodePipeline for CountingPipeline {
        async fn generate(&self) -> Result<GeneratedBatch> {
            Ok(GeneratedBatch {
                records: vec![record()],
                attempts: 1,
                requested: 1,
            })
        }

        fn prepare(&self, batch: &GeneratedBatch) -> Result<Vec<BarcodeItem>> {
            Ok(batch
                .records
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, r)| BarcodeItem::new(i, r))
                .collect())
        }

        async fn render(&self, items: Vec<BarcodeItem>) -> Result<Vec<BarcodeItem>> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(items)
        }

        async fn export(&self, _items: &[BarcodeItem]) -> Result<String> {
            self.exports.fetch_add(1, Ordering::SeqCst);
            if self.fail_export {
                return Err(BarcodeError::encode("no data"));
            }
            Ok("out/barcode_4006381333931.png".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_executes_all_phases() {
        let engine = BarcodeEngine::new(CountingPipeline::default());
        let report = engine.run().await.unwrap();

        assert_eq!(report.batch.records.len(), 1);
        assert_eq!(report.output_path.as_deref(), Some("out/barcode_4006381333931.png"));
        assert_eq!(engine.pipeline.renders.load(Ordering::SeqCst), 1);
        assert_eq!(engine.pipeline.exports.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dry_run_skips_render_and_export() {
        let engine = BarcodeEngine::new(CountingPipeline::default()).with_dry_run(true);
        let report = engine.run().await.unwrap();

        assert!(report.output_path.is_none());
        assert_eq!(report.items.len(), 1);
        assert_eq!(engine.pipeline.renders.load(Ordering::SeqCst), 0);
        assert_eq!(engine.pipeline.exports.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_export_failure_propagates() {
        let engine = BarcodeEngine::new(CountingPipeline {
            fail_export: true,
            ..CountingPipeline::default()
        });
        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, BarcodeError::EncodeError { .. }));
    }
}
