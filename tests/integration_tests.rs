use ean_batch::core::checksum::is_valid_ean13;
use ean_batch::domain::model::CompositeSettings;
use ean_batch::{
    AppConfig, BarcodeEngine, BarcodeError, Ean13SvgRenderer, ImageCompositor, LabelJob,
    LabelPipeline, LocalStorage,
};
use resvg::usvg::fontdb;
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

fn config_for(output_path: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.export.output_path = output_path.to_string();
    config
}

fn job(prefix: &str, count: &str) -> LabelJob {
    LabelJob {
        prefix: prefix.to_string(),
        count: count.to_string(),
        ..LabelJob::default()
    }
}

/// 不載入系統字型，結果不受執行環境影響
fn pipeline(output_path: &str, job: LabelJob) -> LabelPipeline<LocalStorage, AppConfig> {
    let compositor = ImageCompositor::from_parts(
        CompositeSettings::default(),
        fontdb::Database::new(),
        None,
    )
    .unwrap();
    LabelPipeline::with_parts(
        LocalStorage::new(output_path.to_string()),
        config_for(output_path),
        job,
        Box::new(Ean13SvgRenderer::new()),
        Arc::new(compositor),
    )
}

#[tokio::test]
async fn test_end_to_end_batch_export() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let engine = BarcodeEngine::new(pipeline(&output_path, job("690", "5")));
    let report = engine.run().await.unwrap();

    assert_eq!(report.batch.records.len(), 5);
    assert!(report.batch.shortfall().is_none());
    assert!(report.items.iter().all(|item| item.graphic.is_some()));

    let written = report.output_path.unwrap();
    assert!(written.ends_with("barcodes.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("barcodes.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 5);

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let name = file.name().to_string();
        assert!(name.starts_with("barcode_690"), "{}", name);
        assert!(name.ends_with(".png"));
        let code = &name["barcode_".len()..name.len() - ".png".len()];
        assert!(is_valid_ean13(code));

        let mut png = Vec::new();
        file.read_to_end(&mut png).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        // 預設條碼 220x66，padding 20，scale 2
        assert_eq!((img.width(), img.height()), (520, 212));
    }
}

#[tokio::test]
async fn test_single_selection_writes_one_png() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut job = job("", "3");
    job.selection = vec![2];
    let engine = BarcodeEngine::new(pipeline(&output_path, job));
    let report = engine.run().await.unwrap();

    let expected = format!("barcode_{}.png", report.batch.records[1].full_code);
    assert!(report.output_path.unwrap().ends_with(&expected));
    assert!(temp_dir.path().join(&expected).exists());
    assert!(!temp_dir.path().join("barcodes.zip").exists());

    let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let engine = BarcodeEngine::new(pipeline(&output_path, job("12345678", "50"))).with_dry_run(true);
    let report = engine.run().await.unwrap();

    assert_eq!(report.batch.records.len(), 50);
    assert!(report.output_path.is_none());
    assert!(!std::path::Path::new(&output_path).exists());
}

#[tokio::test]
async fn test_invalid_request_has_no_side_effects() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    for (prefix, count) in [("abc", "5"), ("123", "0"), ("123", "51")] {
        let engine = BarcodeEngine::new(pipeline(&output_path, job(prefix, count)));
        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, BarcodeError::ValidationError { .. }));
    }
    assert!(!std::path::Path::new(&output_path).exists());
}

#[tokio::test]
async fn test_caption_without_font_aborts_batch() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut job = job("400", "2");
    job.names = vec!["Green tea".to_string()];
    let engine = BarcodeEngine::new(pipeline(&output_path, job));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, BarcodeError::CompositeError { .. }));
    assert!(!temp_dir.path().join("barcodes.zip").exists());
}

#[tokio::test]
async fn test_pipeline_with_system_fonts_exports_unnamed_codes() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let pipeline = LabelPipeline::new(
        LocalStorage::new(output_path.clone()),
        config_for(&output_path),
        job("4", "2"),
    )
    .unwrap();
    let report = BarcodeEngine::new(pipeline).run().await.unwrap();

    assert!(report.output_path.unwrap().ends_with("barcodes.zip"));
    assert!(temp_dir.path().join("barcodes.zip").exists());
}

#[tokio::test]
async fn test_unreadable_caption_font_only_blocks_named_exports() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let mut config = config_for(&output_path);
    config.composite.caption_font = Some("/nonexistent/caption.ttf".to_string());

    // 沒有產品名稱：不需要字型，照常匯出
    let pipeline = LabelPipeline::new(
        LocalStorage::new(output_path.clone()),
        config.clone(),
        job("400", "2"),
    )
    .unwrap();
    let report = BarcodeEngine::new(pipeline).run().await.unwrap();
    assert!(report.output_path.unwrap().ends_with("barcodes.zip"));

    // 有產品名稱：回報字型錯誤
    let mut named = job("400", "1");
    named.names = vec!["Green tea".to_string()];
    let pipeline =
        LabelPipeline::new(LocalStorage::new(output_path.clone()), config, named).unwrap();
    let err = BarcodeEngine::new(pipeline).run().await.unwrap_err();
    match err {
        BarcodeError::CompositeError { message } => {
            assert!(message.contains("/nonexistent/caption.ttf"), "{}", message)
        }
        other => panic!("expected composite error, got {:?}", other),
    }
}
