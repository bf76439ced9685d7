use crate::adapters::zip_archiver::ZipArchiver;
use crate::core::compositor::ImageCompositor;
use crate::domain::model::{BarcodeItem, CodeRecord, ExportEntry, MAX_NAME_CHARS};
use crate::domain::ports::{Archiver, Storage};
use crate::utils::error::{BarcodeError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use tokio::task::JoinSet;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// 移除檔名中不安全的字元，空白 (連續) 換成底線，並截斷至 50 個字元
pub fn sanitize_file_name(name: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(name, "_");
    let replaced = WHITESPACE_RUNS.replace_all(&replaced, "_");
    replaced.chars().take(MAX_NAME_CHARS).collect()
}

/// `名稱_條碼.png`，沒有名稱時為 `barcode_條碼.png`
pub fn file_name_for(record: &CodeRecord, product_name: Option<&str>) -> String {
    match product_name.filter(|n| !n.is_empty()) {
        Some(name) => format!("{}_{}.png", sanitize_file_name(name), record.full_code),
        None => format!("barcode_{}.png", record.full_code),
    }
}

/// 依請求順序配置檔名；重複的檔名在 `.png` 前加上 `_2`、`_3`...
pub fn assign_file_names(items: &[&BarcodeItem]) -> Vec<String> {
    let mut used = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| {
            let base = file_name_for(&item.record, item.product_name.as_deref());
            if used.insert(base.clone()) {
                return base;
            }
            let stem = base.trim_end_matches(".png");
            let mut n = 2;
            loop {
                let candidate = format!("{}_{}.png", stem, n);
                if used.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

/// 將條碼項目合成 PNG 後存成單一檔案或一個 ZIP
pub struct ExportCoordinator<S: Storage> {
    storage: S,
    compositor: Arc<ImageCompositor>,
    archive_name: String,
}

impl<S: Storage> ExportCoordinator<S> {
    pub fn new(storage: S, compositor: Arc<ImageCompositor>, archive_name: String) -> Self {
        Self {
            storage,
            compositor,
            archive_name,
        }
    }

    /// 匯出已選取的項目：一個直接存 PNG，多個打包成 ZIP
    pub async fn export_selected(&self, items: &[BarcodeItem]) -> Result<String> {
        let selected: Vec<&BarcodeItem> = items.iter().filter(|item| item.selected).collect();
        match selected.as_slice() {
            [] => Err(BarcodeError::validation("Please select at least one barcode")),
            [item] => self.export_single(item).await,
            _ => self.export_many(&selected).await,
        }
    }

    pub async fn export_single(&self, item: &BarcodeItem) -> Result<String> {
        let file_name = file_name_for(&item.record, item.product_name.as_deref());
        let data = self
            .compositor
            .composite(item.graphic.as_ref(), item.caption())?;

        tracing::debug!("Writing {} ({} bytes)", file_name, data.len());
        self.storage.write_file(&file_name, &data).await
    }

    /// 所有合成都成功後才組 ZIP；任何一張失敗則整批失敗，不寫出部分結果
    pub async fn export_many(&self, items: &[&BarcodeItem]) -> Result<String> {
        let entries = self.composite_all(items).await?;

        let mut archiver = ZipArchiver::new();
        for entry in &entries {
            archiver.add_entry(&entry.file_name, &entry.data)?;
        }
        let zip_data = archiver.finalize()?;

        tracing::debug!(
            "Writing {} with {} images ({} bytes)",
            self.archive_name,
            entries.len(),
            zip_data.len()
        );
        self.storage.write_file(&self.archive_name, &zip_data).await
    }

    /// 每個項目各自在 blocking task 中合成，彼此不共用可變狀態；順序為完成順序
    pub async fn composite_all(&self, items: &[&BarcodeItem]) -> Result<Vec<ExportEntry>> {
        let names = assign_file_names(items);
        let mut tasks = JoinSet::new();

        for (file_name, item) in names.into_iter().zip(items) {
            let compositor = Arc::clone(&self.compositor);
            let graphic = item.graphic.clone();
            let caption = item.caption().to_string();
            tasks.spawn_blocking(move || {
                compositor
                    .composite(graphic.as_ref(), &caption)
                    .map(|data| ExportEntry { file_name, data })
            });
        }

        let mut entries = Vec::with_capacity(items.len());
        while let Some(joined) = tasks.join_next().await {
            let entry = joined
                .map_err(|e| BarcodeError::composite(format!("composite task failed: {}", e)))??;
            entries.push(entry);
        }
        Ok(entries)
    }
}
