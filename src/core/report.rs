use crate::core::RunReport;
use crate::utils::error::Result;
use serde_json::json;
use std::fmt::Write;

/// 每個條碼一段：編號、完整碼、前綴/產品代碼/校驗位拆解
pub fn format_text(report: &RunReport) -> String {
    let total = report.items.len();
    let mut out = String::new();
    // 寫入 String 不會失敗
    let _ = writeln!(out, "{}", report.batch.summary());

    for item in &report.items {
        let record = &item.record;
        let _ = writeln!(out);
        let _ = writeln!(out, "Barcode {} / {}: {}", item.index + 1, total, record.full_code);
        if let Some(name) = &item.product_name {
            let _ = writeln!(out, "  Product name:             {}", name);
        }
        let _ = writeln!(
            out,
            "  Prefix ({} digits):        {}",
            record.prefix_length,
            record.prefix_display()
        );
        let _ = writeln!(
            out,
            "  Product code ({} digits):  {}",
            record.product_code_length, record.product_code
        );
        let _ = writeln!(out, "  Check digit (1 digit):    {}", record.check_digit);
    }

    if let Some(path) = &report.output_path {
        let _ = writeln!(out);
        let _ = writeln!(out, "📁 Output saved to: {}", path);
    }
    out
}

pub fn format_json(report: &RunReport) -> Result<String> {
    let items: Vec<_> = report
        .items
        .iter()
        .map(|item| {
            json!({
                "index": item.index + 1,
                "record": item.record,
                "productName": item.product_name,
                "selected": item.selected,
                "rendered": item.graphic.is_some(),
            })
        })
        .collect();

    let value = json!({
        "summary": report.batch.summary(),
        "requested": report.batch.requested,
        "attempts": report.batch.attempts,
        "items": items,
        "output": report.output_path,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
