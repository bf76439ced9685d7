use crate::domain::model::GenerationRequest;
use crate::utils::error::{BarcodeError, Result};
use std::num::IntErrorKind;

/// 前綴最多 8 位數字
pub const MAX_PREFIX_LENGTH: usize = 8;
/// 單次最多產生 50 個條碼
pub const MAX_COUNT: usize = 50;

pub const PREFIX_MESSAGE: &str = "Please enter 0-8 digits (0-9)";
pub const MIN_COUNT_MESSAGE: &str = "Please enter a valid count (at least 1)";
pub const MAX_COUNT_MESSAGE: &str = "Count may not exceed 50";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 驗證使用者輸入的前綴與數量，通過後才會產生任何條碼
pub fn validate_input(prefix: &str, count: &str) -> Result<GenerationRequest> {
    let prefix = prefix.trim();
    if prefix.len() > MAX_PREFIX_LENGTH || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Err(BarcodeError::validation(PREFIX_MESSAGE));
    }

    // 超出整數範圍的正數仍屬「超過上限」
    let count = match count.trim().parse::<i64>() {
        Ok(n) if n >= 1 => n as u64,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            return Err(BarcodeError::validation(MAX_COUNT_MESSAGE))
        }
        _ => return Err(BarcodeError::validation(MIN_COUNT_MESSAGE)),
    };
    if count > MAX_COUNT as u64 {
        return Err(BarcodeError::validation(MAX_COUNT_MESSAGE));
    }

    Ok(GenerationRequest {
        prefix: prefix.to_string(),
        count: count as usize,
    })
}

/// 將 1-based 的選取序號轉成 0-based 索引，並檢查範圍
pub fn validate_selection(selection: &[usize], total: usize) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(selection.len());
    for &n in selection {
        if n == 0 || n > total {
            return Err(BarcodeError::validation(format!(
                "Selection {} is out of range (1-{})",
                n, total
            )));
        }
        if !indices.contains(&(n - 1)) {
            indices.push(n - 1);
        }
    }
    Ok(indices)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BarcodeError::config(format!("{}: path cannot be empty", field_name)));
    }

    if path.contains('\0') {
        return Err(BarcodeError::config(format!(
            "{}: path contains null bytes",
            field_name
        )));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(BarcodeError::config(format!(
            "{}: value must be at least {}",
            field_name, min_value
        )));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BarcodeError::config(format!(
            "{}: value {} must be between {} and {}",
            field_name, value, min, max
        )));
    }
    Ok(())
}
