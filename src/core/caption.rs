use crate::domain::ports::TextMeasure;

/// 逐字換行 (以單一字元為單位，不是以單字)，適合沒有空白分詞的文字。
///
/// 目前行加上下一個字元後若超過 `max_width`，且目前行不是空的，就換行；
/// 因此即使單一字元已超過寬度，每一行至少仍有一個字元。
pub fn wrap_text<M: TextMeasure + ?Sized>(measure: &M, text: &str, max_width: f32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);

        if measure.measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// 名稱區塊的版面：各行文字與總高度
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<String>,
    pub height: u32,
}

impl CaptionLayout {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            height: 0,
        }
    }

    pub fn new<M: TextMeasure + ?Sized>(
        measure: &M,
        text: &str,
        max_width: f32,
        line_height: u32,
    ) -> Self {
        let lines = wrap_text(measure, text, max_width);
        let height = lines.len() as u32 * line_height;
        Self { lines, height }
    }
}
