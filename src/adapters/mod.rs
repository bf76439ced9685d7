// Adapters layer: 對外協作者的具體實作 (symbol renderer, archiver, 字型, 儲存)

pub mod caption_font;
pub mod storage;
pub mod svg_symbol;
pub mod zip_archiver;

pub use caption_font::CaptionFont;
pub use storage::LocalStorage;
pub use svg_symbol::Ean13SvgRenderer;
pub use zip_archiver::ZipArchiver;
