pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::CliArgs;
pub use self::config::AppConfig;

pub use self::adapters::{Ean13SvgRenderer, LocalStorage, ZipArchiver};
pub use self::core::{
    checksum::compute_check_digit,
    compositor::ImageCompositor,
    engine::BarcodeEngine,
    export::{sanitize_file_name, ExportCoordinator},
    pipeline::{LabelJob, LabelPipeline},
};
pub use self::utils::error::{BarcodeError, Result};
