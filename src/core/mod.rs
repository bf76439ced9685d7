pub mod batch;
pub mod caption;
pub mod checksum;
pub mod compositor;
pub mod engine;
pub mod export;
pub mod generator;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{BarcodeItem, CodeRecord, GeneratedBatch, RunReport};
pub use crate::domain::ports::{BarcodePipeline, ConfigProvider, Storage};
pub use crate::utils::error::Result;
