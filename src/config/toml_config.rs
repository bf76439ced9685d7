use crate::adapters::caption_font::parse_hex_color;
use crate::core::ConfigProvider;
use crate::domain::model::{CompositeSettings, SymbolOptions};
use crate::utils::error::{BarcodeError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub symbol: SymbolOptions,
    pub composite: CompositeSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_path: String,
    pub archive_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            archive_name: "barcodes.zip".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| BarcodeError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("symbol.width", self.symbol.width, 1)?;
        validate_positive_number("symbol.height", self.symbol.height, 1)?;
        validate_positive_number("symbol.font_size", self.symbol.font_size, 1)?;

        validate_range("composite.scale", self.composite.scale, 1, 8)?;
        validate_positive_number("composite.line_height", self.composite.line_height, 1)?;
        validate_range(
            "composite.caption_font_size",
            self.composite.caption_font_size,
            1.0,
            200.0,
        )?;
        parse_hex_color(&self.composite.caption_color)?;
        if let Some(font) = &self.composite.caption_font {
            validate_path("composite.caption_font", font)?;
        }

        validate_path("export.output_path", &self.export.output_path)?;
        validate_path("export.archive_name", &self.export.archive_name)?;
        if !self.export.archive_name.ends_with(".zip") {
            return Err(BarcodeError::config(format!(
                "export.archive_name: {} must end with .zip",
                self.export.archive_name
            )));
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl ConfigProvider for AppConfig {
    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn archive_name(&self) -> &str {
        &self.export.archive_name
    }

    fn symbol_options(&self) -> &SymbolOptions {
        &self.symbol
    }

    fn composite_settings(&self) -> &CompositeSettings {
        &self.composite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.symbol.height, 34);
        assert_eq!(config.composite.padding, 20);
        assert_eq!(config.composite.gap, 3);
        assert_eq!(config.export.archive_name, "barcodes.zip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let toml_content = r##"
[symbol]
height = 50
display_value = false

[composite]
caption_color = "#000000"
caption_font = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"

[export]
output_path = "./labels"
"##;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.symbol.height, 50);
        assert!(!config.symbol.display_value);
        assert_eq!(config.symbol.width, 2);
        assert_eq!(config.composite.caption_color, "#000000");
        assert_eq!(config.composite.line_height, 22);
        assert_eq!(config.output_path(), "./labels");
        assert_eq!(config.archive_name(), "barcodes.zip");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EAN_BATCH_TEST_OUTPUT", "/tmp/ean-labels");
        let config = AppConfig::from_toml_str(
            r#"
[export]
output_path = "${EAN_BATCH_TEST_OUTPUT}"
archive_name = "${EAN_BATCH_TEST_UNSET}.zip"
"#,
        )
        .unwrap();
        assert_eq!(config.export.output_path, "/tmp/ean-labels");
        assert_eq!(config.export.archive_name, "${EAN_BATCH_TEST_UNSET}.zip");
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml_str("[symbol\nheight = ").unwrap_err();
        assert!(matches!(err, BarcodeError::ConfigError { .. }));
    }

    #[test]
    fn test_validate_config_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.composite.scale = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.composite.caption_color = "grey".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.export.archive_name = "barcodes.tar".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.symbol.width = 0;
        assert!(config.validate().is_err());
    }
}
