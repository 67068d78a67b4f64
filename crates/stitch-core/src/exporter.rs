//! 報告匯出模組

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::types::{MergedDiarisation, SpeakerTurn};

/// 匯出錯誤
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO 錯誤: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 序列化錯誤: {0}")]
    Json(#[from] serde_json::Error),
}

/// 報告匯出器
pub struct Exporter;

impl Exporter {
    /// 匯出合併後的 JSON 結果
    pub fn to_json<P: AsRef<Path>>(
        merged: &MergedDiarisation,
        output_path: P,
        pretty: bool,
    ) -> Result<(), ExportError> {
        let output_path = output_path.as_ref();

        // 確保目錄存在
        Self::ensure_parent(output_path)?;

        let json = if pretty {
            serde_json::to_string_pretty(merged)?
        } else {
            serde_json::to_string(merged)?
        };

        fs::write(output_path, json)?;
        debug!("Wrote merged diarisation to {}", output_path.display());
        Ok(())
    }

    /// 匯出帶說話者標籤的 Markdown 逐字稿
    pub fn to_markdown<P: AsRef<Path>>(
        turns: &[SpeakerTurn],
        output_path: P,
    ) -> Result<(), ExportError> {
        let output_path = output_path.as_ref();

        Self::ensure_parent(output_path)?;

        fs::write(output_path, Self::format_markdown(turns))?;
        debug!("Wrote {} speaker turns to {}", turns.len(), output_path.display());
        Ok(())
    }

    /// 格式化為 Markdown
    ///
    /// 每個區段一行 `**Speaker X:** 文字`，區段之間空一行，結尾不加換行。
    pub fn format_markdown(turns: &[SpeakerTurn]) -> String {
        turns
            .iter()
            .map(|turn| format!("**Speaker {}:** {}", turn.speaker, turn.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn ensure_parent(path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
