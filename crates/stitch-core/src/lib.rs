//! stitch-core - 分段說話者分離合併核心庫
//!
//! 提供共用資料模型與報告匯出功能。

pub mod exporter;
pub mod types;

pub use exporter::{ExportError, Exporter};
pub use types::*;
