//! 共用類型定義

use serde::{Deserialize, Serialize};

/// 說話者嵌入向量
pub type Embedding = Vec<f64>;

/// 合併結果中 `audioFile` 欄位的固定值
pub const MERGED_AUDIO_FILE: &str = "merged";

/// 說話者分離段落（單一分段輸出中的一筆）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarisationSegment {
    /// 開始時間（秒）
    #[serde(rename = "startTimeSeconds")]
    pub start_time: f64,
    /// 結束時間（秒）
    #[serde(rename = "endTimeSeconds")]
    pub end_time: f64,
    /// 說話者標識
    #[serde(rename = "speakerId")]
    pub speaker_id: String,
    /// 品質分數
    #[serde(rename = "qualityScore")]
    pub quality_score: f64,
    /// 說話者嵌入向量
    pub embedding: Embedding,
}

impl DiarisationSegment {
    /// 計算段落時長（秒）
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// 將段落平移到整段錄音的時間軸
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            start_time: self.start_time + offset,
            end_time: self.end_time + offset,
            ..self.clone()
        }
    }
}

/// 單一分段的說話者分離結果
///
/// 讀取時忽略其他欄位（`audioFile`、`config`、`speakerCount` 等）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// 段落列表
    pub segments: Vec<DiarisationSegment>,
    /// 分段時長（秒）
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: f64,
}

impl ChunkRecord {
    /// 是否不含任何段落
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// 合併設定摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeMetadata {
    /// 固定為 true
    pub merged: bool,
    /// 合併的分段數
    pub chunks: usize,
}

/// 合併後的說話者分離結果
///
/// 與 [`ChunkRecord`] 共用 `segments` / `durationSeconds` 欄位，可再次作為輸入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedDiarisation {
    /// 固定為 "merged"
    #[serde(rename = "audioFile")]
    pub audio_file: String,
    /// 合併設定摘要
    pub config: MergeMetadata,
    /// 總時長（秒）
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: f64,
    /// 依開始時間排序的全域段落
    pub segments: Vec<DiarisationSegment>,
    /// 全域說話者數
    #[serde(rename = "speakerCount")]
    pub speaker_count: usize,
    /// 第一個分段檔案的修改時間（Unix 秒）
    pub timestamp: f64,
}

/// 逐字稿段落
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// 開始時間（秒）
    pub start: f64,
    /// 結束時間（秒）
    pub end: f64,
    /// 文字內容
    pub text: String,
}

impl TranscriptSegment {
    /// 段落中點（秒）
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// 同一說話者連續發言的區段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    /// 說話者標識
    pub speaker: String,
    /// 合併後的文字
    pub text: String,
}
