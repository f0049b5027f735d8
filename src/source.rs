use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{JobHuntStatus, ScoutStatus};

/// 外部ストアからの取得失敗
///
/// エンジン側ではリトライしない（リトライ方針はコラボレータの責務）。
/// 取得失敗時は前回スナップショットを保持したまま呼び出し元へ返す
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("candidate store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to decode {entity} rows: {reason}")]
    Decode {
        entity: &'static str,
        reason: String,
    },
}

/// 候補者テーブルへの書き込み通知。内容は持たず、全量再取得のトリガとしてのみ扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent;

/// データコラボレータ契約
///
/// セッション開始時（および変更通知時）に 3 つの読み取りクエリを発行する。
/// すべて全量スナップショット取得で、増分更新のパスは持たない
pub trait CandidateSource: Send + Sync + 'static {
    /// (a) 候補者行（レジュメのサブコレクション join 済み、join ファンアウトで重複行あり）
    fn fetch_candidates(
        &self,
    ) -> impl Future<Output = Result<Vec<RawCandidateRow>, FetchError>> + Send;

    /// (b) 候補者 ID → 職種タグ一覧の二次集計
    fn fetch_job_type_tags(
        &self,
    ) -> impl Future<Output = Result<Vec<RawJobTagRow>, FetchError>> + Send;

    /// (c) スカウト / オファー記録の全量
    fn fetch_scouts(&self) -> impl Future<Output = Result<Vec<RawScoutRow>, FetchError>> + Send;
}

/// 候補者テーブルの生の 1 行
///
/// 形状が揺れるカラム（scalar | 配列 | JSON 文字列）は `Value` のまま受けて
/// `flex` モジュールでデコードする。ID 以外の欠損はすべて許容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidateRow {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name_kana: Option<String>,
    #[serde(default)]
    pub first_name_kana: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub graduation_year: Value,
    /// 旧スキーマのカラム名。graduation_year が空のときだけ参照する
    #[serde(default)]
    pub grad_year: Value,
    /// 卒業月の日付。年の最終フォールバック
    #[serde(default)]
    pub graduation_month: Option<String>,
    #[serde(default)]
    pub pitch_title: Option<String>,
    #[serde(default)]
    pub pitch_body: Option<String>,
    #[serde(default)]
    pub desired_positions: Value,
    #[serde(default)]
    pub desired_locations: Value,
    #[serde(default)]
    pub preferred_industries: Value,
    #[serde(default)]
    pub work_styles: Value,
    /// 希望条件のネストオブジェクト。直フィールドが空のときのフォールバック
    #[serde(default)]
    pub preferences: Value,
    #[serde(default)]
    pub skills: Value,
    #[serde(default)]
    pub qualifications: Value,
    #[serde(default)]
    pub job_hunt_status: Option<JobHuntStatus>,
    #[serde(default)]
    pub has_internship_experience: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resumes: Vec<RawResumeRow>,
}

/// レジュメの生の 1 行
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResumeRow {
    /// 職歴の直フィールド
    #[serde(default)]
    pub work_experiences: Value,
    /// フォーム下書き。中の work_experiences は直フィールドと連結する（置換しない）
    #[serde(default)]
    pub form_data: Value,
}

/// 候補者 ID → 職種タグの二次集計行
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobTagRow {
    #[serde(default)]
    pub candidate_id: Value,
    #[serde(default)]
    pub tags: Value,
}

/// スカウト / オファー記録の生の 1 行
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScoutRow {
    #[serde(default)]
    pub candidate_id: Value,
    #[serde(default)]
    pub status: Option<ScoutStatus>,
    #[serde(default)]
    pub offer_amount: Option<i64>,
    #[serde(default)]
    pub offer_position: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
