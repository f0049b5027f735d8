pub mod date;
pub mod engine;
pub mod flex;
pub mod logging;
pub mod session;
pub mod source;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Commonly used data models for the candidate browsing pipeline.

/// マージ・スコアリング済みの正規化候補者レコード
///
/// 生データの同一 ID 行はマージ後に必ず 1 件へ集約される。
/// 任意項目は欠損時に型相応のデフォルト（None / 空 Vec / false）を持つ。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub id: String,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    /// 卒業年。明示フィールド → 旧フィールド → 卒業月日付からの導出、の優先順で解決済み
    pub graduation_year: Option<i32>,
    pub pitch_title: Option<String>,
    pub pitch_body: Option<String>,
    pub resumes: Vec<ResumeAttachment>,
    pub desired_positions: Vec<String>,
    pub desired_locations: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub work_styles: Vec<String>,
    pub skills: Vec<String>,
    pub qualifications: Vec<String>,
    /// 職種タグ（二次集計から post-merge で付与）
    pub job_type_tags: Vec<String>,
    pub job_hunt_status: Option<JobHuntStatus>,
    pub has_internship_experience: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub completion: CompletionScore,
    /// 最終ログインの表示用ラベル（例: "3日前"）
    pub last_active: String,
}

impl CandidateRecord {
    /// レジュメ添付を 1 件以上持つか（マージ優先判定に使う）
    pub fn has_resume(&self) -> bool {
        !self.resumes.is_empty()
    }

    /// 全レジュメの職歴エントリを平坦化して走査する
    pub fn work_experiences(&self) -> impl Iterator<Item = &WorkExperienceEntry> {
        self.resumes.iter().flat_map(|r| r.work_experiences.iter())
    }
}

/// 候補者に紐づくレジュメ 1 件（現状は高々 1 件だがリストとして保持）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeAttachment {
    pub work_experiences: Vec<WorkExperienceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkExperienceEntry {
    pub company: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
}

/// スカウト送信記録。offer_amount / offer_position のいずれかが
/// 入っていれば「オファー済み」とみなす
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutRecord {
    pub candidate_id: String,
    pub status: ScoutStatus,
    pub offer_amount: Option<i64>,
    pub offer_position: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ScoutRecord {
    pub fn has_offer(&self) -> bool {
        self.offer_amount.is_some() || self.offer_position.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoutStatus {
    #[default]
    Sent,
    Read,
    Replied,
    Declined,
}

impl ScoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoutStatus::Sent => "sent",
            ScoutStatus::Read => "read",
            ScoutStatus::Replied => "replied",
            ScoutStatus::Declined => "declined",
        }
    }
}

/// 候補者の就活フェーズ（本選考・インターン・両方・未開始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobHuntStatus {
    NewGrad,
    Internship,
    Both,
    NotStarted,
}

impl JobHuntStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobHuntStatus::NewGrad => "new_grad",
            JobHuntStatus::Internship => "internship",
            JobHuntStatus::Both => "both",
            JobHuntStatus::NotStarted => "not_started",
        }
    }
}

/// プロフィール充実度。total は 0〜100 の整数。
/// 職歴カテゴリは表示用に算出するが、最終ブレンドへの重みは 0（プロダクト仕様）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionScore {
    pub total: u8,
    pub basic: u8,
    pub pitch: u8,
    pub preference: u8,
    pub work_history: u8,
}
