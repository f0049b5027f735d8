use serde_json::{Map, Value};
use tracing::warn;

use crate::date::year_from_date_str;
use crate::flex;
use crate::source::{RawCandidateRow, RawResumeRow, RawScoutRow};
use crate::{CandidateRecord, ResumeAttachment, ScoutRecord, WorkExperienceEntry};

/// 正規化で行を落とすのは ID 欠損のみ。他の欠損はデフォルト埋めで許容する
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    #[error("candidate row is missing an identity key")]
    MissingId,
}

/// 生の候補者 1 行を正規形へ変換する
///
/// 卒業年は 明示フィールド → 旧フィールド → 卒業月日付からの導出 の優先順。
/// 希望条件 4 カテゴリは直フィールドが非空ならそれを採用し、
/// 空のときだけネストの preferences オブジェクトへフォールバックする
pub fn normalize_candidate(row: &RawCandidateRow) -> Result<CandidateRecord, NormalizeError> {
    let id = flex::id_string(&row.id).ok_or(NormalizeError::MissingId)?;

    let preferences = flex::object(&row.preferences);

    let graduation_year = flex::opt_year(&row.graduation_year)
        .or_else(|| flex::opt_year(&row.grad_year))
        .or_else(|| {
            row.graduation_month
                .as_deref()
                .and_then(year_from_date_str)
        });

    Ok(CandidateRecord {
        id,
        last_name: clean(&row.last_name),
        first_name: clean(&row.first_name),
        last_name_kana: clean(&row.last_name_kana),
        first_name_kana: clean(&row.first_name_kana),
        gender: clean(&row.gender),
        address: clean(&row.address),
        birth_date: clean(&row.birth_date),
        university: clean(&row.university),
        major: clean(&row.major),
        graduation_year,
        pitch_title: clean(&row.pitch_title),
        pitch_body: clean(&row.pitch_body),
        resumes: row.resumes.iter().map(normalize_resume).collect(),
        desired_positions: with_fallback(&row.desired_positions, &preferences, "desired_positions"),
        desired_locations: with_fallback(&row.desired_locations, &preferences, "desired_locations"),
        preferred_industries: with_fallback(
            &row.preferred_industries,
            &preferences,
            "preferred_industries",
        ),
        work_styles: with_fallback(&row.work_styles, &preferences, "work_styles"),
        skills: flex::string_list(&row.skills),
        qualifications: flex::string_list(&row.qualifications),
        job_type_tags: vec![],
        job_hunt_status: row.job_hunt_status,
        has_internship_experience: row.has_internship_experience.unwrap_or(false),
        created_at: row.created_at,
        last_sign_in_at: row.last_sign_in_at,
        completion: Default::default(),
        last_active: String::new(),
    })
}

/// 行単位の正規化を全量に適用する。ID 欠損行は警告ログを残して読み飛ばす
pub fn normalize_candidates(rows: &[RawCandidateRow]) -> Vec<CandidateRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match normalize_candidate(row) {
            Ok(candidate) => Some(candidate),
            Err(err) => {
                warn!(index, error = %err, "dropping malformed candidate row");
                None
            }
        })
        .collect()
}

/// スカウト行の正規化。候補者 ID の無い行は追跡不能なので読み飛ばす
pub fn normalize_scout(row: &RawScoutRow) -> Option<ScoutRecord> {
    let candidate_id = flex::id_string(&row.candidate_id)?;
    Some(ScoutRecord {
        candidate_id,
        status: row.status.unwrap_or_default(),
        offer_amount: row.offer_amount,
        offer_position: row.offer_position.clone(),
        created_at: row.created_at,
    })
}

fn normalize_resume(row: &RawResumeRow) -> ResumeAttachment {
    // 直フィールドとフォーム下書きの職歴は連結する（どちらかで置換しない）
    let mut entries: Vec<WorkExperienceEntry> = flex::value_list(&row.work_experiences)
        .iter()
        .map(work_experience_entry)
        .collect();

    let form = flex::object(&row.form_data);
    if let Some(nested) = form.get("work_experiences") {
        entries.extend(flex::value_list(nested).iter().map(work_experience_entry));
    }

    ResumeAttachment {
        work_experiences: entries,
    }
}

fn work_experience_entry(value: &Value) -> WorkExperienceEntry {
    let map = flex::object(value);
    WorkExperienceEntry {
        company: map.get("company").and_then(flex::opt_string),
        position: map.get("position").and_then(flex::opt_string),
        description: map.get("description").and_then(flex::opt_string),
    }
}

/// 希望条件カテゴリの解決: 直フィールドが非空ならそれを採用し、
/// 空のときだけネストの preferences オブジェクトを見る
fn with_fallback(direct: &Value, preferences: &Map<String, Value>, key: &str) -> Vec<String> {
    let values = flex::string_list(direct);
    if !values.is_empty() {
        return values;
    }
    preferences
        .get(key)
        .map(flex::string_list)
        .unwrap_or_default()
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
