use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::offers::OfferExclusionIndex;
use crate::flex::fold_text;
use crate::{CandidateRecord, JobHuntStatus};

/// 対象卒業年の下限（ハードルール、UI からは切り替え不可）
pub const DEFAULT_MIN_GRADUATION_YEAR: i32 = 2026;

/// 起動時に一度だけ SC_MIN_GRADUATION_YEAR を読む
static MIN_GRADUATION_YEAR: Lazy<i32> = Lazy::new(|| {
    std::env::var("SC_MIN_GRADUATION_YEAR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MIN_GRADUATION_YEAR)
});

/// スカウト状況での絞り込み区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoutStatusFilter {
    /// スカウト送信済み
    Sent,
    /// 未スカウト
    NotScouted,
}

/// 就活フェーズでの絞り込み。newgrad / intern のターゲット集合は
/// Both を介して重なる
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseFilter {
    #[default]
    All,
    NewGrad,
    Intern,
}

impl PhaseFilter {
    fn accepts(&self, status: Option<JobHuntStatus>) -> bool {
        match self {
            PhaseFilter::All => true,
            PhaseFilter::NewGrad => matches!(
                status,
                Some(JobHuntStatus::NewGrad) | Some(JobHuntStatus::Both)
            ),
            PhaseFilter::Intern => matches!(
                status,
                Some(JobHuntStatus::Internship) | Some(JobHuntStatus::Both)
            ),
        }
    }
}

/// 呼び出し側が対話的に書き換えるファセット選択状態
///
/// 各ファセットはデフォルト値（空 / "all" / false）のとき不活性で、
/// 活性なファセットの論理 AND で絞り込む。永続化はしない
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub search_text: String,
    pub graduation_years: HashSet<i32>,
    pub scout_statuses: HashSet<ScoutStatusFilter>,
    pub phase: PhaseFilter,
    pub exclude_offered: bool,
    pub major: Option<String>,
    pub has_internship_experience: bool,
    pub job_type_tags: HashSet<String>,
    /// AND（superset）選択: 候補者が選択スキルを全部持つこと
    pub skills: HashSet<String>,
    /// AND（superset）選択: 候補者が選択資格を全部持つこと
    pub qualifications: HashSet<String>,
    pub desired_position: Option<String>,
    pub genders: HashSet<String>,
    /// 職歴の役職名へのあいまい部分一致（全角スペース正規化あり）
    pub position_titles: HashSet<String>,
    pub desired_work_location: Option<String>,
}

impl FilterState {
    /// 全ファセットを一括で不活性値へ戻す
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 活性な全述語の AND で候補者リストを絞り込む
///
/// 述語は純粋・可換なので適用順は結果に影響しない。全滅はエラーではなく
/// 正常な表示状態
pub fn apply(
    candidates: &[CandidateRecord],
    state: &FilterState,
    scouted_ids: &HashSet<String>,
    offers: &OfferExclusionIndex,
) -> Vec<CandidateRecord> {
    candidates
        .iter()
        .filter(|candidate| matches(candidate, state, scouted_ids, offers))
        .cloned()
        .collect()
}

pub fn matches(
    candidate: &CandidateRecord,
    state: &FilterState,
    scouted_ids: &HashSet<String>,
    offers: &OfferExclusionIndex,
) -> bool {
    meets_minimum_graduation_year(candidate)
        && matches_search_text(candidate, &state.search_text)
        && matches_graduation_years(candidate, &state.graduation_years)
        && matches_scout_statuses(candidate, &state.scout_statuses, scouted_ids)
        && state.phase.accepts(candidate.job_hunt_status)
        && matches_offer_exclusion(candidate, state.exclude_offered, offers)
        && matches_major(candidate, &state.major)
        && matches_internship_flag(candidate, state.has_internship_experience)
        && matches_job_type_tags(candidate, &state.job_type_tags)
        && is_superset(&candidate.skills, &state.skills)
        && is_superset(&candidate.qualifications, &state.qualifications)
        && matches_membership(&candidate.desired_positions, &state.desired_position)
        && matches_genders(candidate, &state.genders)
        && matches_position_titles(candidate, &state.position_titles)
        && matches_membership(&candidate.desired_locations, &state.desired_work_location)
}

/// ハードルール: 対象卒業年未満（または卒業年不明）は常に除外
fn meets_minimum_graduation_year(candidate: &CandidateRecord) -> bool {
    candidate
        .graduation_year
        .is_some_and(|year| year >= *MIN_GRADUATION_YEAR)
}

/// 大学・専攻・職歴テキストを対象とした大文字小文字無視の部分一致
fn matches_search_text(candidate: &CandidateRecord, search_text: &str) -> bool {
    let needle = fold_text(search_text);
    if needle.is_empty() {
        return true;
    }

    let mut haystack = String::new();
    for field in [&candidate.university, &candidate.major] {
        if let Some(value) = field {
            haystack.push_str(value);
            haystack.push(' ');
        }
    }
    for entry in candidate.work_experiences() {
        for field in [&entry.company, &entry.position, &entry.description] {
            if let Some(value) = field {
                haystack.push_str(value);
                haystack.push(' ');
            }
        }
    }

    fold_text(&haystack).contains(&needle)
}

fn matches_graduation_years(candidate: &CandidateRecord, years: &HashSet<i32>) -> bool {
    years.is_empty() || candidate.graduation_year.is_some_and(|y| years.contains(&y))
}

fn matches_scout_statuses(
    candidate: &CandidateRecord,
    statuses: &HashSet<ScoutStatusFilter>,
    scouted_ids: &HashSet<String>,
) -> bool {
    if statuses.is_empty() {
        return true;
    }
    let classification = if scouted_ids.contains(&candidate.id) {
        ScoutStatusFilter::Sent
    } else {
        ScoutStatusFilter::NotScouted
    };
    statuses.contains(&classification)
}

fn matches_offer_exclusion(
    candidate: &CandidateRecord,
    exclude_offered: bool,
    offers: &OfferExclusionIndex,
) -> bool {
    !exclude_offered || !offers.contains(&candidate.id)
}

fn matches_major(candidate: &CandidateRecord, selected: &Option<String>) -> bool {
    match active_choice(selected) {
        None => true,
        Some(major) => candidate.major.as_deref() == Some(major),
    }
}

fn matches_internship_flag(candidate: &CandidateRecord, required: bool) -> bool {
    !required || candidate.has_internship_experience
}

/// タグは交差（OR）判定
fn matches_job_type_tags(candidate: &CandidateRecord, tags: &HashSet<String>) -> bool {
    tags.is_empty() || candidate.job_type_tags.iter().any(|t| tags.contains(t))
}

/// スキル・資格は superset（AND）判定: 選択値を 1 つでも欠けば不合格
fn is_superset(owned: &[String], selected: &HashSet<String>) -> bool {
    selected.iter().all(|s| owned.iter().any(|o| o == s))
}

fn matches_membership(owned: &[String], selected: &Option<String>) -> bool {
    match active_choice(selected) {
        None => true,
        Some(value) => owned.iter().any(|o| o == value),
    }
}

fn matches_genders(candidate: &CandidateRecord, genders: &HashSet<String>) -> bool {
    genders.is_empty()
        || candidate
            .gender
            .as_deref()
            .is_some_and(|g| genders.contains(g))
}

/// 選択した役職名のいずれかが、職歴のいずれかの役職文字列に
/// （全角スペース正規化・trim 済みで）部分一致すれば合格
fn matches_position_titles(candidate: &CandidateRecord, titles: &HashSet<String>) -> bool {
    if titles.is_empty() {
        return true;
    }

    let positions: Vec<String> = candidate
        .work_experiences()
        .filter_map(|e| e.position.as_deref())
        .map(fold_text)
        .collect();

    titles.iter().map(|t| fold_text(t)).any(|needle| {
        !needle.is_empty() && positions.iter().any(|p| p.contains(&needle))
    })
}

/// 単一選択ファセットの活性判定。None と "all"（と空文字）は不活性
fn active_choice(selected: &Option<String>) -> Option<&str> {
    selected
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
}
