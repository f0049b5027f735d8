use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::filter::{self, FilterState};
use super::merge::merge_candidates;
use super::normalizer::{normalize_candidates, normalize_scout};
use super::offers::OfferExclusionIndex;
use super::rank::{self, SortKey};
use super::scoring::score_completion;
use crate::date::humanize_last_active;
use crate::flex;
use crate::source::{RawCandidateRow, RawJobTagRow, RawScoutRow};
use crate::{CandidateRecord, ScoutRecord};

/// 候補者ブラウズの中核エンジン
///
/// 正規化 → マージ → タグ付与 → スコアリング までを build で一度だけ実行して
/// 正準集合として保持し、query では絞り込みと並び替えだけを行う。
/// フィルタ状態の変更ごとに正準集合を再計算しないためのメモ化が build の役割
#[derive(Debug, Clone, Default)]
pub struct CandidateEngine {
    candidates: Vec<CandidateRecord>,
    scouts: Vec<ScoutRecord>,
    scouted_ids: HashSet<String>,
    offers: OfferExclusionIndex,
}

impl CandidateEngine {
    /// 生スナップショット 3 種から正準集合を組み立てる
    ///
    /// now は last_active ラベルの基準時刻。呼び出し側が渡すため
    /// 同一スナップショットに対する結果は決定的
    pub fn build(
        candidate_rows: &[RawCandidateRow],
        tag_rows: &[RawJobTagRow],
        scout_rows: &[RawScoutRow],
        now: DateTime<Utc>,
    ) -> Self {
        let mut candidates = merge_candidates(normalize_candidates(candidate_rows));

        let tags_by_id = tag_map(tag_rows);
        let scouts: Vec<ScoutRecord> = scout_rows.iter().filter_map(normalize_scout).collect();
        let scouted_ids: HashSet<String> =
            scouts.iter().map(|s| s.candidate_id.clone()).collect();
        let offers = OfferExclusionIndex::build(&scouts);

        for candidate in &mut candidates {
            if let Some(tags) = tags_by_id.get(&candidate.id) {
                candidate.job_type_tags = tags.clone();
            }
            candidate.completion = score_completion(candidate);
            candidate.last_active = humanize_last_active(candidate.last_sign_in_at, now);
        }

        Self {
            candidates,
            scouts,
            scouted_ids,
            offers,
        }
    }

    /// 現在のフィルタ状態と並び替えキーで正準集合を問い合わせる。
    /// そのまま表示に渡せる順序付きリストを返す（ページングはしない）
    pub fn query(&self, state: &FilterState, sort_key: SortKey) -> Vec<CandidateRecord> {
        let mut results = filter::apply(&self.candidates, state, &self.scouted_ids, &self.offers);
        rank::rank(&mut results, sort_key);
        results
    }

    /// マージ済み正準集合（絞り込み前）
    pub fn candidates(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    pub fn scouts(&self) -> &[ScoutRecord] {
        &self.scouts
    }

    pub fn offers(&self) -> &OfferExclusionIndex {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// 二次集計行を候補者 ID → タグ一覧へ畳む。同一 ID の複数行は連結
fn tag_map(tag_rows: &[RawJobTagRow]) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for row in tag_rows {
        let Some(id) = flex::id_string(&row.candidate_id) else {
            continue;
        };
        map.entry(id).or_default().extend(flex::string_list(&row.tags));
    }
    map
}
