use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::flex::fold_text;
use crate::CandidateRecord;

/// 並び替えキー。デフォルトは充実度スコア降順
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    /// 充実度スコア降順
    #[default]
    Score,
    /// 登録日時降順
    Recent,
    /// 表示名昇順（かな優先の照合キー）
    Name,
    /// 最終ログイン降順
    LastLogin,
}

/// 絞り込み結果を並び替える
///
/// すべて安定ソート: キーが等しい候補者同士は入力の相対順を保つ。
/// タイムスタンプ欠損は epoch（最古）として扱う
pub fn rank(candidates: &mut [CandidateRecord], key: SortKey) {
    match key {
        SortKey::Score => {
            candidates.sort_by(|a, b| b.completion.total.cmp(&a.completion.total));
        }
        SortKey::Recent => {
            candidates.sort_by(|a, b| {
                timestamp_or_epoch(b.created_at).cmp(&timestamp_or_epoch(a.created_at))
            });
        }
        SortKey::Name => {
            candidates.sort_by_cached_key(collation_key);
        }
        SortKey::LastLogin => {
            candidates.sort_by(|a, b| {
                timestamp_or_epoch(b.last_sign_in_at).cmp(&timestamp_or_epoch(a.last_sign_in_at))
            });
        }
    }
}

fn timestamp_or_epoch(value: Option<DateTime<Utc>>) -> DateTime<Utc> {
    value.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// 姓→名の順に連結した NFKC 折り畳みキー。かな表記があればそちらを優先
fn collation_key(candidate: &CandidateRecord) -> String {
    let last = candidate
        .last_name_kana
        .as_deref()
        .or(candidate.last_name.as_deref())
        .unwrap_or("");
    let first = candidate
        .first_name_kana
        .as_deref()
        .or(candidate.first_name.as_deref())
        .unwrap_or("");
    fold_text(&format!("{last}　{first}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::CompletionScore;

    fn candidate(id: &str, total: u8) -> CandidateRecord {
        CandidateRecord {
            id: id.into(),
            completion: CompletionScore {
                total,
                ..CompletionScore::default()
            },
            ..CandidateRecord::default()
        }
    }

    fn ids(candidates: &[CandidateRecord]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn score_sorts_descending() {
        let mut candidates = vec![candidate("S1", 40), candidate("S2", 90), candidate("S3", 70)];
        rank(&mut candidates, SortKey::Score);
        assert_eq!(ids(&candidates), vec!["S2", "S3", "S1"]);
    }

    #[test]
    fn equal_keys_preserve_input_order() {
        let mut candidates = vec![
            candidate("S1", 50),
            candidate("S2", 80),
            candidate("S3", 50),
            candidate("S4", 50),
        ];
        rank(&mut candidates, SortKey::Score);
        assert_eq!(ids(&candidates), vec!["S2", "S1", "S3", "S4"]);
    }

    #[test]
    fn missing_timestamps_sort_as_oldest() {
        let newer = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let mut candidates = vec![
            CandidateRecord {
                id: "S-missing".into(),
                ..CandidateRecord::default()
            },
            CandidateRecord {
                id: "S-old".into(),
                created_at: Some(older),
                ..CandidateRecord::default()
            },
            CandidateRecord {
                id: "S-new".into(),
                created_at: Some(newer),
                ..CandidateRecord::default()
            },
        ];
        rank(&mut candidates, SortKey::Recent);
        assert_eq!(ids(&candidates), vec!["S-new", "S-old", "S-missing"]);
    }

    #[test]
    fn name_sort_prefers_kana_and_folds_width() {
        let mut candidates = vec![
            CandidateRecord {
                id: "S2".into(),
                last_name: Some("佐藤".into()),
                last_name_kana: Some("サトウ".into()),
                ..CandidateRecord::default()
            },
            CandidateRecord {
                id: "S1".into(),
                last_name: Some("安藤".into()),
                last_name_kana: Some("アンドウ".into()),
                ..CandidateRecord::default()
            },
        ];
        rank(&mut candidates, SortKey::Name);
        assert_eq!(ids(&candidates), vec!["S1", "S2"]);
    }

    #[test]
    fn sort_key_round_trips_through_strings() {
        use std::str::FromStr;
        assert_eq!(SortKey::from_str("lastLogin").unwrap(), SortKey::LastLogin);
        assert_eq!(SortKey::Score.to_string(), "score");
        assert_eq!(SortKey::default(), SortKey::Score);
    }
}
