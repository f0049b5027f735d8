use std::collections::HashMap;

use crate::CandidateRecord;

/// 同一 ID の行を 1 件へ集約する
///
/// join ファンアウトで同じ候補者が複数行届くのは正常系。採用規則は
/// 「レジュメ添付あり が なし に勝つ」のみで、結果は到着順に依存しない
/// （どの行がレジュメを持つかだけで定まる）。双方がレジュメを持つ場合は
/// 走査順で後勝ちとし、出力は初出順を保つ
pub fn merge_candidates(candidates: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let mut merged: Vec<CandidateRecord> = Vec::with_capacity(candidates.len());
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for incoming in candidates {
        match index_by_id.get(&incoming.id).copied() {
            None => {
                index_by_id.insert(incoming.id.clone(), merged.len());
                merged.push(incoming);
            }
            Some(slot) => {
                // レジュメ付きの行だけが既存行を置き換える。
                // 双方レジュメ付きなら後着採用（許容済みの順序依存）
                if incoming.has_resume() {
                    merged[slot] = incoming;
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResumeAttachment;

    fn bare(id: &str) -> CandidateRecord {
        CandidateRecord {
            id: id.into(),
            ..CandidateRecord::default()
        }
    }

    fn with_resume(id: &str, university: &str) -> CandidateRecord {
        CandidateRecord {
            id: id.into(),
            university: Some(university.into()),
            resumes: vec![ResumeAttachment::default()],
            ..CandidateRecord::default()
        }
    }

    #[test]
    fn resume_presence_wins_regardless_of_arrival_order() {
        let forward = merge_candidates(vec![bare("S1"), with_resume("S1", "慶應義塾大学")]);
        let backward = merge_candidates(vec![with_resume("S1", "慶應義塾大学"), bare("S1")]);

        assert_eq!(forward.len(), 1);
        assert!(forward[0].has_resume());
        assert_eq!(forward, backward);
    }

    #[test]
    fn merging_the_same_row_twice_is_idempotent() {
        let row = with_resume("S1", "東京大学");
        let once = merge_candidates(vec![row.clone()]);
        let twice = merge_candidates(vec![row.clone(), row]);
        assert_eq!(once, twice);
    }

    #[test]
    fn later_resume_row_wins_when_both_have_resumes() {
        let merged = merge_candidates(vec![
            with_resume("S1", "東京大学"),
            with_resume("S1", "京都大学"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].university.as_deref(), Some("京都大学"));
    }

    #[test]
    fn output_preserves_first_appearance_order() {
        let merged = merge_candidates(vec![
            bare("S3"),
            bare("S1"),
            with_resume("S3", "東北大学"),
            bare("S2"),
        ]);
        let ids: Vec<_> = merged.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["S3", "S1", "S2"]);
        assert!(merged[0].has_resume());
    }

    #[test]
    fn existing_resume_is_kept_when_incoming_has_none() {
        let merged = merge_candidates(vec![with_resume("S1", "東京大学"), bare("S1")]);
        assert_eq!(merged[0].university.as_deref(), Some("東京大学"));
    }
}
