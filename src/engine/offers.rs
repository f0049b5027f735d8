use std::collections::HashSet;

use crate::ScoutRecord;

/// オファー済み候補者の除外インデックス
///
/// スカウト記録のうち offer_amount / offer_position のどちらかが入っている
/// 候補者 ID の集合。メンバーシップ判定は O(1)。スナップショット更新のたびに
/// 作り直す（増分更新はしない）
#[derive(Debug, Clone, Default)]
pub struct OfferExclusionIndex {
    offered: HashSet<String>,
}

impl OfferExclusionIndex {
    pub fn build(scouts: &[ScoutRecord]) -> Self {
        let offered = scouts
            .iter()
            .filter(|s| s.has_offer())
            .map(|s| s.candidate_id.clone())
            .collect();
        Self { offered }
    }

    pub fn contains(&self, candidate_id: &str) -> bool {
        self.offered.contains(candidate_id)
    }

    pub fn len(&self) -> usize {
        self.offered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoutStatus;

    fn scout(id: &str, amount: Option<i64>, position: Option<&str>) -> ScoutRecord {
        ScoutRecord {
            candidate_id: id.into(),
            status: ScoutStatus::Sent,
            offer_amount: amount,
            offer_position: position.map(Into::into),
            created_at: None,
        }
    }

    #[test]
    fn membership_requires_an_offer_field() {
        let index = OfferExclusionIndex::build(&[
            scout("S1", Some(4_200_000), None),
            scout("S2", None, Some("ソフトウェアエンジニア")),
            scout("S3", None, None),
        ]);

        assert!(index.contains("S1"));
        assert!(index.contains("S2"));
        assert!(!index.contains("S3"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn any_single_offered_record_marks_the_candidate() {
        let index = OfferExclusionIndex::build(&[
            scout("S1", None, None),
            scout("S1", Some(3_800_000), None),
        ]);
        assert!(index.contains("S1"));
    }
}
