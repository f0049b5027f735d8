use super::weights::COMPLETION_WEIGHTS;
use crate::{CandidateRecord, CompletionScore};

/// プロフィール充実度の算出
///
/// 4 カテゴリをそれぞれ整数パーセントに丸めたうえで重み付きブレンドする。
/// 入力が同じなら常に同じ値（乱数・時刻依存なし）
pub fn score_completion(candidate: &CandidateRecord) -> CompletionScore {
    let basic = percentage(
        [
            filled_text(&candidate.last_name),
            filled_text(&candidate.first_name),
            filled_text(&candidate.last_name_kana),
            filled_text(&candidate.first_name_kana),
            filled_text(&candidate.birth_date),
            filled_text(&candidate.gender),
            filled_text(&candidate.address),
        ]
        .iter()
        .filter(|&&filled| filled)
        .count(),
        7,
    );

    let pitch = percentage(
        [
            filled_text(&candidate.pitch_title),
            filled_text(&candidate.pitch_body),
        ]
        .iter()
        .filter(|&&filled| filled)
        .count(),
        2,
    );

    let preference = percentage(
        [
            !candidate.desired_positions.is_empty(),
            !candidate.work_styles.is_empty(),
            !candidate.preferred_industries.is_empty(),
            !candidate.desired_locations.is_empty(),
        ]
        .iter()
        .filter(|&&filled| filled)
        .count(),
        4,
    );

    let work_history = work_history_percentage(candidate);

    let weights = COMPLETION_WEIGHTS;
    let total = (f64::from(basic) * weights.basic
        + f64::from(pitch) * weights.pitch
        + f64::from(preference) * weights.preference
        + f64::from(work_history) * weights.work_history)
        .round() as u8;

    CompletionScore {
        total,
        basic,
        pitch,
        preference,
        work_history,
    }
}

/// 職歴カテゴリ: 全エントリ × 3 必須サブ項目（会社・役職・内容）の充足率。
/// エントリが無ければ 0
fn work_history_percentage(candidate: &CandidateRecord) -> u8 {
    let mut entry_count = 0usize;
    let mut filled = 0usize;

    for entry in candidate.work_experiences() {
        entry_count += 1;
        filled += [
            filled_text(&entry.company),
            filled_text(&entry.position),
            filled_text(&entry.description),
        ]
        .iter()
        .filter(|&&f| f)
        .count();
    }

    if entry_count == 0 {
        return 0;
    }
    percentage(filled, entry_count * 3)
}

fn percentage(filled: usize, out_of: usize) -> u8 {
    (filled as f64 / out_of as f64 * 100.0).round() as u8
}

fn filled_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResumeAttachment, WorkExperienceEntry};

    fn full_candidate() -> CandidateRecord {
        CandidateRecord {
            id: "S1".into(),
            last_name: Some("山田".into()),
            first_name: Some("太郎".into()),
            last_name_kana: Some("ヤマダ".into()),
            first_name_kana: Some("タロウ".into()),
            birth_date: Some("2004-05-01".into()),
            gender: Some("男性".into()),
            address: Some("東京都渋谷区".into()),
            pitch_title: Some("粘り強さ".into()),
            pitch_body: Some("長期インターンで...".into()),
            desired_positions: vec!["営業".into()],
            work_styles: vec!["リモート".into()],
            preferred_industries: vec!["IT".into()],
            desired_locations: vec!["東京".into()],
            ..CandidateRecord::default()
        }
    }

    #[test]
    fn fully_filled_profile_scores_one_hundred() {
        let score = score_completion(&full_candidate());
        assert_eq!(score.basic, 100);
        assert_eq!(score.pitch, 100);
        assert_eq!(score.preference, 100);
        assert_eq!(score.total, 100);
    }

    #[test]
    fn empty_profile_scores_zero() {
        let score = score_completion(&CandidateRecord::default());
        assert_eq!(score.total, 0);
        assert_eq!(score.work_history, 0);
    }

    #[test]
    fn blends_rounded_category_percentages() {
        // basic 3/7 → 43, pitch 1/2 → 50, preference 0/4 → 0
        // total = round(43*0.5 + 50*0.3 + 0*0.2) = round(36.5) = 37
        let candidate = CandidateRecord {
            id: "S1".into(),
            last_name: Some("山田".into()),
            first_name: Some("太郎".into()),
            gender: Some("男性".into()),
            pitch_title: Some("強み".into()),
            ..CandidateRecord::default()
        };
        let score = score_completion(&candidate);
        assert_eq!(score.basic, 43);
        assert_eq!(score.pitch, 50);
        assert_eq!(score.preference, 0);
        assert_eq!(score.total, 37);
    }

    #[test]
    fn work_history_is_computed_but_does_not_move_the_total() {
        let mut candidate = CandidateRecord {
            id: "S1".into(),
            ..CandidateRecord::default()
        };
        let without = score_completion(&candidate);

        candidate.resumes = vec![ResumeAttachment {
            work_experiences: vec![WorkExperienceEntry {
                company: Some("Acme".into()),
                position: Some("Engineer".into()),
                description: Some("Built X".into()),
            }],
        }];
        let with = score_completion(&candidate);

        assert_eq!(with.work_history, 100);
        assert_eq!(without.work_history, 0);
        assert_eq!(with.total, without.total);
    }

    #[test]
    fn partially_filled_work_history_entries_average_out() {
        let candidate = CandidateRecord {
            id: "S1".into(),
            resumes: vec![ResumeAttachment {
                work_experiences: vec![
                    WorkExperienceEntry {
                        company: Some("Acme".into()),
                        position: Some("Engineer".into()),
                        description: None,
                    },
                    WorkExperienceEntry {
                        company: Some("Beta".into()),
                        position: None,
                        description: None,
                    },
                ],
            }],
            ..CandidateRecord::default()
        };
        // 3/6 サブ項目充足 → 50%
        assert_eq!(score_completion(&candidate).work_history, 50);
    }

    #[test]
    fn filling_a_field_never_decreases_the_score() {
        let mut candidate = CandidateRecord {
            id: "S1".into(),
            last_name: Some("山田".into()),
            ..CandidateRecord::default()
        };
        let before = score_completion(&candidate);

        candidate.birth_date = Some("2004-05-01".into());
        let after = score_completion(&candidate);

        assert!(after.basic >= before.basic);
        assert!(after.total >= before.total);
    }

    #[test]
    fn scoring_is_deterministic() {
        let candidate = full_candidate();
        assert_eq!(score_completion(&candidate), score_completion(&candidate));
    }
}
