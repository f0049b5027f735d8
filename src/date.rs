use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// 卒業月などの日付文字列から年を導出する
///
/// ソースのエクスポート形式が揃っていないため、RFC3339 / `YYYY-MM-DD` /
/// `YYYY/MM/DD` / `YYYY-MM` を順に試し、どれにも合わなければ None
pub fn year_from_date_str(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive().year());
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.year());
        }
    }
    // YYYY-MM は日を補って解釈
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
        return Some(date.year());
    }

    None
}

/// 最終ログインの表示用ラベルを組み立てる
///
/// now を引数で受けるため同一入力に対して決定的。未来時刻は "たった今" に丸める
pub fn humanize_last_active(last_sign_in: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last) = last_sign_in else {
        return "未ログイン".to_string();
    };

    let elapsed = now.signed_duration_since(last);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "たった今".to_string()
    } else if hours < 1 {
        format!("{minutes}分前")
    } else if days < 1 {
        format!("{hours}時間前")
    } else if days < 30 {
        format!("{days}日前")
    } else if days < 365 {
        format!("{}ヶ月前", days / 30)
    } else {
        format!("{}年前", days / 365)
    }
}
