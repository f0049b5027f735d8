use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

/// 動的形状フィールドの寛容デコード
///
/// ソース側のカラムは同じ論理フィールドでも scalar / 配列 / JSON 文字列の
/// いずれかの形で届く。ここで型付きの値へ正規化し、解釈できない入力は
/// エラーにせず空値へ落とす契約（ShapeAmbiguity は例外ではなく設計上の許容）。

/// 文字列 or 数値 → 非空文字列。それ以外は None
pub fn opt_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// ID フィールド用。文字列/数値のどちらで届いても文字列キーへ寄せる
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// scalar | 配列 | JSON 文字列 → 文字列リスト
///
/// - 配列: 文字列要素（と数値要素）を収集
/// - JSON 配列を encode した文字列: デコードして同上
/// - 素の文字列: 1 要素リスト
/// - それ以外（null / object / 壊れた JSON）: 空リスト
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => collect_strings(items),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return vec![];
            }
            if trimmed.starts_with('[') {
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) => collect_strings(&items),
                    _ => vec![],
                }
            } else {
                vec![s.clone()]
            }
        }
        _ => vec![],
    }
}

/// object | JSON 文字列 → object。解釈不能なら空 object
pub fn object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// 配列 | JSON 文字列 → 要素リスト。解釈不能なら空リスト
pub fn value_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            _ => vec![],
        },
        _ => vec![],
    }
}

/// 数値 | 数字文字列 → 年。それ以外は None
pub fn opt_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().map(|v| v as i32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 照合・部分一致用のテキスト折り畳み
///
/// NFKC 正規化で全角英数・全角スペース（U+3000）を半角へ寄せたうえで
/// 小文字化し、前後空白を落とす
pub fn fold_text(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

fn collect_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_list_accepts_plain_arrays() {
        let value = json!(["営業", "エンジニア", 3]);
        assert_eq!(string_list(&value), vec!["営業", "エンジニア", "3"]);
    }

    #[test]
    fn string_list_decodes_json_encoded_arrays() {
        let value = json!("[\"東京\",\"大阪\"]");
        assert_eq!(string_list(&value), vec!["東京", "大阪"]);
    }

    #[test]
    fn string_list_wraps_bare_scalars() {
        assert_eq!(string_list(&json!("マーケティング")), vec!["マーケティング"]);
        assert_eq!(string_list(&json!(null)), Vec::<String>::new());
    }

    #[test]
    fn string_list_degrades_broken_json_to_empty() {
        assert_eq!(string_list(&json!("[\"東京\",")), Vec::<String>::new());
    }

    #[test]
    fn object_decodes_json_strings_and_degrades() {
        let map = object(&json!("{\"desired_positions\":[\"企画\"]}"));
        assert!(map.contains_key("desired_positions"));
        assert!(object(&json!("{broken")).is_empty());
        assert!(object(&json!(42)).is_empty());
    }

    #[test]
    fn id_string_accepts_numbers_and_strings() {
        assert_eq!(id_string(&json!(1024)), Some("1024".into()));
        assert_eq!(id_string(&json!(" S1 ")), Some("S1".into()));
        assert_eq!(id_string(&json!("")), None);
        assert_eq!(id_string(&json!(null)), None);
    }

    #[test]
    fn opt_year_parses_both_shapes() {
        assert_eq!(opt_year(&json!(2027)), Some(2027));
        assert_eq!(opt_year(&json!("2026")), Some(2026));
        assert_eq!(opt_year(&json!("unknown")), None);
    }

    #[test]
    fn fold_text_normalizes_fullwidth_input() {
        assert_eq!(fold_text("　ＰＭ　"), "pm");
        assert_eq!(fold_text("エンジニア　リーダー"), "エンジニア リーダー");
        assert_eq!(fold_text("  Sales Rep "), "sales rep");
    }
}
