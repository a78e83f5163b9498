//! Plist helpers over `lexpr` values.
//!
//! Configuration files and recorded frames are keyword plists such as
//! `(:dt 33 :hand :right)`. The default `lexpr` parser reads `:key` as the
//! symbol `":key"` and the elisp parser as a keyword; both are accepted.

use lexpr::Value;

/// Parse one s-expression.
pub fn parse(raw: &str) -> Result<Value, lexpr::parse::Error> {
    lexpr::from_str(raw)
}

fn is_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Keyword(k) => k.as_ref() == key,
        Value::Symbol(s) => s.strip_prefix(':') == Some(key),
        _ => false,
    }
}

/// The value following `:key` in a plist.
pub fn get_value<'a>(plist: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = plist;
    while let Value::Cons(pair) = current {
        if is_key(pair.car(), key) {
            return match pair.cdr() {
                Value::Cons(next) => Some(next.car()),
                _ => None,
            };
        }
        current = pair.cdr();
    }
    None
}

/// Keys present in a plist, in order, without the leading colon.
pub fn keys(plist: &Value) -> Vec<String> {
    list_items(plist)
        .into_iter()
        .step_by(2)
        .filter_map(|v| match v {
            Value::Keyword(k) => Some(k.to_string()),
            Value::Symbol(s) => s.strip_prefix(':').map(str::to_string),
            _ => None,
        })
        .collect()
}

/// Text of an atom: keywords and symbols lose their colon, booleans become
/// `t`/`nil`. Lists have no text.
pub fn atom_text(value: &Value) -> Option<String> {
    match value {
        Value::Keyword(k) => Some(k.to_string()),
        Value::Symbol(s) => Some(s.strip_prefix(':').unwrap_or(s).to_string()),
        Value::String(s) => Some(s.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "t" } else { "nil" }.to_string()),
        Value::Null | Value::Nil => Some("nil".to_string()),
        _ => None,
    }
}

/// Any number as f64.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

pub fn get_keyword(plist: &Value, key: &str) -> Option<String> {
    get_value(plist, key).and_then(atom_text)
}

pub fn get_int(plist: &Value, key: &str) -> Option<i64> {
    match get_value(plist, key)? {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

pub fn get_float(plist: &Value, key: &str) -> Option<f64> {
    get_value(plist, key).and_then(number)
}

/// `nil` and `()` are false, anything else present is true.
pub fn get_bool(plist: &Value, key: &str) -> Option<bool> {
    get_keyword(plist, key).map(|s| s != "nil")
}

/// Elements of a proper list. An atom yields nothing.
pub fn list_items(value: &Value) -> Vec<&Value> {
    let mut items = Vec::new();
    let mut current = value;
    while let Value::Cons(pair) = current {
        items.push(pair.car());
        current = pair.cdr();
    }
    if let Value::Vector(elems) = value {
        items.extend(elems.iter());
    }
    items
}

/// Escape a string for s-expression output.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a string as an s-expression literal.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Render `(:k1 v1 :k2 v2 ...)` from already formatted values.
pub fn format_plist(fields: &[(&str, String)]) -> String {
    let mut s = String::from("(");
    for (i, (key, val)) in fields.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        s.push_str(&format!(":{} {}", key, val));
    }
    s.push(')');
    s
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_keyword_from_plist() {
        let v = parse("(:game :shapes :hand :right)").unwrap();
        assert_eq!(get_keyword(&v, "game"), Some("shapes".to_string()));
        assert_eq!(get_keyword(&v, "hand"), Some("right".to_string()));
        assert_eq!(get_keyword(&v, "missing"), None);
    }

    #[test]
    fn test_get_keyword_string_value() {
        let v = parse("(:shape \"circle\")").unwrap();
        assert_eq!(get_keyword(&v, "shape"), Some("circle".to_string()));
    }

    #[test]
    fn test_hyphenated_keys() {
        let v = parse("(:proximity-threshold 1.2 :smoothing 0.5)").unwrap();
        assert_eq!(get_float(&v, "proximity-threshold"), Some(1.2));
        assert_eq!(get_float(&v, "smoothing"), Some(0.5));
    }

    #[test]
    fn test_key_at_end_has_no_value() {
        let v = parse("(:dt 33 :hand)").unwrap();
        assert!(get_value(&v, "hand").is_none());
    }

    #[test]
    fn test_empty_list() {
        let v = parse("()").unwrap();
        assert_eq!(get_keyword(&v, "dt"), None);
        assert!(list_items(&v).is_empty());
        assert!(keys(&v).is_empty());
    }

    #[test]
    fn test_get_int() {
        let v = parse("(:dt 33 :neg -7 :frac 1.5 :word :x)").unwrap();
        assert_eq!(get_int(&v, "dt"), Some(33));
        assert_eq!(get_int(&v, "neg"), Some(-7));
        assert_eq!(get_int(&v, "frac"), None);
        assert_eq!(get_int(&v, "word"), None);
    }

    #[test]
    fn test_get_float_accepts_integers() {
        let v = parse("(:height 10)").unwrap();
        assert_eq!(get_float(&v, "height"), Some(10.0));
    }

    #[test]
    fn test_get_bool() {
        let v = parse("(:mirror t :other nil)").unwrap();
        assert_eq!(get_bool(&v, "mirror"), Some(true));
        assert_eq!(get_bool(&v, "other"), Some(false));
        assert_eq!(get_bool(&v, "absent"), None);
    }

    #[test]
    fn test_nested_list_items() {
        let v = parse("(:landmarks ((0.1 0.2 0) (0.3 0.4 0.5)))").unwrap();
        let points = list_items(get_value(&v, "landmarks").unwrap());
        assert_eq!(points.len(), 2);
        let second: Vec<f64> = list_items(points[1]).into_iter().filter_map(number).collect();
        assert_eq!(second, vec![0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_keys_in_order() {
        let v = parse("(:b 1 :a 2 :c (1 2))").unwrap();
        assert_eq!(keys(&v), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string("a\\b"), "a\\\\b");
        assert_eq!(quote("x\"y"), "\"x\\\"y\"");
    }

    #[test]
    fn test_format_plist_parses_back() {
        let s = format_plist(&[
            ("smoothing", "0.4".to_string()),
            ("shape", quote("circle")),
            ("mirror-x", "t".to_string()),
        ]);
        assert_eq!(s, "(:smoothing 0.4 :shape \"circle\" :mirror-x t)");
        let v = parse(&s).unwrap();
        assert_eq!(get_float(&v, "smoothing"), Some(0.4));
        assert_eq!(get_keyword(&v, "shape"), Some("circle".to_string()));
        assert_eq!(get_bool(&v, "mirror-x"), Some(true));
    }

    #[test]
    fn test_format_plist_empty() {
        assert_eq!(format_plist(&[]), "()");
    }
}
