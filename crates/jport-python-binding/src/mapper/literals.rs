//! Field initializer translation
//!
//! Only plain literals are translated. Everything else is kept verbatim and
//! marked untranslated so the generator can emit it as a comment.

use jport_core::MappedInitializer;

pub(crate) fn translate_initializer(text: &str) -> MappedInitializer {
    let text = text.trim();
    match translate_literal(text) {
        Some(translated) => MappedInitializer {
            text: translated,
            untranslated: false,
        },
        None => MappedInitializer {
            text: text.to_string(),
            untranslated: true,
        },
    }
}

fn translate_literal(text: &str) -> Option<String> {
    match text {
        "true" => return Some("True".into()),
        "false" => return Some("False".into()),
        "null" => return Some("None".into()),
        _ => {}
    }

    if is_single_quoted(text, '"') || is_single_quoted(text, '\'') {
        return Some(text.to_string());
    }

    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest.trim_start()),
        None => ("", text),
    };
    translate_number(digits).map(|n| format!("{sign}{n}"))
}

/// True when `text` is exactly one quoted literal, not an expression that
/// merely starts and ends with quotes (`"a" + "b"`).
fn is_single_quoted(text: &str, quote: char) -> bool {
    let mut chars = text.chars();
    if chars.next() != Some(quote) {
        return false;
    }
    let mut escaped = false;
    for (i, c) in chars.as_str().char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return i + c.len_utf8() == text.len() - quote.len_utf8(),
            _ => {}
        }
    }
    false
}

fn translate_number(text: &str) -> Option<String> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        let hex = hex.strip_suffix('l').unwrap_or(hex);
        return (!hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| format!("0x{hex}"));
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        let bin = bin.strip_suffix('l').unwrap_or(bin);
        return (!bin.is_empty() && bin.chars().all(|c| c == '0' || c == '1'))
            .then(|| format!("0b{bin}"));
    }

    if let Some(int) = lower.strip_suffix('l') {
        return translate_integer(int);
    }

    let float_suffix = lower.ends_with(['f', 'd']);
    let body = lower.trim_end_matches(['f', 'd']);
    if body.is_empty() || !body.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    if body.contains(['.', 'e']) {
        return is_float(body).then(|| body.to_string());
    }

    let int = translate_integer(body)?;
    if float_suffix {
        Some(format!("{int}.0"))
    } else {
        Some(int)
    }
}

fn translate_integer(text: &str) -> Option<String> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match text.strip_prefix('0') {
        Some(octal) if !octal.is_empty() => octal
            .chars()
            .all(|c| ('0'..='7').contains(&c))
            .then(|| format!("0o{octal}")),
        _ => Some(text.to_string()),
    }
}

fn is_float(text: &str) -> bool {
    let (mantissa, exponent) = match text.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (text, None),
    };
    let mantissa_ok = {
        let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        !(int.is_empty() && frac.is_empty())
            && int.chars().all(|c| c.is_ascii_digit())
            && frac.chars().all(|c| c.is_ascii_digit())
    };
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && e.chars().all(|c| c.is_ascii_digit())
    });
    mantissa_ok && exponent_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("true", "True")]
    #[case("false", "False")]
    #[case("null", "None")]
    #[case("0", "0")]
    #[case("42", "42")]
    #[case("-7", "-7")]
    #[case("1_000_000", "1000000")]
    #[case("10L", "10")]
    #[case("017", "0o17")]
    #[case("0xFFL", "0xff")]
    #[case("0b1010", "0b1010")]
    #[case("3.14159", "3.14159")]
    #[case("1.0f", "1.0")]
    #[case("2d", "2.0")]
    #[case("1e-3", "1e-3")]
    #[case(".5", ".5")]
    #[case("\"hello\"", "\"hello\"")]
    #[case("\"say \\\"hi\\\"\"", "\"say \\\"hi\\\"\"")]
    #[case("'x'", "'x'")]
    fn test_translates_literal(#[case] source: &str, #[case] expected: &str) {
        let init = translate_initializer(source);
        assert_eq!(init.text, expected);
        assert!(!init.untranslated);
    }

    #[rstest]
    #[case("new HashMap<>()")]
    #[case("\"a\" + \"b\"")]
    #[case("Math.PI * 2")]
    #[case("08")]
    #[case("x")]
    #[case("1.2.3")]
    fn test_keeps_expressions_verbatim(#[case] source: &str) {
        let init = translate_initializer(source);
        assert_eq!(init.text, source);
        assert!(init.untranslated);
    }
}
