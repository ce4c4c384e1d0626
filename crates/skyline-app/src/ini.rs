//! Reader for `landscape.ini`, the flat description format of older
//! landscape packages.
//!
//! Produces the `section/key → value` map that
//! [`LandscapeConfig::from_key_values`](skyline_config::LandscapeConfig::from_key_values)
//! interprets.

use std::collections::HashMap;
use std::path::Path;

/// File name of a key/value landscape description.
pub const INI_FILE: &str = "landscape.ini";

/// Parse ini text. Keys outside any section are stored without a prefix;
/// `;` and `#` start comment lines. Later duplicates win. Values are read
/// by [`parse_value`].
pub fn parse_ini(text: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let mut section = String::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = name.trim().to_string();
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            log::warn!("{INI_FILE}:{}: ignoring line without '='", number + 1);
            continue;
        };
        let key = key.trim();
        let value = parse_value(value);
        let full_key = if section.is_empty() {
            key.to_string()
        } else {
            format!("{section}/{key}")
        };
        values.insert(full_key, value);
    }
    values
}

/// Read one value.
///
/// A value that starts with `"` runs to the matching unescaped quote and
/// anything after it is ignored. Otherwise the value runs to the first
/// unescaped `;`, which starts a trailing comment, and other quote marks
/// are kept (`+46d06'10"`). `\"`, `\\`, `\;` and `\#` are unescaped;
/// other escapes such as `\n` are kept as written.
pub fn parse_value(raw: &str) -> String {
    let raw = raw.trim();
    let (body, quoted) = match raw.strip_prefix('"') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(e @ ('"' | '\\' | ';' | '#')) => value.push(e),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            },
            '"' if quoted => return value,
            ';' if !quoted => break,
            c => value.push(c),
        }
    }
    if quoted {
        log::warn!("Unterminated quoted value '{raw}'");
        value
    } else {
        value.trim_end().to_string()
    }
}

/// Read and parse an ini file.
pub fn read_ini(path: &Path) -> std::io::Result<HashMap<String, String>> {
    Ok(parse_ini(&std::fs::read_to_string(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_keys() {
        let values = parse_ini(
            "[landscape]\n\
             name = Guereins\n\
             type=old_style\n\
             ; comment\n\
             # another\n\
             \n\
             [location]\n\
             planet = Earth\n\
             latitude = +46d06'10\"\n",
        );
        assert_eq!(values["landscape/name"], "Guereins");
        assert_eq!(values["landscape/type"], "old_style");
        assert_eq!(values["location/planet"], "Earth");
        assert_eq!(values["location/latitude"], "+46d06'10\"");
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_quoted_values_and_garbage() {
        let values = parse_ini("top = 1\n[landscape]\nauthor = \"A. Person\"\nnot a pair\n");
        assert_eq!(values["top"], "1");
        assert_eq!(values["landscape/author"], "A. Person");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_escapes_and_trailing_comments() {
        assert_eq!(parse_value(r#" "say \"hi\"" ; greeting"#), r#"say "hi""#);
        assert_eq!(parse_value("0.2,0.3,0.1 ; dark green"), "0.2,0.3,0.1");
        assert_eq!(parse_value(r"a\;b"), "a;b");
        assert_eq!(parse_value(r"C:\\land"), r"C:\land");
        assert_eq!(parse_value(r"first\nsecond"), r"first\nsecond");
        assert_eq!(parse_value(r#""keeps ; inside""#), "keeps ; inside");
        assert_eq!(parse_value(r#"+46d06'10""#), r#"+46d06'10""#);
        assert_eq!(parse_value(r#""open"#), "open");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_ini(&dir.path().join(INI_FILE)).is_err());
    }
}
