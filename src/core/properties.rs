use crate::domain::model::{Coordinate, CoordinateScheme, KEY_ARTIFACT_ID, KEY_GROUP_ID, KEY_VERSION};
use crate::utils::error::{Result, SourceRefError};
use std::collections::HashMap;
use std::io::Read;

/// Reads a `pom.properties` stream into a maven coordinate. Absent keys stay
/// absent; the caller decides how to treat incomplete records.
pub fn read_coordinate<R: Read>(reader: R) -> Result<Coordinate> {
    let mut properties = load(reader)?;
    Ok(Coordinate::new(
        CoordinateScheme::Maven,
        properties.remove(KEY_GROUP_ID),
        properties.remove(KEY_ARTIFACT_ID),
        properties.remove(KEY_VERSION),
    ))
}

/// Parses the line-oriented `key = value` property format used by build
/// tools: ISO-8859-1 bytes, `#`/`!` comments, backslash continuation lines,
/// `=`/`:`/whitespace separators and the usual escape sequences.
pub fn load<R: Read>(mut reader: R) -> Result<HashMap<String, String>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    // ISO-8859-1: every byte is the code point of the same value
    let text: String = bytes.iter().map(|&b| b as char).collect();
    parse(&text)
}

fn parse(text: &str) -> Result<HashMap<String, String>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = text.split('\n').collect();

    let mut properties = HashMap::new();
    let mut i = 0;
    while i < lines.len() {
        let line = strip_leading_whitespace(lines[i]);
        i += 1;
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) && i < lines.len() {
            logical.pop();
            logical.push_str(strip_leading_whitespace(lines[i]));
            i += 1;
        }
        if ends_with_continuation(&logical) {
            logical.pop();
        }

        let (key, value) = split_entry(&logical)?;
        properties.insert(key, value);
    }
    Ok(properties)
}

fn strip_leading_whitespace(line: &str) -> &str {
    line.trim_start_matches([' ', '\t', '\x0c'])
}

/// A line continues when it ends with an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn split_entry(line: &str) -> Result<(String, String)> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();

    // key ends at the first unescaped separator
    let mut key_end = n;
    let mut explicit_separator = false;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            key_end = i;
            explicit_separator = true;
            break;
        } else if matches!(c, ' ' | '\t' | '\x0c') {
            key_end = i;
            break;
        }
    }
    let key = unescape(&chars[..key_end])?;

    let mut v = key_end;
    if explicit_separator {
        v += 1;
    } else {
        while v < n && matches!(chars[v], ' ' | '\t' | '\x0c') {
            v += 1;
        }
        if v < n && (chars[v] == '=' || chars[v] == ':') {
            v += 1;
        }
    }
    while v < n && matches!(chars[v], ' ' | '\t' | '\x0c') {
        v += 1;
    }
    let value = unescape(&chars[v..])?;

    Ok((key, value))
}

fn unescape(chars: &[char]) -> Result<String> {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        if i >= chars.len() {
            break;
        }
        let escape = chars[i];
        i += 1;
        match escape {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                if i + 4 > chars.len() {
                    return Err(SourceRefError::MalformedMetadata {
                        reason: "truncated \\u escape".to_string(),
                    });
                }
                let hex: String = chars[i..i + 4].iter().collect();
                i += 4;
                let code = u32::from_str_radix(&hex, 16).map_err(|_| {
                    SourceRefError::MalformedMetadata {
                        reason: format!("invalid \\u escape '\\u{hex}'"),
                    }
                })?;
                let decoded =
                    char::from_u32(code).ok_or_else(|| SourceRefError::MalformedMetadata {
                        reason: format!("invalid \\u escape '\\u{hex}'"),
                    })?;
                out.push(decoded);
            }
            // other escaped characters collapse to the character itself
            other => out.push(other),
        }
    }
    Ok(out)
}
