//! gettext `.po` reader

use super::catalog::MessageCatalog;
use crate::error::I18nError;

#[derive(Debug, Default)]
struct PoEntry {
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Vec<String>,
}

/// Which string a continuation line extends
#[derive(Debug, Clone, Copy)]
enum Target {
    None,
    Id,
    Plural,
    Str(usize),
    /// `msgctxt` is read but not kept
    Context,
}

impl PoEntry {
    fn flush_into(&mut self, catalog: &mut MessageCatalog) {
        let entry = std::mem::take(self);
        // The header has an empty msgid
        let Some(msgid) = entry.msgid.filter(|id| !id.is_empty()) else {
            return;
        };
        if entry.msgid_plural.is_some() {
            catalog.add_plural(msgid, entry.msgstr);
        } else if let Some(translation) = entry.msgstr.into_iter().next() {
            catalog.add_translation(msgid, translation);
        }
    }
}

/// Parse `.po` contents into a catalog for `locale`
pub fn parse_po(content: &str, locale: &str) -> Result<MessageCatalog, I18nError> {
    let mut catalog = MessageCatalog::new(locale);
    let mut entry = PoEntry::default();
    let mut target = Target::None;

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(value) = keyword_value(trimmed, "msgid_plural") {
            entry.msgid_plural = Some(unquote(value, line_no)?);
            target = Target::Plural;
        } else if let Some(value) = keyword_value(trimmed, "msgid") {
            if entry.msgid.is_some() {
                entry.flush_into(&mut catalog);
            }
            entry.msgid = Some(unquote(value, line_no)?);
            target = Target::Id;
        } else if let Some(rest) = trimmed.strip_prefix("msgstr[") {
            let (index, value) = rest.split_once(']').ok_or_else(|| I18nError::Parse {
                line: line_no,
                message: "unterminated msgstr index".to_string(),
            })?;
            let index: usize = index.parse().map_err(|_| I18nError::Parse {
                line: line_no,
                message: format!("bad msgstr index '{}'", index),
            })?;
            if entry.msgstr.len() <= index {
                entry.msgstr.resize(index + 1, String::new());
            }
            entry.msgstr[index] = unquote(value.trim(), line_no)?;
            target = Target::Str(index);
        } else if let Some(value) = keyword_value(trimmed, "msgstr") {
            entry.msgstr = vec![unquote(value, line_no)?];
            target = Target::Str(0);
        } else if trimmed.starts_with('"') {
            let value = unquote(trimmed, line_no)?;
            let extended = match target {
                Target::Id => entry.msgid.as_mut(),
                Target::Plural => entry.msgid_plural.as_mut(),
                Target::Str(i) => entry.msgstr.get_mut(i),
                Target::Context => continue,
                Target::None => None,
            };
            match extended {
                Some(existing) => existing.push_str(&value),
                None => {
                    return Err(I18nError::Parse {
                        line: line_no,
                        message: "string outside of an entry".to_string(),
                    });
                }
            }
        } else if keyword_value(trimmed, "msgctxt").is_some() {
            target = Target::Context;
        } else {
            return Err(I18nError::Parse {
                line: line_no,
                message: format!("unexpected '{}'", trimmed),
            });
        }
    }

    entry.flush_into(&mut catalog);
    log::debug!("Parsed {} messages for locale {}", catalog.len(), locale);
    Ok(catalog)
}

fn keyword_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    rest.starts_with([' ', '\t']).then(|| rest.trim())
}

fn unquote(value: &str, line: usize) -> Result<String, I18nError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|_| value.len() >= 2)
        .ok_or_else(|| I18nError::Parse {
            line,
            message: format!("expected a quoted string, found {}", value),
        })?;
    Ok(unescape(inner))
}

fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# French translations
msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"

#: lib/auth.php:12
msgid "You must enter a valid login ID and password to access this resource."
msgstr "Vous devez saisir un identifiant et un mot de passe valides."

msgid "Hello %0%"
msgstr "Bonjour %0%"

msgid "Long "
"message"
msgstr "Message "
"long"

msgid "%n% file"
msgid_plural "%n% files"
msgstr[0] "%n% fichier"
msgstr[1] "%n% fichiers"
"#;

    #[test]
    fn test_parse_po() {
        let catalog = parse_po(SAMPLE, "fr").expect("parse");

        assert_eq!(catalog.get("Hello %0%"), Some("Bonjour %0%"));
        assert_eq!(catalog.get("Long message"), Some("Message long"));
        assert_eq!(
            catalog.get("You must enter a valid login ID and password to access this resource."),
            Some("Vous devez saisir un identifiant et un mot de passe valides.")
        );
        assert_eq!(catalog.get_plural("%n% file", 3), Some("%n% fichiers"));
        assert_eq!(catalog.get(""), None);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\"b\\c\nd"#), "a\"b\\c\nd");
        assert_eq!(unescape(r"\x"), r"\x");
    }

    #[test]
    fn test_parse_errors_report_line() {
        let result = parse_po("msgid \"a\"\nmsgstr b\n", "fr");
        assert!(matches!(result, Err(I18nError::Parse { line: 2, .. })));

        let result = parse_po("\"orphan\"\n", "fr");
        assert!(matches!(result, Err(I18nError::Parse { line: 1, .. })));

        let result = parse_po("msgid \"a\"\nmsgstr[x] \"b\"\n", "fr");
        assert!(matches!(result, Err(I18nError::Parse { line: 2, .. })));
    }
}
