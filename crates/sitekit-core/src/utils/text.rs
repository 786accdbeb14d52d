//! Text and HTML helpers: escaping, tag stripping and word wrapping

/// Escape text for HTML output, or strip its tags when `strip` is set
///
/// # Examples
/// ```
/// use sitekit_core::utils::text::escape;
/// assert_eq!(escape("<a href='x'>Tom & Jerry</a>", false),
///            "&lt;a href=&#039;x&#039;&gt;Tom &amp; Jerry&lt;/a&gt;");
/// assert_eq!(escape("<b>bold</b>", true), "bold");
/// ```
pub fn escape(text: &str, strip: bool) -> String {
    if strip {
        strip_tags(text)
    } else {
        escape_html(text)
    }
}

/// Replace `& < > " '` with their HTML entities
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 10);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Remove HTML tags and comments, keeping the text between them
///
/// A `>` inside a quoted attribute value does not close the tag, and an
/// unclosed tag or comment swallows the rest of the input. A `<` followed by
/// whitespace is kept as text.
///
/// # Examples
/// ```
/// use sitekit_core::utils::text::strip_tags;
/// assert_eq!(strip_tags("<p>Hello <b>World</b></p>"), "Hello World");
/// assert_eq!(strip_tags(r#"<a title="x>y">Link</a>"#), "Link");
/// ```
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let chars: Vec<char> = html.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        // a `<` followed by whitespace or the end of input is plain text
        let opens_tag = chars[i] == '<' && chars.get(i + 1).is_some_and(|c| !c.is_whitespace());
        if !opens_tag {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        if chars[i + 1..].starts_with(&['!', '-', '-']) {
            i += 4;
            while i < len && !chars[i..].starts_with(&['-', '-', '>']) {
                i += 1;
            }
            i += 3;
            continue;
        }

        i += 1;
        let mut quote: Option<char> = None;
        while i < len {
            let ch = chars[i];
            i += 1;
            match (quote, ch) {
                (None, '"' | '\'') => quote = Some(ch),
                (Some(open), _) if open == ch => quote = None,
                (None, '>') => break,
                _ => {}
            }
        }
    }
    result
}

/// Wrap text so lines stay within `width` columns, breaking at spaces
///
/// Existing line breaks are kept. A single word longer than `width` is left
/// whole on its own line.
///
/// # Examples
/// ```
/// use sitekit_core::utils::text::word_wrap;
/// assert_eq!(word_wrap("The quick brown fox", 10), "The quick\nbrown fox");
/// ```
pub fn word_wrap(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::with_capacity(width);
    let mut current_width = 0;
    let mut started = false;

    for word in line.split(' ') {
        let word_width = word.chars().count();
        if current_width > 0 && current_width + 1 + word_width > width {
            // the breaking space is replaced by the newline
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        } else if started {
            current_line.push(' ');
            current_width += 1;
        }
        current_line.push_str(word);
        current_width += word_width;
        started = true;
    }
    lines.push(current_line);
    lines.join("\n")
}

/// Return `value` when present, otherwise the fallback
pub fn ifsetor<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.unwrap_or(fallback)
}
