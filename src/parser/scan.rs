//! Character-level helpers shared by the function scanner, the statement
//! classifier, and the expression evaluator
//!
//! There is no tokenizer. Lines are matched by shape, and these helpers answer the
//! few questions the shapes need: is this a word, where does a call's argument list
//! start, and where is the first operator that is not inside a quoted literal.

/// Word characters: ASCII letters, digits, and underscore
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A non-empty run of word characters
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_word_char)
}

/// Split a line shaped like `name(args)` into its name and argument text.
///
/// Whitespace is allowed between the name and the opening parenthesis. The line
/// must end with the closing parenthesis.
pub fn split_call(line: &str) -> Option<(&str, &str)> {
    let name_end = line.find(|c: char| !is_word_char(c))?;
    let name = &line[..name_end];
    if name.is_empty() {
        return None;
    }
    let rest = line[name_end..].trim_start().strip_prefix('(')?;
    let args = rest.strip_suffix(')')?;
    Some((name, args))
}

/// Match `keyword (inner)` with an optional trailing `{`, returning `inner`.
pub fn keyword_group<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?.trim_start();
    let rest = rest.strip_prefix('(')?;
    let rest = match rest.strip_suffix('{') {
        Some(head) => head.trim_end(),
        None => rest,
    };
    let inner = rest.strip_suffix(')')?;
    if inner.trim().is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Byte offsets of every character that sits outside a quoted literal
pub fn unquoted_positions(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote: Option<char> = None;
    text.char_indices().filter(move |&(_, c)| match quote {
        Some(q) => {
            if c == q {
                quote = None;
            }
            false
        }
        None => {
            if c == '"' || c == '\'' {
                quote = Some(c);
                false
            } else {
                true
            }
        }
    })
}

/// Split on commas that are outside quotes and parentheses
pub fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in unquoted_positions(text) {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Net brace depth change contributed by a line, ignoring quoted text
pub fn brace_delta(line: &str) -> isize {
    unquoted_positions(line).fold(0, |depth, (_, c)| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}
