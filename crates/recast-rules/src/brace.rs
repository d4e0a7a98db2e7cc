//! Brace-depth scanning used to remove the closing brace of a wrapper block.
//!
//! The scanner is lexical: it understands string literals, template literals
//! (including `${}` interpolation), line comments and block comments, which is
//! enough to keep braces inside those from affecting the depth count. Regular
//! expression literals are not recognised, so a `/}/` pattern in code can throw
//! the count off.

/// Byte offset of the wrapper's closing brace: the outermost `}` left over
/// when code braces are paired from the end of `text` towards its start.
///
/// Pairing from the end keeps the wrapper's brace even when an earlier edit
/// left stray closers behind it, such as the `})` tail of a decorator whose
/// first line was removed. Those strays pair with an opener further up or
/// stay unpaired above the wrapper's brace.
pub fn find_wrapper_close(text: &str) -> Option<usize> {
    let braces = code_braces(text);

    let mut depth = 0usize;
    let mut outermost = None;
    for &(pos, open) in braces.iter().rev() {
        if open {
            depth = depth.saturating_sub(1);
        } else {
            if depth == 0 {
                outermost = Some(pos);
            }
            depth += 1;
        }
    }

    if depth > 0 { outermost } else { None }
}

/// Offsets of every `{` (`true`) and `}` (`false`) that is code, in order.
/// Braces inside strings and comments are skipped, as are the `${` and `}`
/// that delimit template interpolations.
fn code_braces(text: &str) -> Vec<(usize, bool)> {
    let bytes = text.as_bytes();
    let mut braces = Vec::new();
    let mut depth = 0usize;
    // Code depth at which each open `${` interpolation was entered.
    let mut templates: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line_comment(bytes, i + 2);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i + 2);
                continue;
            }
            quote @ (b'\'' | b'"') => {
                i = skip_quoted(bytes, i + 1, quote);
                continue;
            }
            b'`' => {
                i = enter_template(bytes, i + 1, &mut depth, &mut templates);
                continue;
            }
            b'{' => {
                braces.push((i, true));
                depth += 1;
            }
            b'}' => {
                if depth > 0 && templates.last() == Some(&(depth - 1)) {
                    templates.pop();
                    depth -= 1;
                    i = enter_template(bytes, i + 1, &mut depth, &mut templates);
                    continue;
                }
                braces.push((i, false));
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        i += 1;
    }

    braces
}

/// Remove the brace located by [`find_wrapper_close`].
///
/// When the brace sits alone on its line (an optional trailing `;` is
/// allowed) the whole line goes with it, including its terminator. If that
/// line is the last one and has no terminator, the terminator of the line
/// before it is removed instead so no dangling newline is left behind.
/// Returns `None` when every closing brace is paired.
pub fn strip_wrapper_close(text: &str) -> Option<String> {
    let pos = find_wrapper_close(text)?;

    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);

    let alone = text[line_start..pos].trim().is_empty()
        && matches!(text[pos + 1..line_end].trim(), "" | ";");

    let (start, end) = if !alone {
        (pos, pos + 1)
    } else if line_end < text.len() {
        (line_start, line_end + 1)
    } else {
        let head = &text[..line_start];
        let start = if head.ends_with("\r\n") {
            line_start - 2
        } else if head.ends_with('\n') {
            line_start - 1
        } else {
            line_start
        };
        (start, text.len())
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[end..]);
    Some(out)
}

fn skip_line_comment(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

fn skip_block_comment(bytes: &[u8], mut i: usize) -> usize {
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Skip a `'` or `"` string. An unterminated string ends at the newline.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Scan template literal text starting at `i`. Returns the offset after the
/// closing backtick, or after `${` when an interpolation opens (in which case
/// the interpolation is pushed and the depth bumped).
fn enter_template(
    bytes: &[u8],
    mut i: usize,
    depth: &mut usize,
    templates: &mut Vec<usize>,
) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                templates.push(*depth);
                *depth += 1;
                return i + 2;
            }
            _ => i += 1,
        }
    }
    bytes.len()
}
