/// Maps the character after a backslash to the character it stands for.
const fn unescape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{8}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Replaces every escape pair in one left to right pass.
fn decode_pass(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\'
           && let Some(&next) = chars.peek()
           && let Some(replacement) = unescape(next)
        {
            chars.next();
            decoded.push(replacement);
            continue;
        }
        decoded.push(c);
    }

    decoded
}

/// Decodes the escape sequences `\b \n \r \t \' \" \\`.
///
/// Passes are repeated until the text stops shrinking, so the result never
/// contains a decodable pair and decoding it again is a no-op. A backslash
/// followed by anything else is kept as is.
///
/// # Example
/// ```
/// use plc::util::escape::decode_escapes;
///
/// assert_eq!(decode_escapes(r"a\nb"), "a\nb");
/// assert_eq!(decode_escapes(&decode_escapes(r"a\nb")), "a\nb");
/// assert_eq!(decode_escapes(r"\q"), r"\q");
/// ```
#[must_use]
pub fn decode_escapes(text: &str) -> String {
    let mut current = text.to_string();

    while current.contains('\\') {
        let next = decode_pass(&current);
        if next.len() == current.len() {
            break;
        }
        current = next;
    }

    current
}

/// Strips the first and last character of a quoted literal and decodes the
/// remainder.
///
/// # Example
/// ```
/// use plc::util::escape::unquote;
///
/// assert_eq!(unquote(r#""say \"hi\"""#), "say \"hi\"");
/// assert_eq!(unquote("'x'"), "x");
/// ```
#[must_use]
pub fn unquote(literal: &str) -> String {
    let mut chars = literal.chars();
    chars.next();
    chars.next_back();
    decode_escapes(chars.as_str())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r"\b", "\u{8}")]
    #[case(r"\n", "\n")]
    #[case(r"\r", "\r")]
    #[case(r"\t", "\t")]
    #[case(r"\'", "'")]
    #[case(r#"\""#, "\"")]
    #[case(r"\\", "\\")]
    #[case(r"plain", "plain")]
    #[case(r"tab\there", "tab\there")]
    fn decodes_each_escape(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_escapes(input), expected);
    }

    #[test]
    fn decoding_reaches_a_fixpoint() {
        let once = decode_escapes(r"a\\nb");
        assert_eq!(once, "a\nb");
        assert_eq!(decode_escapes(&once), once);
    }

    #[test]
    fn unknown_escapes_survive() {
        assert_eq!(decode_escapes(r"c:\path"), "c:\\path");
    }

    #[test]
    fn unquote_strips_delimiters() {
        assert_eq!(unquote(r#""""#), "");
        assert_eq!(unquote(r"'\n'"), "\n");
        assert_eq!(unquote(r#""\\""#), "\\");
    }
}
