use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Natural ("alphanumeric") ordering of frame file names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

/// Split a name into alternating runs of ASCII digits and other text.
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(chunk(&s[start..], prev));
    }
    out
}

fn chunk(run: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(run)
    } else {
        Chunk::Text(run)
    }
}

/// Compare digit runs by integer value without parsing (no overflow).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural order: digit runs compare by value, text runs case-insensitively.
///
/// At the same position a digit run sorts before text, and a name that is a
/// prefix of another sorts first. Names equal under those rules fall back to
/// plain byte order so the result is a total order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    for (x, y) in ca.iter().zip(&cb) {
        let ord = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len()).then_with(|| a.cmp(b))
}

/// Sort names in natural order (stable).
pub fn natural_sort<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_by_value() {
        let mut names = vec!["2.png", "10.png", "1.png"];
        natural_sort(&mut names);
        assert_eq!(names, ["1.png", "2.png", "10.png"]);
    }

    #[test]
    fn text_compares_case_insensitively() {
        let mut names = vec!["mar.png", "Feb.png", "jan.png"];
        natural_sort(&mut names);
        assert_eq!(names, ["Feb.png", "jan.png", "mar.png"]);
    }

    #[test]
    fn mixed_names_compare_run_by_run() {
        let mut names = vec!["frame10b", "frame2", "frame10a", "Frame1"];
        natural_sort(&mut names);
        assert_eq!(names, ["Frame1", "frame2", "frame10a", "frame10b"]);
    }

    #[test]
    fn digits_sort_before_text_and_prefixes_first() {
        assert_eq!(natural_cmp("1", "a"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abc1"), Ordering::Less);
    }

    #[test]
    fn huge_numbers_do_not_overflow() {
        let big = "123456789012345678901234567890";
        let bigger = "923456789012345678901234567890";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
        // equal by value; byte order breaks the tie
        assert_eq!(natural_cmp("007", "7"), Ordering::Less);
        assert_eq!(natural_cmp("7", "007"), Ordering::Greater);
    }

    #[test]
    fn chunks_split_digit_runs() {
        assert_eq!(
            chunks("1896 Summer"),
            vec![Chunk::Digits("1896"), Chunk::Text(" Summer")]
        );
        assert!(chunks("").is_empty());
    }
}
