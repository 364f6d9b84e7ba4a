/// Characters dropped when they end a word.
const TRAILING_PUNCT: [char; 4] = ['.', '?', ',', ';'];

/// Canonicalise a raw token: trim, lower-case, drop the trailing `. ? , ;`.
///
/// Trailing marks are stripped until none remain so that the result is a
/// fixed point (`normalize(normalize(x)) == normalize(x)`). Stripping a
/// single mark would not be: `"wait..."` would give `"wait.."` and change
/// again on a second pass. Index keys for words ending in several marks
/// therefore differ from an export that drops only the last one
/// (`"wait"` here, `"wait.."` there). An empty result is never a valid
/// term; callers skip it.
pub fn normalize(raw: &str) -> String {
    let word = raw.trim().to_lowercase();
    word.trim_end_matches(|c: char| TRAILING_PUNCT.contains(&c) || c.is_whitespace())
        .to_string()
}

/// Split body text on whitespace and normalise every token, skipping empties.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(normalize).filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_trailing_mark() {
        assert_eq!(normalize("  Mat.  "), "mat");
        assert_eq!(normalize("Why?"), "why");
        assert_eq!(normalize("wait..."), "wait");
        assert_eq!(normalize("a ."), "a");
        assert_eq!(normalize("don't!"), "don't!");
        assert_eq!(normalize(";"), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_is_a_fixed_point() {
        for raw in ["Mat.", "a..", "x ;", "HeLLo?", "", " . ", "e.g.", "ÉCOLE,"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn tokenize_sentence() {
        let words: Vec<String> = tokenize("The cat sat on the mat.").collect();
        assert_eq!(words, ["the", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn tokenize_skips_bare_punctuation() {
        let words: Vec<String> = tokenize("a , b ; .").collect();
        assert_eq!(words, ["a", "b"]);
    }
}
