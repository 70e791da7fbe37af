use crate::checker::dictionary::Dictionary;
use std::collections::HashSet;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
const MAX_DISTANCE: usize = 2;

/// Generate spelling suggestions for a lowercase word, best first.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    if max_suggestions == 0 || word.is_empty() {
        return Vec::new();
    }

    let mut candidates = HashSet::new();

    // 1. Single edits that land on a real word (fast, most precise)
    for edit in single_edits(word) {
        if dictionary.contains(&edit) {
            candidates.insert(edit);
        }
    }

    // 2. Prefix neighbourhood, longest prefix first
    let chars: Vec<char> = word.chars().collect();
    for prefix_len in [3, 2] {
        if candidates.len() >= max_suggestions {
            break;
        }
        if chars.len() < prefix_len {
            continue;
        }
        let prefix: String = chars[..prefix_len].iter().collect();
        for candidate in dictionary.words_with_prefix(&prefix) {
            if edit_distance(word, &candidate) <= MAX_DISTANCE {
                candidates.insert(candidate);
            }
        }
    }

    // 3. Very short words have tiny prefix buckets; fall back to a length scan
    if candidates.is_empty() && chars.len() <= 3 {
        for candidate in dictionary.words_near_length(word.len(), 1) {
            if edit_distance(word, &candidate) <= MAX_DISTANCE {
                candidates.insert(candidate);
            }
        }
    }

    candidates.remove(word);
    rank(word, candidates, max_suggestions)
}

/// Order candidates by edit distance, then prefer ones that keep the first
/// letter, use the same letters (swapped keys) and keep the length.
/// Alphabetical order breaks remaining ties.
fn rank(word: &str, candidates: HashSet<String>, max_suggestions: usize) -> Vec<String> {
    let first = word.chars().next();
    let len = word.chars().count();
    let letters = sorted_letters(word);

    let mut scored: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let distance = edit_distance(word, &candidate);
            let first_differs = candidate.chars().next() != first;
            let other_letters = sorted_letters(&candidate) != letters;
            let len_diff = candidate.chars().count().abs_diff(len);
            ((distance, first_differs, other_letters, len_diff), candidate)
        })
        .collect();

    scored.sort();
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, candidate)| candidate)
        .collect()
}

fn sorted_letters(word: &str) -> Vec<char> {
    let mut letters: Vec<char> = word.chars().collect();
    letters.sort_unstable();
    letters
}

/// Optimal string alignment distance: Levenshtein plus adjacent
/// transpositions counted as a single edit.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, item) in matrix[0].iter_mut().enumerate() {
        *item = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            let mut best = (matrix[i - 1][j] + 1) // deletion
                .min(matrix[i][j - 1] + 1) // insertion
                .min(matrix[i - 1][j - 1] + cost); // substitution

            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                best = best.min(matrix[i - 2][j - 2] + 1); // transposition
            }

            matrix[i][j] = best;
        }
    }

    matrix[a_len][b_len]
}

/// Every string one edit away from `word`.
fn single_edits(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::with_capacity(chars.len() * 54 + 26);

    // Deletions
    for i in 0..chars.len() {
        let mut new_word = chars.clone();
        new_word.remove(i);
        edits.push(new_word.iter().collect());
    }

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        let mut new_word = chars.clone();
        new_word.swap(i, i + 1);
        edits.push(new_word.iter().collect());
    }

    // Replacements
    for i in 0..chars.len() {
        for letter in ALPHABET.chars() {
            if chars[i] != letter {
                let mut new_word = chars.clone();
                new_word[i] = letter;
                edits.push(new_word.iter().collect());
            }
        }
    }

    // Insertions
    for i in 0..=chars.len() {
        for letter in ALPHABET.chars() {
            let mut new_word = chars.clone();
            new_word.insert(i, letter);
            edits.push(new_word.iter().collect());
        }
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> Dictionary {
        Dictionary::from_words(&[
            "function", "functions", "fiction", "handle", "handles", "hands", "the", "then",
            "tea", "ten", "authentication", "is", "it", "in",
        ])
        .unwrap()
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("hello", "hello"), 0);
        assert_eq!(edit_distance("hello", "hallo"), 1);
        assert_eq!(edit_distance("hello", "world"), 4);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn test_transposition_costs_one() {
        assert_eq!(edit_distance("teh", "the"), 1);
        assert_eq!(edit_distance("fucntion", "function"), 1);
    }

    #[test]
    fn test_single_edits() {
        let edits = single_edits("helo");
        assert!(edits.contains(&"hlo".to_string())); // deletion
        assert!(edits.contains(&"ehlo".to_string())); // transposition
        assert!(edits.contains(&"hero".to_string())); // replacement
        assert!(edits.contains(&"hello".to_string())); // insertion
    }

    #[test]
    fn test_generate_best_first() {
        let dict = dictionary();
        let suggestions = generate("fucntion", &dict, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("function"));
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn test_generate_respects_limit_and_excludes_word() {
        let dict = dictionary();
        assert_eq!(generate("functon", &dict, 1), vec!["function"]);

        assert!(generate("function", &dict, 3)
            .iter()
            .all(|s| s != "function"));
        assert!(generate("functon", &dict, 0).is_empty());
    }

    #[test]
    fn test_generate_prefers_swapped_letters() {
        let dict = dictionary();
        // "tea" and "ten" are also one edit away
        let suggestions = generate("teh", &dict, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("the"));
    }

    #[test]
    fn test_generate_short_word_fallback() {
        let dict = dictionary();
        assert_eq!(generate("xyt", &dict, 3), vec!["it"]);
    }

    #[test]
    fn test_generate_nothing_close() {
        let dict = dictionary();
        assert!(generate("zzzzqqqq", &dict, 3).is_empty());
    }
}
