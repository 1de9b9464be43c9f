//! Edit-distance similarity

/// Unit-cost Levenshtein distance over chars, O(min(n, m)) space
pub fn levenshtein(a: &str, b: &str) -> usize {
    // strsim keeps a single row sized by its second argument
    if a.chars().count() < b.chars().count() {
        strsim::levenshtein(b, a)
    } else {
        strsim::levenshtein(a, b)
    }
}

/// `1 - distance / max(len)`, 1.0 for two empty strings
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Best similarity of `input` against `word`, also sliding an input-length
/// window over `word` when it is the longer of the two. Lets "nextcl" score
/// against "nextcloud" without the length penalty.
pub fn window_similarity(input: &str, word: &str) -> f64 {
    let whole = similarity(input, word);

    let input_len = input.chars().count();
    let chars: Vec<char> = word.chars().collect();
    if input_len == 0 || chars.len() <= input_len {
        return whole;
    }

    chars
        .windows(input_len)
        .map(|window| similarity(input, &window.iter().collect::<String>()))
        .fold(whole, f64::max)
}
