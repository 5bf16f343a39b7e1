//! Spelling suggestions using Levenshtein distance

/// Return the words in the dictionary closest to `word`.
///
/// Only words within half the length of `word` are considered close.
/// The result is sorted and empty if nothing is close.
pub fn close_words(dictionary: &[&str], word: &str) -> Vec<String> {
    let threshold = word.chars().count() / 2;
    let mut best = usize::MAX;
    let mut result: Vec<String> = vec![];
    for candidate in dictionary {
        let distance = levenshtein_distance(word, candidate);
        if distance > threshold || distance > best {
            continue;
        }
        if distance < best {
            best = distance;
            result.clear();
        }
        result.push(candidate.to_string());
    }
    result.sort();
    result
}

/// Number of single character additions, removals or substitutions needed to turn `a` into `b`.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    // row[j] is the distance between the prefix of `a` processed so far and b[..j].
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
