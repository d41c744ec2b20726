//! Character-sequence similarity between titles.

use std::collections::HashMap;

/// Returns a similarity ratio in `[0, 1]` between two strings, ignoring case.
///
/// This is the Ratcliff/Obershelp "matching blocks" measure: the longest common run is
/// found, then the same search recurses on the text left and right of it. The ratio is
/// `2 * matched / (len(a) + len(b))`. Matched runs may appear in any order between the
/// two strings, so reordered words still score well.
///
/// The block search is not symmetric when several runs tie for longest, so both
/// directions are scored and the higher one wins.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matched_chars(&a, &b).max(matched_chars(&b, &a));
    (2 * matched) as f64 / total as f64
}

/// Total length of all matching blocks of `a` against `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        positions.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }

        matched += size;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Finds the longest common run inside `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties resolve to the earliest start in `a`, then the earliest start in `b`.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // Run length ending at b[j] for the previous row of a.
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_lengths = HashMap::new();

        if let Some(js) = positions.get(c) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }

                let previous = j.checked_sub(1).and_then(|p| run_lengths.get(&p)).copied();
                let k = previous.unwrap_or(0) + 1;
                next_lengths.insert(j, k);

                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }

        run_lengths = next_lengths;
    }

    (best_i, best_j, best_size)
}
