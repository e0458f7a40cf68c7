//! Bitap approximate string search with location-weighted scoring.
//!
//! Scores run from 0 (perfect) to 1 (no match). A match costs
//! `errors / pattern_len` plus a proximity penalty of
//! `|expected - actual| / distance`, so an exact hit near the expected
//! location beats a fuzzy hit, and both beat anything far away.

use std::collections::HashMap;

/// Longest pattern a single bit-vector pass can handle.
pub const MAX_BITS: usize = 32;

/// Floor for a non-exact score, so only true equality reports 0.
const MIN_SCORE: f64 = 0.001;

/// Per-search parameters derived from [`crate::MatcherOptions`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct BitapConfig {
    pub location: usize,
    pub distance: usize,
    pub threshold: f64,
    pub find_all_matches: bool,
    pub min_match_char_length: usize,
    pub include_matches: bool,
    pub ignore_location: bool,
}

/// Outcome of searching one field text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BitapMatch {
    pub is_match: bool,
    pub score: f64,
    /// Inclusive character ranges, only filled when requested
    pub indices: Vec<(usize, usize)>,
}

/// Bit mask of pattern positions for each distinct pattern character.
fn pattern_alphabet(pattern: &[char]) -> HashMap<char, u32> {
    let len = pattern.len();
    let mut mask = HashMap::with_capacity(len);
    for (i, c) in pattern.iter().enumerate() {
        *mask.entry(*c).or_insert(0) |= 1u32 << (len - i - 1);
    }
    mask
}

fn compute_score(
    pattern_len: usize,
    errors: usize,
    current_location: usize,
    expected_location: usize,
    config: &BitapConfig,
) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    if config.ignore_location {
        return accuracy;
    }

    let proximity = expected_location.abs_diff(current_location);
    if config.distance == 0 {
        return if proximity > 0 { 1.0 } else { accuracy };
    }

    accuracy + proximity as f64 / config.distance as f64
}

/// First exact occurrence of `pattern` in `text` at or after `from`.
fn find_from(text: &[char], pattern: &[char], from: usize) -> Option<usize> {
    if from > text.len() {
        return None;
    }
    text[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|pos| pos + from)
}

/// Collapse a per-character match mask into runs of at least `min_len`.
fn mask_to_indices(mask: &[bool], min_len: usize) -> Vec<(usize, usize)> {
    let mut indices = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &matched) in mask.iter().enumerate() {
        match (matched, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_len {
                    indices.push((s, i - 1));
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        if mask.len() - s >= min_len {
            indices.push((s, mask.len() - 1));
        }
    }

    indices
}

/// Search `text` for a pattern of at most [`MAX_BITS`] characters.
fn search_chunk(
    text: &[char],
    pattern: &[char],
    alphabet: &HashMap<char, u32>,
    config: &BitapConfig,
) -> BitapMatch {
    let pattern_len = pattern.len();
    let text_len = text.len();
    let expected = config.location.min(text_len);
    let compute_matches = config.min_match_char_length > 1 || config.include_matches;
    let mut match_mask = if compute_matches {
        vec![false; text_len]
    } else {
        Vec::new()
    };

    // Exact occurrences tighten the threshold before the fuzzy pass.
    let mut threshold = config.threshold;
    let mut cursor = expected;
    while let Some(index) = find_from(text, pattern, cursor) {
        let score = compute_score(pattern_len, 0, index, expected, config);
        threshold = threshold.min(score);
        cursor = index + pattern_len;

        if compute_matches {
            match_mask[index..cursor].fill(true);
        }
    }

    let mut best_location: Option<usize> = None;
    let mut last_bits: Vec<u32> = Vec::new();
    let mut final_score = 1.0;
    let mut bin_max = pattern_len + text_len;
    let mask = 1u32 << (pattern_len - 1);

    for errors in 0..pattern_len {
        // Binary search for how far from `expected` a match with this many
        // errors can still land under the threshold.
        let mut bin_min = 0;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            let score = compute_score(pattern_len, errors, expected + bin_mid, expected, config);
            if score <= threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        bin_max = bin_mid;

        let mut start = (expected + 1).saturating_sub(bin_mid).max(1);
        let finish = if config.find_all_matches {
            text_len
        } else {
            (expected + bin_mid).min(text_len) + pattern_len
        };

        let mut bits = vec![0u32; finish + 2];
        bits[finish + 1] = (1u32 << errors) - 1;

        let mut j = finish;
        while j >= start {
            let current_location = j - 1;
            let char_match = text
                .get(current_location)
                .and_then(|c| alphabet.get(c))
                .copied()
                .unwrap_or(0);

            if compute_matches {
                if let Some(slot) = match_mask.get_mut(current_location) {
                    *slot = char_match != 0;
                }
            }

            bits[j] = ((bits[j + 1] << 1) | 1) & char_match;

            if errors > 0 {
                let prev = |k: usize| last_bits.get(k).copied().unwrap_or(0);
                bits[j] |= ((prev(j + 1) | prev(j)) << 1) | 1 | prev(j + 1);
            }

            if bits[j] & mask != 0 {
                final_score = compute_score(pattern_len, errors, current_location, expected, config);

                if final_score <= threshold {
                    threshold = final_score;
                    best_location = Some(current_location);

                    if current_location <= expected {
                        break;
                    }

                    // Past the expected location; only scan as far back again.
                    start = (2 * expected).saturating_sub(current_location).max(1);
                }
            }

            j -= 1;
        }

        // One more error could not possibly score better.
        let next = compute_score(pattern_len, errors + 1, expected, expected, config);
        if next > threshold {
            break;
        }

        last_bits = bits;
    }

    let mut result = BitapMatch {
        is_match: best_location.is_some(),
        score: f64::max(MIN_SCORE, final_score),
        indices: Vec::new(),
    };

    if compute_matches {
        let indices = mask_to_indices(&match_mask, config.min_match_char_length);
        if indices.is_empty() {
            result.is_match = false;
        } else if config.include_matches {
            result.indices = indices;
        }
    }

    result
}

struct Chunk {
    pattern: Vec<char>,
    alphabet: HashMap<char, u32>,
    start_index: usize,
}

/// A compiled query, reusable across every field of every product.
pub(crate) struct BitapSearcher {
    pattern: Vec<char>,
    chunks: Vec<Chunk>,
    config: BitapConfig,
}

impl BitapSearcher {
    /// Compile an already normalized (case-folded if needed), non-empty pattern.
    pub fn new(pattern: Vec<char>, config: BitapConfig) -> Self {
        let mut chunks = Vec::new();
        let mut add_chunk = |slice: &[char], start_index: usize| {
            chunks.push(Chunk {
                alphabet: pattern_alphabet(slice),
                pattern: slice.to_vec(),
                start_index,
            });
        };

        let len = pattern.len();
        if len > MAX_BITS {
            let remainder = len % MAX_BITS;
            let end = len - remainder;
            let mut i = 0;
            while i < end {
                add_chunk(&pattern[i..i + MAX_BITS], i);
                i += MAX_BITS;
            }
            if remainder > 0 {
                let start_index = len - MAX_BITS;
                add_chunk(&pattern[start_index..], start_index);
            }
        } else {
            add_chunk(&pattern[..], 0);
        }

        Self {
            pattern,
            chunks,
            config,
        }
    }

    /// Score one normalized field text.
    pub fn search_in(&self, text: &[char]) -> BitapMatch {
        if self.pattern.as_slice() == text {
            let indices = if self.config.include_matches {
                vec![(0, text.len() - 1)]
            } else {
                Vec::new()
            };
            return BitapMatch {
                is_match: true,
                score: 0.0,
                indices,
            };
        }

        let mut all_indices = Vec::new();
        let mut total_score = 0.0;
        let mut has_matches = false;

        for chunk in &self.chunks {
            let config = BitapConfig {
                location: self.config.location.saturating_add(chunk.start_index),
                ..self.config
            };
            let found = search_chunk(text, &chunk.pattern, &chunk.alphabet, &config);

            total_score += found.score;
            if found.is_match {
                has_matches = true;
                all_indices.extend(found.indices);
            }
        }

        BitapMatch {
            is_match: has_matches,
            score: if has_matches {
                total_score / self.chunks.len() as f64
            } else {
                1.0
            },
            indices: all_indices,
        }
    }
}
