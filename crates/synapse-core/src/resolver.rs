use crate::index::NoteCorpusIndex;
use crate::model::Relation;

/// Candidates below this similarity are discarded.
const SIMILARITY_THRESHOLD: f64 = 0.3;
/// Fixed score for containment matches; does not rank among them.
const CONTAINMENT_SCORE: f64 = 0.9;
/// At most this many candidates are returned per concept.
const MAX_MATCHES: usize = 3;

/// Resolves free-text concept names against the corpus index.
///
/// Concept names come from an uncontrolled external generator: casing is
/// inconsistent, punctuation varies, and names may be translated or
/// paraphrased forms of an existing note. The resolver is a cheap,
/// explainable heuristic rather than a semantic search: corpora are small
/// and every result must be inspectable by a human reviewer before a file
/// is created.
///
/// Borrows the index; build one per resolution pass.
pub struct ConceptResolver<'a> {
    index: &'a NoteCorpusIndex,
}

impl<'a> ConceptResolver<'a> {
    pub fn new(index: &'a NoteCorpusIndex) -> Self {
        Self { index }
    }

    /// Return up to three existing note names that best match `concept`,
    /// best first.
    ///
    /// An exact (case-insensitive) index hit short-circuits to a single
    /// result. Otherwise every entry is scored and those above the
    /// threshold are kept, sorted by descending similarity. Equal scores
    /// keep index iteration order, which follows the enumeration order of
    /// the last rebuild: deterministic for a fixed rebuild, not guaranteed
    /// across rebuilds.
    pub fn find_matches(&self, concept: &str) -> Vec<String> {
        let needle = concept.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        if let Some(handle) = self.index.lookup_exact(&needle) {
            return vec![handle.name.clone()];
        }

        let mut matches: Vec<(&crate::model::NoteHandle, f64)> = Vec::new();
        for (name, handle) in self.index.entries() {
            let score = similarity(&needle, name);
            if score > SIMILARITY_THRESHOLD {
                matches.push((handle, score));
            }
        }

        // sort_by is stable: ties keep index order
        matches.sort_by(|a, b| b.1.total_cmp(&a.1));
        matches
            .into_iter()
            .take(MAX_MATCHES)
            .map(|(handle, _)| handle.name.clone())
            .collect()
    }

    /// Drop-unmatched validation: each concept is replaced by its best
    /// match; concepts with no match are dropped. The output is
    /// deduplicated, preserving first-seen order.
    pub fn validate_concepts(&self, concepts: &[String]) -> Vec<String> {
        let mut validated: Vec<String> = Vec::new();

        for concept in concepts {
            if let Some(best) = self.find_matches(concept).into_iter().next() {
                if !validated.contains(&best) {
                    validated.push(best);
                }
            }
        }

        validated
    }

    /// Keep-original resolution: the best match if any, otherwise the input
    /// text verbatim so the caller can treat it as a new, unresolved
    /// concept name.
    pub fn resolve_concept(&self, concept: &str) -> String {
        self.find_matches(concept)
            .into_iter()
            .next()
            .unwrap_or_else(|| concept.to_string())
    }

    /// Per-relation keep-original resolution; logic words pass through
    /// untouched.
    pub fn resolve_relations(&self, relations: &[Relation]) -> Vec<Relation> {
        relations
            .iter()
            .map(|relation| Relation {
                logic: relation.logic.clone(),
                concept: self.resolve_concept(&relation.concept),
            })
            .collect()
    }
}

/// Similarity between two normalized strings, in [0, 1].
///
/// Stages, cheapest first:
/// 1. containment either way → fixed 0.9
/// 2. length-difference rejection: edit distance is bounded below by the
///    length difference, so a ratio above `1 - threshold` cannot score
///    above the threshold → 0
/// 3. word-level overlap → 0.5 + matched_ratio * 0.4
/// 4. normalized Levenshtein fallback
///
/// Lengths are char counts so multi-byte names honor the same bounds.
pub(crate) fn similarity(a: &str, b: &str) -> f64 {
    if a.contains(b) || b.contains(a) {
        return CONTAINMENT_SCORE;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let max_len = len_a.max(len_b);

    if max_len > 0 && len_a.abs_diff(len_b) as f64 / max_len as f64 > 1.0 - SIMILARITY_THRESHOLD {
        return 0.0;
    }

    let words_a = split_words(a);
    let words_b = split_words(b);

    let mut matched = 0usize;
    for wa in &words_a {
        if words_b.iter().any(|wb| wb.contains(*wa) || wa.contains(*wb)) {
            matched += 1;
        }
    }

    if matched > 0 {
        let ratio = matched as f64 / words_a.len().max(words_b.len()) as f64;
        return 0.5 + ratio * 0.4;
    }

    let distance = levenshtein(a, b);
    (1.0 - distance as f64 / max_len as f64).max(0.0)
}

fn split_words(s: &str) -> Vec<&str> {
    s.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .collect()
}

/// Classic two-row Levenshtein over chars.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr: Vec<usize> = vec![0; a.len() + 1];

    for (i, cb) in b.iter().enumerate() {
        curr[0] = i + 1;
        for (j, ca) in a.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(curr[j] + 1).min(prev[j + 1] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[a.len()]
}
