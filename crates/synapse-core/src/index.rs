use std::collections::HashMap;
use std::path::Path;

use crate::model::NoteHandle;
use crate::vfs::FileSystem;

/// Normalize a note name into an index key: lowercase, with a trailing `.md`
/// extension removed. No whitespace trimming happens here; callers that take
/// uncontrolled input trim before lookup.
pub(crate) fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_suffix(".md") {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

/// In-memory index of the note corpus: normalized base name → handle.
///
/// Rebuilt wholesale on every corpus-changing event; never incrementally
/// maintained, so staleness between rebuilds is intentional and bounded by
/// the host. Entries keep insertion order because the fuzzy scan's tie-break
/// is iteration order: a `Vec` holds the entries and a side map gives exact
/// lookup. Replacing a colliding key overwrites the handle in its original
/// slot (last write wins).
///
/// `rebuild` clears before repopulating. A resolver call interleaved with a
/// rebuild (possible only if the host allows overlapping cooperative calls)
/// can observe an empty or partial index; serializing rebuild triggers is
/// the host's responsibility.
#[derive(Default)]
pub struct NoteCorpusIndex {
    entries: Vec<(String, NoteHandle)>,
    slots: HashMap<String, usize>,
}

impl NoteCorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the index and repopulate it from the given handles. Idempotent
    /// for a fixed corpus snapshot.
    pub fn rebuild(&mut self, handles: impl IntoIterator<Item = NoteHandle>) {
        self.entries.clear();
        self.slots.clear();

        for handle in handles {
            let key = normalize_name(&handle.name);
            match self.slots.get(&key) {
                Some(&slot) => self.entries[slot] = (key, handle),
                None => {
                    self.slots.insert(key.clone(), self.entries.len());
                    self.entries.push((key, handle));
                }
            }
        }

        log::debug!("index: rebuilt with {} entries", self.entries.len());
    }

    /// Enumerate markdown files under `root` and rebuild from their base
    /// names. This is the corpus-change event handler hosts call on
    /// create/delete/rename.
    pub fn rebuild_from(&mut self, fs: &dyn FileSystem, root: &Path) {
        let handles = fs
            .list_files(root, "md")
            .into_iter()
            .map(NoteHandle::from_path);
        self.rebuild(handles);
    }

    /// Case-insensitive exact lookup. Absence is an empty result, never an
    /// error.
    pub fn lookup_exact(&self, name: &str) -> Option<&NoteHandle> {
        let key = normalize_name(name);
        self.slots.get(&key).map(|&slot| &self.entries[slot].1)
    }

    /// Iterate `(normalized_name, handle)` pairs in insertion order. The
    /// iterator is restartable and reflects the state as of the last
    /// rebuild; there is no isolation against a concurrent rebuild.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &NoteHandle)> {
        self.entries.iter().map(|(key, handle)| (key.as_str(), handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> NoteHandle {
        NoteHandle::new(format!("{name}.md"), name)
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut index = NoteCorpusIndex::new();
        index.rebuild(vec![handle("UX Design")]);

        let found = index.lookup_exact("ux design").expect("should match");
        assert_eq!(found.name, "UX Design");
        assert!(index.lookup_exact("affordance").is_none());
    }

    #[test]
    fn lookup_strips_markdown_extension() {
        let mut index = NoteCorpusIndex::new();
        index.rebuild(vec![handle("Affordance")]);

        assert!(index.lookup_exact("Affordance.md").is_some());
        assert!(index.lookup_exact("AFFORDANCE.MD").is_some());
    }

    #[test]
    fn rebuild_is_idempotent_for_fixed_corpus() {
        let mut index = NoteCorpusIndex::new();
        let corpus = vec![handle("Alpha"), handle("Beta"), handle("Gamma")];

        index.rebuild(corpus.clone());
        let first: Vec<String> = index.entries().map(|(k, _)| k.to_string()).collect();

        index.rebuild(corpus);
        let second: Vec<String> = index.entries().map(|(k, _)| k.to_string()).collect();

        assert_eq!(first, second);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn colliding_keys_keep_original_slot_with_last_handle() {
        let mut index = NoteCorpusIndex::new();
        index.rebuild(vec![
            NoteHandle::new("a/Note.md", "Note"),
            handle("Other"),
            NoteHandle::new("b/NOTE.md", "NOTE"),
        ]);

        assert_eq!(index.len(), 2);
        let keys: Vec<&str> = index.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["note", "other"]);

        let winner = index.lookup_exact("note").expect("should match");
        assert_eq!(winner.path, Path::new("b/NOTE.md"));
    }
}
