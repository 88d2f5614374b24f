use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::word::Word;
use crate::config::SortPolicy;

/// Which of the two word lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    #[default]
    Unlearned,
    Learned,
}

impl ListKind {
    pub fn toggle(self) -> Self {
        match self {
            Self::Unlearned => Self::Learned,
            Self::Learned => Self::Unlearned,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unlearned => "Unlearned",
            Self::Learned => "Learned",
        }
    }
}

/// The unlearned and learned word lists plus the notified-word marker.
///
/// A word lives in exactly one list. Flip state is keyed by the word's
/// runtime id, so it stays attached to the right card across inserts,
/// removals and shuffles.
#[derive(Debug, Default)]
pub struct WordStore {
    unlearned: Vec<Word>,
    learned: Vec<Word>,
    notified: BTreeSet<String>,
    flipped: HashSet<Uuid>,
    sort_policy: SortPolicy,
}

impl WordStore {
    #[cfg(test)]
    pub fn new(sort_policy: SortPolicy) -> Self {
        Self {
            sort_policy,
            ..Self::default()
        }
    }

    pub fn from_parts(
        unlearned: Vec<Word>,
        learned: Vec<Word>,
        notified: BTreeSet<String>,
        sort_policy: SortPolicy,
    ) -> Self {
        let mut store = Self {
            unlearned,
            learned,
            notified,
            flipped: HashSet::new(),
            sort_policy,
        };
        store.sort_all();
        store
    }

    pub fn unlearned(&self) -> &[Word] {
        &self.unlearned
    }

    pub fn learned(&self) -> &[Word] {
        &self.learned
    }

    pub fn list(&self, kind: ListKind) -> &[Word] {
        match kind {
            ListKind::Unlearned => &self.unlearned,
            ListKind::Learned => &self.learned,
        }
    }

    pub fn notified(&self) -> &BTreeSet<String> {
        &self.notified
    }

    #[cfg(test)]
    pub fn notified_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.notified
    }

    /// Split borrow for the scheduler: read unlearned while updating the marker.
    pub fn unlearned_and_notified(&mut self) -> (&[Word], &mut BTreeSet<String>) {
        (&self.unlearned, &mut self.notified)
    }

    pub fn total_len(&self) -> usize {
        self.unlearned.len() + self.learned.len()
    }

    pub fn set_sort_policy(&mut self, policy: SortPolicy) {
        self.sort_policy = policy;
        self.sort_all();
    }

    /// Add a new unlearned word. Blank input is ignored and yields `None`.
    pub fn add_word(&mut self, text: &str, definition: &str) -> Option<Uuid> {
        let word = Word::new(text, definition)?;
        let id = word.id;
        self.unlearned.push(word);
        self.sort_list(ListKind::Unlearned);
        Some(id)
    }

    /// Move the unlearned word at `index` to the learned list.
    pub fn mark_learned(&mut self, index: usize) -> Option<&Word> {
        self.move_word(ListKind::Unlearned, index)
    }

    /// Move the learned word at `index` back to the unlearned list.
    pub fn mark_unlearned(&mut self, index: usize) -> Option<&Word> {
        self.move_word(ListKind::Learned, index)
    }

    fn move_word(&mut self, from: ListKind, index: usize) -> Option<&Word> {
        if index >= self.list(from).len() {
            return None;
        }

        let (source, target) = match from {
            ListKind::Unlearned => (&mut self.unlearned, &mut self.learned),
            ListKind::Learned => (&mut self.learned, &mut self.unlearned),
        };
        let word = source.remove(index);
        let id = word.id;
        self.flipped.remove(&id);
        target.push(word);

        let to = from.toggle();
        self.sort_list(to);
        self.list(to).iter().find(|w| w.id == id)
    }

    pub fn clear_all(&mut self) {
        self.unlearned.clear();
        self.learned.clear();
        self.notified.clear();
        self.flipped.clear();
    }

    /// Randomize the unlearned order. Only meaningful under insertion order;
    /// an alphabetical policy re-sorts on the next add.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.unlearned.shuffle(rng);
    }

    /// Flip the card with `id`. Returns the new face-up state (`true` shows
    /// the definition), or `None` for an unknown id.
    pub fn toggle_flip(&mut self, id: Uuid) -> Option<bool> {
        self.find(id)?;
        if self.flipped.remove(&id) {
            Some(false)
        } else {
            self.flipped.insert(id);
            Some(true)
        }
    }

    pub fn is_flipped(&self, id: Uuid) -> bool {
        self.flipped.contains(&id)
    }

    pub fn cycle_definition(&mut self, id: Uuid) -> bool {
        match self.find_mut(id) {
            Some(word) => {
                word.cycle_definition();
                true
            }
            None => false,
        }
    }

    pub fn add_definition(&mut self, id: Uuid, definition: &str) -> bool {
        self.find_mut(id)
            .map(|word| word.add_definition(definition))
            .unwrap_or(false)
    }

    pub fn find(&self, id: Uuid) -> Option<&Word> {
        self.unlearned
            .iter()
            .chain(self.learned.iter())
            .find(|w| w.id == id)
    }

    fn find_mut(&mut self, id: Uuid) -> Option<&mut Word> {
        self.unlearned
            .iter_mut()
            .chain(self.learned.iter_mut())
            .find(|w| w.id == id)
    }

    fn sort_all(&mut self) {
        self.sort_list(ListKind::Unlearned);
        self.sort_list(ListKind::Learned);
    }

    fn sort_list(&mut self, kind: ListKind) {
        if self.sort_policy != SortPolicy::Alphabetical {
            return;
        }
        let list = match kind {
            ListKind::Unlearned => &mut self.unlearned,
            ListKind::Learned => &mut self.learned,
        };
        list.sort_by(|a, b| compare_text(&a.text, &b.text));
    }
}

/// Dictionary order: letters compare case-insensitively first, then
/// lowercase sorts before uppercase for otherwise equal words.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    fn is_sorted(words: &[Word]) -> bool {
        words
            .windows(2)
            .all(|pair| compare_text(&pair[0].text, &pair[1].text) != Ordering::Greater)
    }

    #[test]
    fn add_word_keeps_unlearned_sorted() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        store.add_word("pear", "a fruit").unwrap();
        store.add_word("Apple", "another fruit").unwrap();
        store.add_word("fig", "a small fruit").unwrap();

        assert_eq!(texts(store.unlearned()), vec!["Apple", "fig", "pear"]);
        assert!(store.learned().is_empty());
    }

    #[test]
    fn insertion_policy_keeps_add_order() {
        let mut store = WordStore::new(SortPolicy::Insertion);
        store.add_word("pear", "a fruit").unwrap();
        store.add_word("apple", "another fruit").unwrap();

        assert_eq!(texts(store.unlearned()), vec!["pear", "apple"]);

        store.set_sort_policy(SortPolicy::Alphabetical);
        assert_eq!(texts(store.unlearned()), vec!["apple", "pear"]);
    }

    #[test]
    fn add_word_ignores_blank_input() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        assert!(store.add_word("  ", "def").is_none());
        assert!(store.add_word("word", " ").is_none());
        assert_eq!(store.total_len(), 0);
    }

    #[test]
    fn mark_learned_moves_exactly_one_word() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        store.add_word("cat", "a feline").unwrap();
        store.add_word("dog", "a canine").unwrap();
        store.add_word("eel", "a fish").unwrap();
        let before = store.total_len();
        let moved_id = store.unlearned()[1].id;

        let moved = store.mark_learned(1).unwrap();
        assert_eq!(moved.id, moved_id);
        assert_eq!(moved.text, "dog");

        assert_eq!(texts(store.unlearned()), vec!["cat", "eel"]);
        assert_eq!(texts(store.learned()), vec!["dog"]);
        assert_eq!(store.total_len(), before);
    }

    #[test]
    fn learned_list_stays_sorted() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        for text in ["zebra", "mole", "ant", "kiwi"] {
            store.add_word(text, "an animal").unwrap();
        }
        while !store.unlearned().is_empty() {
            let last = store.unlearned().len() - 1;
            store.mark_learned(last).unwrap();
            assert!(is_sorted(store.learned()));
            assert!(is_sorted(store.unlearned()));
        }
        assert_eq!(texts(store.learned()), vec!["ant", "kiwi", "mole", "zebra"]);
    }

    #[test]
    fn mark_learned_out_of_range_is_noop() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        store.add_word("cat", "a feline").unwrap();

        assert!(store.mark_learned(5).is_none());
        assert_eq!(store.unlearned().len(), 1);
        assert!(store.learned().is_empty());
    }

    #[test]
    fn mark_unlearned_moves_back() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        store.add_word("cat", "a feline").unwrap();
        store.mark_learned(0).unwrap();

        let word = store.mark_unlearned(0).unwrap();
        assert_eq!(word.text, "cat");
        assert_eq!(store.unlearned().len(), 1);
        assert!(store.learned().is_empty());
    }

    #[test]
    fn clear_all_empties_everything() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        let id = store.add_word("cat", "a feline").unwrap();
        store.add_word("dog", "a canine").unwrap();
        store.mark_learned(1).unwrap();
        store.notified_mut().insert("cat".to_string());
        store.toggle_flip(id);

        store.clear_all();

        assert!(store.unlearned().is_empty());
        assert!(store.learned().is_empty());
        assert!(store.notified().is_empty());
        assert!(!store.is_flipped(id));
    }

    #[test]
    fn flip_state_follows_word_not_position() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        let dog = store.add_word("dog", "a canine").unwrap();
        assert_eq!(store.toggle_flip(dog), Some(true));

        // Inserting before "dog" shifts its index; the flag stays with it.
        store.add_word("cat", "a feline").unwrap();
        assert_eq!(store.unlearned()[1].id, dog);
        assert!(store.is_flipped(dog));
        assert!(!store.is_flipped(store.unlearned()[0].id));

        assert_eq!(store.toggle_flip(dog), Some(false));
        assert!(!store.is_flipped(dog));
        assert_eq!(store.toggle_flip(Uuid::new_v4()), None);
    }

    #[test]
    fn shuffle_keeps_the_same_words() {
        let mut store = WordStore::new(SortPolicy::Insertion);
        for text in ["a", "b", "c", "d", "e", "f"] {
            store.add_word(text, "letter").unwrap();
        }
        let flipped = store.unlearned()[2].id;
        store.toggle_flip(flipped);

        let mut rng = StdRng::seed_from_u64(7);
        store.shuffle(&mut rng);

        let mut shuffled = texts(store.unlearned());
        shuffled.sort();
        assert_eq!(shuffled, vec!["a", "b", "c", "d", "e", "f"]);
        assert!(store.is_flipped(flipped));
    }

    #[test]
    fn cycle_and_add_definition_by_id() {
        let mut store = WordStore::new(SortPolicy::Alphabetical);
        let id = store.add_word("bank", "edge of a river").unwrap();

        assert!(store.add_definition(id, "financial institution"));
        assert!(store.cycle_definition(id));
        assert_eq!(store.find(id).unwrap().current_def_index, 1);
        assert!(!store.cycle_definition(Uuid::new_v4()));
    }

    #[test]
    fn from_parts_sorts_loaded_lists() {
        let words = vec![
            Word::new("b", "x").unwrap(),
            Word::new("a", "y").unwrap(),
        ];
        let store = WordStore::from_parts(words, Vec::new(), BTreeSet::new(), SortPolicy::Alphabetical);
        assert_eq!(texts(store.unlearned()), vec!["a", "b"]);
    }

    #[test]
    fn compare_text_orders_case_insensitively() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_text("Apple", "Apple"), Ordering::Equal);
    }
}
