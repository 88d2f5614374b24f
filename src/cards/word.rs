use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flashcard: a word and one or more definitions, with a pointer to the
/// definition currently shown on the back of the card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Runtime-only identity for view state. Never persisted.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub text: String,
    pub definitions: Vec<String>,
    #[serde(default)]
    pub current_def_index: usize,
}

impl Word {
    /// Returns `None` when either field is blank after trimming.
    pub fn new(text: &str, definition: &str) -> Option<Self> {
        let text = text.trim();
        let definition = definition.trim();
        if text.is_empty() || definition.is_empty() {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            definitions: vec![definition.to_string()],
            current_def_index: 0,
        })
    }

    pub fn current_definition(&self) -> &str {
        self.definitions
            .get(self.current_def_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn first_definition(&self) -> &str {
        self.definitions
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Advance to the next definition, wrapping around.
    pub fn cycle_definition(&mut self) {
        if !self.definitions.is_empty() {
            self.current_def_index = (self.current_def_index + 1) % self.definitions.len();
        }
    }

    pub fn add_definition(&mut self, definition: &str) -> bool {
        let definition = definition.trim();
        if definition.is_empty() {
            return false;
        }
        self.definitions.push(definition.to_string());
        true
    }

    /// Repair a word read from storage. Returns `false` if it cannot hold
    /// the card invariants and should be dropped.
    pub fn normalize(&mut self) -> bool {
        self.definitions.retain(|d| !d.trim().is_empty());
        if self.text.trim().is_empty() || self.definitions.is_empty() {
            return false;
        }
        if self.current_def_index >= self.definitions.len() {
            self.current_def_index = 0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_fields() {
        assert!(Word::new("", "a feline").is_none());
        assert!(Word::new("   ", "a feline").is_none());
        assert!(Word::new("cat", "").is_none());
        assert!(Word::new("cat", "\t\n").is_none());
    }

    #[test]
    fn new_starts_at_first_definition() {
        let word = Word::new("  cat ", "a feline").unwrap();
        assert_eq!(word.text, "cat");
        assert_eq!(word.definitions, vec!["a feline"]);
        assert_eq!(word.current_def_index, 0);
        assert_eq!(word.current_definition(), "a feline");
    }

    #[test]
    fn cycle_definition_wraps() {
        let mut word = Word::new("bank", "edge of a river").unwrap();
        assert!(word.add_definition("financial institution"));
        assert!(!word.add_definition("  "));

        word.cycle_definition();
        assert_eq!(word.current_definition(), "financial institution");
        word.cycle_definition();
        assert_eq!(word.current_def_index, 0);
        assert_eq!(word.first_definition(), "edge of a river");
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let word = Word::new("cat", "a feline").unwrap();
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "cat",
                "definitions": ["a feline"],
                "currentDefIndex": 0
            })
        );
    }

    #[test]
    fn normalize_clamps_index_and_rejects_empty() {
        let mut word: Word = serde_json::from_str(
            r#"{"text":"cat","definitions":["a feline"],"currentDefIndex":4}"#,
        )
        .unwrap();
        assert!(word.normalize());
        assert_eq!(word.current_def_index, 0);

        let mut empty: Word =
            serde_json::from_str(r#"{"text":"cat","definitions":[]}"#).unwrap();
        assert!(!empty.normalize());
    }

    #[test]
    fn deserialized_words_get_distinct_ids() {
        let json = r#"{"text":"cat","definitions":["a feline"],"currentDefIndex":0}"#;
        let a: Word = serde_json::from_str(json).unwrap();
        let b: Word = serde_json::from_str(json).unwrap();
        assert_ne!(a.id, b.id);
    }
}
