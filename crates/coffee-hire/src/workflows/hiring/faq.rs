use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    #[serde(alias = "Question", alias = "Вопрос")]
    pub question: String,
    #[serde(alias = "Answer", alias = "Ответ")]
    pub answer: String,
}

/// Small question/answer table consulted before a questionnaire starts.
#[derive(Debug, Clone, Default)]
pub struct FaqBook {
    entries: Vec<FaqEntry>,
    // Lowercased questions, index-aligned with `entries`.
    needles: Vec<String>,
}

impl FaqBook {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        let entries: Vec<FaqEntry> = entries
            .into_iter()
            .filter(|entry| !entry.question.trim().is_empty())
            .collect();
        let needles = entries
            .iter()
            .map(|entry| entry.question.trim().to_lowercase())
            .collect();
        Self { entries, needles }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let entries = csv_reader
            .deserialize::<FaqEntry>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries))
    }

    /// A missing or malformed file yields an empty table.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::File::open(path)
            .map_err(csv::Error::from)
            .and_then(Self::from_reader);

        match loaded {
            Ok(book) => {
                info!(path = %path.display(), entries = book.len(), "faq loaded");
                book
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "faq unavailable; starting empty");
                Self::default()
            }
        }
    }

    /// First entry, in file order, whose question appears anywhere in `text`.
    pub fn lookup(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.needles
            .iter()
            .position(|needle| haystack.contains(needle.as_str()))
            .map(|index| self.entries[index].answer.as_str())
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text for the `/faq` command.
    pub fn render(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        Some(
            self.entries
                .iter()
                .map(|entry| format!("Q: {}\nA: {}", entry.question, entry.answer))
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn book() -> FaqBook {
        FaqBook::from_reader(Cursor::new(
            "Вопрос,Ответ\nзарплата,From 250 per hour\nschedule,2/2 shifts\n",
        ))
        .expect("faq parses")
    }

    #[test]
    fn matches_question_as_substring() {
        let book = book();
        assert_eq!(
            book.lookup("Какая ЗАРПЛАТА у бариста?"),
            Some("From 250 per hour")
        );
        assert_eq!(book.lookup("What is the Schedule like"), Some("2/2 shifts"));
        assert_eq!(book.lookup("hello"), None);
    }

    #[test]
    fn first_entry_wins_on_multiple_matches() {
        let book = book();
        assert_eq!(
            book.lookup("schedule and зарплата"),
            Some("From 250 per hour")
        );
    }

    #[test]
    fn blank_questions_never_match() {
        let book = FaqBook::new(vec![FaqEntry {
            question: "  ".to_string(),
            answer: "always".to_string(),
        }]);
        assert!(book.is_empty());
        assert_eq!(book.lookup("anything"), None);
    }

    #[test]
    fn render_lists_entries() {
        let rendered = book().render().expect("non-empty faq");
        assert!(rendered.starts_with("Q: зарплата\nA: From 250 per hour"));
        assert!(FaqBook::default().render().is_none());
    }

    #[test]
    fn load_degrades_to_empty_on_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(FaqBook::load(dir.path().join("faq.csv")).is_empty());
    }
}
