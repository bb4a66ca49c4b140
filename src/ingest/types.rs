// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level content groupings. Assigned per source, never read from row data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "12 Con giáp")]
    ConGiap,
    #[serde(rename = "Cung hoàng đạo")]
    CungHoangDao,
    #[serde(rename = "Quiz")]
    Quiz,
}

impl Category {
    /// Navigation order used by the site header.
    pub const ALL: [Category; 3] = [Category::ConGiap, Category::CungHoangDao, Category::Quiz];

    /// Display label; also the prefix of every record id in this category.
    pub fn label(self) -> &'static str {
        match self {
            Category::ConGiap => "12 Con giáp",
            Category::CungHoangDao => "Cung hoàng đạo",
            Category::Quiz => "Quiz",
        }
    }

    /// Parse a display label: exact match first, then trimmed + case-insensitive.
    pub fn from_label(s: &str) -> Option<Self> {
        if let Some(c) = Self::ALL.into_iter().find(|c| c.label() == s) {
            return Some(c);
        }
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == needle)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interaction pattern the detail view uses for a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizType {
    /// Pick one option, see its result (horoscope style).
    #[serde(rename = "Tử vi")]
    TuVi,
    /// Results revealed step by step.
    #[serde(rename = "Xếp hạng")]
    XepHang,
    #[default]
    #[serde(rename = "Hỏi đáp")]
    HoiDap,
    /// Free-text answer checked against the results.
    #[serde(rename = "Điền đáp án")]
    DienDapAn,
}

impl QuizType {
    /// Display label, same text as the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            QuizType::TuVi => "Tử vi",
            QuizType::XepHang => "Xếp hạng",
            QuizType::HoiDap => "Hỏi đáp",
            QuizType::DienDapAn => "Điền đáp án",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized sheet row.
///
/// `answers`/`answer_images` and `results`/`result_images` are built from
/// numbered columns with gaps compacted, so index alignment between the two
/// series only holds when the sheet has no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    /// `{category}-{index}` where index is the position after the title filter.
    /// Only meaningful within one ingestion run.
    pub id: String,
    pub category: Category,
    pub title: String,
    pub thumbnail_url: String,
    /// Raw `DD/MM/YYYY` text as authored.
    pub date_text: String,
    /// Milliseconds since the unix epoch at local midnight; 0 when unknown.
    pub timestamp: i64,
    pub quiz_type: QuizType,
    pub question_text: String,
    pub illustration_url: String,
    pub answers: Vec<String>,
    pub answer_images: Vec<String>,
    pub results: Vec<String>,
    pub result_images: Vec<String>,
    /// Short digest of category + title; stable across re-fetches.
    pub content_key: String,
    /// 1-based data line number in the source document.
    pub source_row: usize,
}

impl Default for QuizRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            category: Category::Quiz,
            title: "Không có tiêu đề".to_string(),
            thumbnail_url: String::new(),
            date_text: String::new(),
            timestamp: 0,
            quiz_type: QuizType::default(),
            question_text: String::new(),
            illustration_url: String::new(),
            answers: Vec::new(),
            answer_images: Vec::new(),
            results: Vec::new(),
            result_images: Vec::new(),
            content_key: String::new(),
            source_row: 0,
        }
    }
}

/// One published sheet scoped to a single category.
#[async_trait::async_trait]
pub trait SheetProvider: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<QuizRecord>>;
    fn category(&self) -> Category;

    /// Where the rows come from, for logs.
    fn location(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_label_parsing() {
        assert_eq!(Category::from_label("Quiz"), Some(Category::Quiz));
        assert_eq!(
            Category::from_label("  cung hoàng đạo "),
            Some(Category::CungHoangDao)
        );
        assert_eq!(Category::from_label("12 CON GIÁP"), Some(Category::ConGiap));
        assert_eq!(Category::from_label("Tarot"), None);
    }

    #[test]
    fn record_serializes_with_display_labels() {
        let rec = QuizRecord {
            id: "Quiz-0".into(),
            quiz_type: QuizType::DienDapAn,
            ..Default::default()
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["category"], "Quiz");
        assert_eq!(v["quizType"], "Điền đáp án");
        assert!(v.get("answerImages").is_some());
    }

    #[test]
    fn quiz_type_label_matches_serialized_form() {
        for t in [
            QuizType::TuVi,
            QuizType::XepHang,
            QuizType::HoiDap,
            QuizType::DienDapAn,
        ] {
            assert_eq!(serde_json::to_value(t).unwrap(), t.label());
            assert_eq!(t.to_string(), t.label());
        }
    }

    struct Bare;

    #[async_trait::async_trait]
    impl SheetProvider for Bare {
        async fn fetch_records(&self) -> Result<Vec<QuizRecord>> {
            Ok(Vec::new())
        }
        fn category(&self) -> Category {
            Category::Quiz
        }
    }

    #[test]
    fn provider_location_defaults_to_unknown() {
        assert_eq!(Bare.location(), "unknown");
    }
}
