// src/ingest/classify.rs
use crate::ingest::types::QuizType;

/// Substring → type, in priority order. First hit wins.
const TYPE_MARKERS: [(&str, QuizType); 4] = [
    ("tử vi", QuizType::TuVi),
    ("xếp hạng", QuizType::XepHang),
    ("hỏi đáp", QuizType::HoiDap),
    ("điền đáp án", QuizType::DienDapAn),
];

/// Classify a sheet's free-text type label.
///
/// Expects the label already lowercased and trimmed (see [`normalize_label`]).
/// Unknown or empty labels fall back to [`QuizType::HoiDap`].
pub fn classify_quiz_type(label: &str) -> QuizType {
    TYPE_MARKERS
        .iter()
        .find(|(marker, _)| label.contains(marker))
        .map(|(_, t)| *t)
        .unwrap_or_default()
}

/// Lowercase + trim, the normalization applied before classification.
pub fn normalize_label(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}
