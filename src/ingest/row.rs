// src/ingest/row.rs
//! One sheet row (header → cell text) to one [`QuizRecord`].

use std::collections::HashMap;

use crate::ingest::classify::{classify_quiz_type, normalize_label};
use crate::ingest::date::parse_date_to_timestamp;
use crate::ingest::types::{Category, QuizRecord};

/// Header name → cell text for one data line.
pub type RowMap = HashMap<String, String>;

pub const DEFAULT_MAX_NUMBERED_FIELDS: usize = 12;
pub const DEFAULT_PLACEHOLDER_THUMBNAIL: &str = "https://picsum.photos/400/300";

/// Column names accepted for each record field.
///
/// Each field lists aliases; the first alias whose cell is non-empty wins.
/// Numbered series are prefixes, probed as `{prefix}_{i}` for `i` in
/// `1..=max_numbered_fields`.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub title: Vec<String>,
    pub thumbnail: Vec<String>,
    pub date: Vec<String>,
    pub quiz_type: Vec<String>,
    pub question: Vec<String>,
    pub illustration: Vec<String>,
    pub answer: Vec<String>,
    pub answer_image: Vec<String>,
    pub result: Vec<String>,
    pub result_image: Vec<String>,
    pub max_numbered_fields: usize,
    pub placeholder_thumbnail: String,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            title: names(&["tieu_de", "title"]),
            thumbnail: names(&["anh_thumb", "thumbnail"]),
            date: names(&["ngay_thang_nam", "date"]),
            quiz_type: names(&["loai_trac_nghiem", "type"]),
            question: names(&["cau_hoi", "question"]),
            illustration: names(&["anh_minh_hoa", "illustration"]),
            answer: names(&["dap_an", "answer"]),
            answer_image: names(&["hinh_anh_dap_an", "answer_image"]),
            result: names(&["ket_qua", "result"]),
            result_image: names(&["hinh_anh_ket_qua", "result_image"]),
            max_numbered_fields: DEFAULT_MAX_NUMBERED_FIELDS,
            placeholder_thumbnail: DEFAULT_PLACEHOLDER_THUMBNAIL.to_string(),
        }
    }
}

impl ColumnSchema {
    pub fn with_max_numbered_fields(mut self, max: usize) -> Self {
        self.max_numbered_fields = max;
        self
    }

    pub fn with_placeholder_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.placeholder_thumbnail = url.into();
        self
    }

    /// Resolved title cell, if any. Rows without one never become records.
    pub fn title_of<'a>(&self, row: &'a RowMap) -> Option<&'a str> {
        first_value(row, &self.title)
    }

    /// Every numbered-series prefix, for header width checks.
    pub fn numbered_prefixes(&self) -> impl Iterator<Item = &str> {
        self.answer
            .iter()
            .chain(&self.answer_image)
            .chain(&self.result)
            .chain(&self.result_image)
            .map(String::as_str)
    }
}

fn first_value<'a>(row: &'a RowMap, aliases: &[String]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|k| row.get(k))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

fn numbered_value<'a>(row: &'a RowMap, prefixes: &[String], i: usize) -> Option<&'a str> {
    prefixes
        .iter()
        .filter_map(|p| row.get(&format!("{p}_{i}")))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

/// Short hex digest of category + title.
pub fn content_key(category: Category, title: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(category.label().as_bytes());
    hasher.update([0x1fu8]);
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Map one row. `index` is the row's position after the title filter.
///
/// Numbered cells are appended only when non-empty, so a gap in the sheet
/// (e.g. `answer_1`, `answer_3`) compacts to a shorter list.
pub fn map_row(row: &RowMap, index: usize, category: Category, schema: &ColumnSchema) -> QuizRecord {
    let mut answers = Vec::new();
    let mut answer_images = Vec::new();
    let mut results = Vec::new();
    let mut result_images = Vec::new();

    for i in 1..=schema.max_numbered_fields {
        if let Some(v) = numbered_value(row, &schema.answer, i) {
            answers.push(v.to_string());
        }
        if let Some(v) = numbered_value(row, &schema.answer_image, i) {
            answer_images.push(v.to_string());
        }
        if let Some(v) = numbered_value(row, &schema.result, i) {
            results.push(v.to_string());
        }
        if let Some(v) = numbered_value(row, &schema.result_image, i) {
            result_images.push(v.to_string());
        }
    }

    let type_label = normalize_label(first_value(row, &schema.quiz_type).unwrap_or_default());
    let date_text = first_value(row, &schema.date).unwrap_or_default().to_string();
    let defaults = QuizRecord::default();
    let title = first_value(row, &schema.title)
        .map(str::to_string)
        .unwrap_or(defaults.title);

    QuizRecord {
        id: format!("{}-{}", category.label(), index),
        category,
        content_key: content_key(category, &title),
        title,
        thumbnail_url: first_value(row, &schema.thumbnail)
            .unwrap_or(schema.placeholder_thumbnail.as_str())
            .to_string(),
        timestamp: parse_date_to_timestamp(&date_text),
        date_text,
        quiz_type: classify_quiz_type(&type_label),
        question_text: first_value(row, &schema.question)
            .unwrap_or_default()
            .to_string(),
        illustration_url: first_value(row, &schema.illustration)
            .unwrap_or_default()
            .to_string(),
        answers,
        answer_images,
        results,
        result_images,
        source_row: defaults.source_row,
    }
}
