// src/ingest/tsv.rs
//! Tab-separated sheet export → records.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::row::{map_row, ColumnSchema, RowMap};
use crate::ingest::types::{Category, QuizRecord};

/// Parser output plus the counts the aggregator reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetParse {
    pub records: Vec<QuizRecord>,
    /// Data lines dropped because the title cell was empty or missing.
    pub rows_without_title: usize,
    /// Highest `{prefix}_{n}` index declared by the header row.
    pub numbered_width: usize,
}

/// Parse a sheet and keep only the records.
pub fn parse_sheet(text: &str, category: Category, schema: &ColumnSchema) -> Vec<QuizRecord> {
    parse_sheet_detailed(text, category, schema).records
}

/// Parse a sheet export.
///
/// Line 1 is the header. Each following line is zipped against it
/// positionally: missing trailing cells become `""`, extra cells are dropped.
/// Lines without a title are discarded before mapping, and the surviving
/// rows are indexed in their post-filter order.
pub fn parse_sheet_detailed(text: &str, category: Category, schema: &ColumnSchema) -> SheetParse {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return SheetParse::default();
    }

    let headers: Vec<String> = lines[0]
        .split('\t')
        .map(|h| h.trim().replace('\r', ""))
        .collect();

    let mut rows: Vec<(usize, RowMap)> = Vec::with_capacity(lines.len() - 1);
    let mut rows_without_title = 0usize;
    for (n, line) in lines[1..].iter().enumerate() {
        let values: Vec<&str> = line.split('\t').collect();
        let row: RowMap = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let v = values.get(i).map(|v| v.replace('\r', "")).unwrap_or_default();
                (h.clone(), v)
            })
            .collect();
        if schema.title_of(&row).is_none() {
            rows_without_title += 1;
            continue;
        }
        rows.push((n + 1, row));
    }

    let records = rows
        .iter()
        .enumerate()
        .map(|(index, (line_no, row))| {
            let mut rec = map_row(row, index, category, schema);
            rec.source_row = *line_no;
            rec
        })
        .collect();

    let numbered_width = numbered_width(&headers, schema);
    if numbered_width > schema.max_numbered_fields {
        tracing::warn!(
            category = %category,
            width = numbered_width,
            cap = schema.max_numbered_fields,
            "sheet declares more numbered columns than the configured cap; extra columns ignored"
        );
    }

    SheetParse {
        records,
        rows_without_title,
        numbered_width,
    }
}

/// Highest numeric suffix among headers that belong to a numbered series.
pub fn numbered_width(headers: &[String], schema: &ColumnSchema) -> usize {
    static RE_NUMBERED: OnceCell<Regex> = OnceCell::new();
    let re = RE_NUMBERED.get_or_init(|| {
        Regex::new(r"^(?P<prefix>.+)_(?P<n>\d+)$").expect("numbered header regex")
    });

    headers
        .iter()
        .filter_map(|h| re.captures(h))
        .filter(|caps| schema.numbered_prefixes().any(|p| p == &caps["prefix"]))
        .filter_map(|caps| caps["n"].parse::<usize>().ok())
        .max()
        .unwrap_or(0)
}
