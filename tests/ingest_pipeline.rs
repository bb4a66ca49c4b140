// tests/ingest_pipeline.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use tracnghiem_feed::ingest::providers::sheet::SheetTsvProvider;
use tracnghiem_feed::ingest::row::ColumnSchema;
use tracnghiem_feed::ingest::tsv::parse_sheet;
use tracnghiem_feed::ingest::{self, types::SheetProvider};
use tracnghiem_feed::{Category, QuizRecord, QuizType};

const CON_GIAP_TSV: &str = include_str!("fixtures/con_giap.tsv");
const QUIZ_TSV: &str = include_str!("fixtures/quiz.tsv");
const CUNG_TSV: &str = include_str!("fixtures/cung_hoang_dao.tsv");

fn local_midnight_ms(y: i32, m: u32, d: u32) -> i64 {
    Local
        .with_ymd_and_hms(y, m, d, 0, 0, 0)
        .earliest()
        .unwrap()
        .timestamp_millis()
}

struct FailingProvider(Category);

#[async_trait]
impl SheetProvider for FailingProvider {
    async fn fetch_records(&self) -> Result<Vec<QuizRecord>> {
        Err(anyhow!("connection reset"))
    }
    fn category(&self) -> Category {
        self.0
    }
}

#[test]
fn single_row_end_to_end() {
    let text = "tieu_de\tngay_thang_nam\tanswer_1\tanswer_2\nTest Quiz\t01/02/2023\tA\tB";
    let out = parse_sheet(text, Category::Quiz, &ColumnSchema::default());
    assert_eq!(out.len(), 1);
    let rec = &out[0];
    assert_eq!(rec.id, "Quiz-0");
    assert_eq!(rec.title, "Test Quiz");
    assert_eq!(rec.timestamp, local_midnight_ms(2023, 2, 1));
    assert_eq!(rec.answers, vec!["A", "B"]);
    assert!(rec.answer_images.is_empty());
    assert_eq!(rec.quiz_type, QuizType::HoiDap);
}

#[test]
fn fixture_rows_map_to_expected_records() {
    let out = parse_sheet(CON_GIAP_TSV, Category::ConGiap, &ColumnSchema::default());
    assert_eq!(out.len(), 2, "untitled row must be dropped");

    let zodiac = &out[0];
    assert_eq!(zodiac.id, "12 Con giáp-0");
    assert_eq!(zodiac.quiz_type, QuizType::TuVi);
    assert_eq!(zodiac.answers, vec!["Tý", "Sửu", "Dần"]);
    assert_eq!(zodiac.answer_images.len(), 3);
    assert_eq!(zodiac.results.len(), zodiac.result_images.len());
    assert_eq!(zodiac.timestamp, local_midnight_ms(2024, 3, 12));

    let ranking = &out[1];
    assert_eq!(ranking.id, "12 Con giáp-1");
    assert_eq!(ranking.source_row, 3);
    assert_eq!(ranking.quiz_type, QuizType::XepHang);
    assert_eq!(ranking.results, vec!["Hạng 1: Thìn", "Hạng 2: Tỵ", "Hạng 3: Ngọ"]);
    assert!(ranking.answer_images.is_empty());
    assert_eq!(ranking.thumbnail_url, "https://picsum.photos/400/300");
}

#[test]
fn malformed_dates_and_types_degrade() {
    let out = parse_sheet(QUIZ_TSV, Category::Quiz, &ColumnSchema::default());
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].quiz_type, QuizType::DienDapAn);
    assert!(out[0].answers.is_empty());
    assert_eq!(out[0].results, vec!["con cua", "cua"]);
    // "không rõ" is not a date; empty type label is Q&A
    assert_eq!(out[1].timestamp, 0);
    assert_eq!(out[1].date_text, "không rõ");
    assert_eq!(out[1].quiz_type, QuizType::HoiDap);
}

#[tokio::test]
async fn merged_output_is_newest_first_across_sources() {
    let providers: Vec<Box<dyn SheetProvider>> = vec![
        Box::new(SheetTsvProvider::from_fixture(Category::ConGiap, CON_GIAP_TSV)),
        Box::new(SheetTsvProvider::from_fixture(Category::CungHoangDao, CUNG_TSV)),
        Box::new(SheetTsvProvider::from_fixture(Category::Quiz, QUIZ_TSV)),
    ];
    let out = ingest::run_once(&providers).await;
    let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "12 Con giáp-0",    // 12/03/2024
            "Cung hoàng đạo-0", // 15/02/2024
            "Quiz-2",           // 01/09/2023
            "Quiz-0",           // 20/06/2023
            "12 Con giáp-1",    // 05/01/2023
            "Quiz-1",           // undated
        ]
    );
}

#[tokio::test]
async fn two_sources_sorted_by_date() {
    let a = "tieu_de\tngay_thang_nam\nOld\t01/01/2020";
    let b = "tieu_de\tngay_thang_nam\nNew\t01/01/2024";
    let providers: Vec<Box<dyn SheetProvider>> = vec![
        Box::new(SheetTsvProvider::from_fixture(Category::Quiz, a)),
        Box::new(SheetTsvProvider::from_fixture(Category::ConGiap, b)),
    ];
    let out = ingest::run_once(&providers).await;
    let titles: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["New", "Old"]);
}

#[tokio::test]
async fn failing_source_contributes_nothing() {
    let providers: Vec<Box<dyn SheetProvider>> = vec![
        Box::new(FailingProvider(Category::ConGiap)),
        Box::new(SheetTsvProvider::from_fixture(Category::Quiz, QUIZ_TSV)),
    ];
    let out = ingest::run_once(&providers).await;
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|r| r.category == Category::Quiz));
    assert!(out.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[tokio::test]
async fn all_sources_failing_is_empty_not_error() {
    let providers: Vec<Box<dyn SheetProvider>> = Category::ALL
        .into_iter()
        .map(|c| Box::new(FailingProvider(c)) as Box<dyn SheetProvider>)
        .collect();
    assert!(ingest::run_once(&providers).await.is_empty());
}

#[tokio::test]
async fn equal_timestamps_keep_source_then_row_order() {
    let a = "tieu_de\nA0\nA1";
    let b = "tieu_de\nB0";
    let providers: Vec<Box<dyn SheetProvider>> = vec![
        Box::new(SheetTsvProvider::from_fixture(Category::Quiz, a)),
        Box::new(SheetTsvProvider::from_fixture(Category::ConGiap, b)),
    ];
    let out = ingest::run_once(&providers).await;
    let titles: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A0", "A1", "B0"]);
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let providers: Vec<Box<dyn SheetProvider>> = vec![
        Box::new(SheetTsvProvider::from_fixture(Category::ConGiap, CON_GIAP_TSV)),
        Box::new(SheetTsvProvider::from_fixture(Category::Quiz, QUIZ_TSV)),
    ];
    let first = ingest::run_once(&providers).await;
    let second = ingest::run_once(&providers).await;
    assert_eq!(first, second);
}
