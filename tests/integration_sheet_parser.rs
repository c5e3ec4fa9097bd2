//! Integration tests for the sheet pipeline
//!
//! These tests write sheets to disk, load them back through the loader and
//! batch layers, and check the matrix, colour layout and data frame produced.

use heatmap_maker::batch::parse_sheets;
use heatmap_maker::loader::{discover_sheets, load_sheet};
use heatmap_maker::render::{ColorScale, ColorScaleConfig, HeatmapLayout, LayoutConfig};
use heatmap_maker::{
    CellErrorReason, DecimalMark, HeatmapConfig, HeatmapError, ParseOptions, ParseStage,
    ShapeError, SheetParser, parse_sheet,
};
use std::fs;
use tempfile::TempDir;

fn write_sheet(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test sheet");
    path
}

/// Purpose: the basic two-by-two sheet produces labels and values in source order
#[tokio::test]
async fn test_load_and_parse_basic_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_sheet(&temp_dir, "basic.csv", ";A;B\nX;1;2\nY;3;4");

    let bytes = load_sheet(&path).await.unwrap();
    let result = SheetParser::default().parse(&bytes);

    assert!(result.is_success());
    assert_eq!(result.final_stage(), ParseStage::Succeeded);
    let matrix = result.matrix().unwrap();
    assert_eq!(matrix.row_labels(), &["X", "Y"]);
    assert_eq!(matrix.column_labels(), &["A", "B"]);
    assert_eq!(matrix.to_nested(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
}

/// Purpose: a row with too few fields is reported at its source row index
#[test]
fn test_ragged_row_reported_with_position() {
    let err = parse_sheet(";A;B\nX;1;2\nY;3", &ParseOptions::default()).unwrap_err();

    match err {
        HeatmapError::Shape(ShapeError::RaggedRow {
            row,
            expected,
            found,
        }) => {
            assert_eq!(row, 2);
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("Expected ragged row, got {:?}", other),
    }
}

/// Purpose: one bad cell fails the whole sheet and is located exactly
#[test]
fn test_bad_cell_reported_with_position() {
    let err = parse_sheet(";A;B\nX;1;q\nY;3;4", &ParseOptions::default()).unwrap_err();

    let diagnostics = err.diagnostics().expect("incomplete matrix carries diagnostics");
    let cells: Vec<_> = diagnostics.cell_errors().collect();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].row, 1);
    assert_eq!(cells[0].column, 2);
    assert_eq!(cells[0].raw_value, "q");
    assert_eq!(cells[0].reason, CellErrorReason::NotANumber);
}

/// Purpose: every bad cell is collected, not just the first
#[test]
fn test_all_bad_cells_collected() {
    let sheet = ";A;B;C\nX;a;2;\nY;3;inf;4\nZ;1e999;5;6";
    let result = SheetParser::default().parse_str(sheet);

    assert!(!result.is_success());
    assert_eq!(result.final_stage(), ParseStage::Failed);
    let positions: Vec<(usize, usize)> = result
        .diagnostics
        .cell_errors()
        .map(|e| (e.row, e.column))
        .collect();
    assert_eq!(positions, vec![(1, 1), (1, 3), (2, 2), (3, 1)]);
}

/// Purpose: sheets exported with a German locale parse with the comma option
#[tokio::test]
async fn test_decimal_comma_export() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_sheet(
        &temp_dir,
        "export.csv",
        "\u{feff}Probe;Gen1;Gen2\r\nKontrolle;0,5;-1,25\r\nBehandlung;3,75;0\r\n\r\n",
    );

    let options = ParseOptions::default().with_decimal_mark(DecimalMark::Comma);
    let bytes = load_sheet(&path).await.unwrap();
    let matrix = SheetParser::new(options).parse(&bytes).into_result().unwrap();

    assert_eq!(matrix.row_labels(), &["Kontrolle", "Behandlung"]);
    assert_eq!(matrix.to_nested(), vec![vec![0.5, -1.25], vec![3.75, 0.0]]);
}

/// Purpose: the parsed matrix drives a layout with centred colours
#[test]
fn test_matrix_to_layout() {
    let matrix = parse_sheet(";A;B\nX;-4;0\nY;4;2", &ParseOptions::default()).unwrap();
    let scale = ColorScale::new(&ColorScaleConfig::default()).unwrap();
    let layout = HeatmapLayout::build(&matrix, &scale, &LayoutConfig::default()).unwrap();

    assert_eq!(layout.cells.len(), 4);
    assert_eq!(layout.row_labels.len(), 2);
    assert_eq!(layout.column_labels.len(), 2);

    let low = layout.cell(0, 0).unwrap();
    let center = layout.cell(0, 1).unwrap();
    let high = layout.cell(1, 0).unwrap();
    assert_eq!(low.color, scale.color(-4.0));
    assert_eq!(center.color, scale.color(0.0));
    assert_eq!(high.color, scale.color(4.0));
    assert_ne!(low.color, high.color);
    assert_eq!(center.annotation.as_deref(), Some("0.0"));

    // Row 1 sits below row 0
    assert!(high.y > low.y);
    assert_eq!(high.x, low.x);
}

/// Purpose: the data frame mirrors the sheet with unique column names
#[test]
fn test_matrix_to_data_frame() {
    let matrix = parse_sheet(";A;A;B\nX;1;2;3\nY;4;5;6", &ParseOptions::default()).unwrap();
    let df = matrix.to_data_frame().unwrap();

    assert_eq!(df.shape(), (2, 4));
    assert_eq!(df.get_column_names_str(), vec!["row_label", "A", "A_2", "B"]);
}

/// Purpose: a directory of sheets is parsed as one batch in sorted order
#[tokio::test]
async fn test_directory_batch() {
    let temp_dir = TempDir::new().unwrap();
    write_sheet(&temp_dir, "b.csv", ";A;B\nX;1;2\nY;3;4");
    write_sheet(&temp_dir, "a.csv", ";A\nX;oops");
    write_sheet(&temp_dir, "readme.md", "not a sheet");

    let sheets = discover_sheets(temp_dir.path()).unwrap();
    assert_eq!(sheets.len(), 2);

    let config = HeatmapConfig::default();
    let report = parse_sheets(sheets, &config.parse, 2, None).await;

    assert!(!report.all_succeeded());
    assert_eq!(report.stats.sheets_parsed, 1);
    assert_eq!(report.stats.sheets_failed, 1);
    assert_eq!(report.stats.cell_errors, 1);
    assert!(report.sheets[0].path.ends_with("a.csv"));
    assert!(!report.sheets[0].is_success());
    assert!(report.sheets[1].is_success());
}

/// Purpose: invalid bytes stop the parse at tokenizing
#[test]
fn test_invalid_utf8_is_malformed() {
    let result = SheetParser::default().parse(b";A\nX;\xff");

    assert!(matches!(
        result.outcome,
        Err(HeatmapError::MalformedInput { .. })
    ));
    assert_eq!(
        result.stages,
        vec![ParseStage::Start, ParseStage::Tokenizing, ParseStage::Failed]
    );
}
