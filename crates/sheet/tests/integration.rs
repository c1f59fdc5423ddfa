use tempfile::tempdir;
use wafertally_sheet::{Book, CellValue, Sheet};

// ===== Grid semantics =====

#[test]
fn test_col_count_is_widest_row() {
    let sheet = Sheet::from_data(vec![vec![1, 2], vec![3, 4, 5, 6], vec![7]]);

    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.col_count(), 4);
}

#[test]
fn test_cell_reads_are_total() {
    let sheet = Sheet::from_data(vec![vec!["a"]]);

    // In-grid
    assert_eq!(sheet.cell(0, 0), &CellValue::String("a".to_string()));
    // Off the end of the row, off the end of the sheet
    assert!(sheet.cell(0, 5).is_null());
    assert!(sheet.cell(9, 0).is_null());
}

// ===== Export formats over one result grid =====

fn result_grid() -> Sheet {
    let mut sheet = Sheet::with_name("批次A");
    sheet.push_row(vec!["设备ID", "数量", ""]);
    sheet.push_row(vec!["D1-01", "5", ""]);
    sheet.push_row(vec!["空白", "2", ""]);
    sheet
}

#[test]
fn test_csv_export_of_result_grid() {
    let csv = result_grid().to_csv_string();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "设备ID,数量,");
    assert_eq!(lines[2], "空白,2,");
}

#[test]
fn test_json_export_of_result_grid() {
    let json = result_grid().to_json_string().unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["设备ID"], "D1-01");
    assert_eq!(parsed[1]["设备ID"], "空白");
}

#[test]
fn test_xlsx_export_of_result_grid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.xlsx");

    result_grid().save_as_xlsx(&path).unwrap();
    let loaded = Sheet::from_xlsx_sheet(&path, "批次A").unwrap();

    assert_eq!(loaded.row_count(), 3);
    assert!(matches!(loaded.get(0, 0).unwrap(), CellValue::String(s) if s == "设备ID"));
    // "5" was written as a string cell and survives as one
    assert!(matches!(loaded.get(1, 1).unwrap(), CellValue::String(s) if s == "5"));
}

#[test]
fn test_book_keeps_workbook_sheet_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ordered.xlsx");

    let mut book = Book::with_name("input");
    book.add_sheet("第三批", Sheet::from_data(vec![vec![3]]))
        .unwrap();
    book.add_sheet("第一批", Sheet::from_data(vec![vec![1]]))
        .unwrap();
    book.save_as_xlsx(&path).unwrap();

    let loaded = Book::from_xlsx(&path).unwrap();
    assert_eq!(loaded.sheet_names(), vec!["第三批", "第一批"]);
}
