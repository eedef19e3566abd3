use rust_xlsxwriter::{Color, Format, Workbook};
use scoreboard_import::extract::{SkipReason, extract_sheets};
use scoreboard_import::io::excel_read;
use scoreboard_import::io::sheet::CellValue;
use scoreboard_import::io::styles;
use scoreboard_import::model::{Attendance, Fulfillment};
use tempfile::tempdir;

const LEGEND: &str = "Legend: ✅ marks a kept commitment and ❌ marks a missed one this week";

fn solid(rgb: u32) -> Format {
    Format::new().set_background_color(Color::RGB(rgb))
}

/// Two scoreboards plus a notes tab without dates.
fn write_fixture(path: &std::path::Path) {
    let green = solid(0x92D050);
    let red = solid(0xFFC7CE);
    let yellow = solid(0xFFFF00);
    let dated_green = Format::new()
        .set_num_format("yyyy-mm-dd")
        .set_background_color(Color::RGB(0x00FF00));

    let mut workbook = Workbook::new();

    let jane = workbook.add_worksheet();
    jane.set_name("Jane Doe").expect("sheet named");
    jane.write_string(0, 0, "Jane Doe scoreboard").expect("title");
    jane.write_string(1, 0, "Date").expect("header");
    jane.write_string(1, 2, LEGEND).expect("legend");
    jane.write_string_with_format(2, 0, "2024-01-10", &green).expect("date");
    jane.write_string(2, 2, "✅ Ship feature\n❌ Write tests").expect("commitments");
    jane.write_number_with_format(3, 0, 45308.0, &dated_green).expect("native date");
    jane.write_string(3, 2, "Pair with John").expect("commitments");
    jane.write_string_with_format(4, 0, "24/01/2024", &red).expect("date");
    jane.write_string_with_format(5, 0, "01/31/2024", &yellow).expect("date");
    jane.write_string(6, 0, "nan").expect("placeholder");

    let john = workbook.add_worksheet();
    john.set_name("John Roe").expect("sheet named");
    john.write_string_with_format(0, 1, "2024-01-10", &red).expect("date");

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").expect("sheet named");
    notes.write_string(0, 0, "Scoreboards are updated every Friday").expect("note");

    workbook.save(path).expect("workbook saved");
}

#[test]
fn fills_are_read_from_the_package() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("scoreboards.xlsx");
    write_fixture(&path);

    let fills = styles::read_cell_fills(&path).expect("fills read");
    let jane = &fills["Jane Doe"];
    assert!(jane[&(2, 0)].is_solid());
    assert_eq!(jane[&(2, 0)].rgb.as_deref(), Some("FF92D050"));
    assert_eq!(jane[&(4, 0)].rgb.as_deref(), Some("FFFFC7CE"));
    assert!(!jane.contains_key(&(2, 2)));
    assert!(fills["Notes"].is_empty());
}

#[test]
fn sheets_combine_values_and_fills() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("scoreboards.xlsx");
    write_fixture(&path);

    let sheets = excel_read::read_sheets(&path).expect("sheets read");
    let names: Vec<&str> = sheets.iter().map(|sheet| sheet.name.as_str()).collect();
    assert_eq!(names, vec!["Jane Doe", "John Roe", "Notes"]);

    let jane = &sheets[0];
    assert_eq!(jane.value(2, 0), &CellValue::Text("2024-01-10".into()));
    assert!(jane.fill(2, 0).is_some());
    assert!(jane.fill(1, 0).is_none());

    let john = &sheets[1];
    assert_eq!(john.value(0, 1), &CellValue::Text("2024-01-10".into()));
}

#[test]
fn workbook_extracts_attendance_and_commitments() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("scoreboards.xlsx");
    write_fixture(&path);

    let sheets = excel_read::read_sheets(&path).expect("sheets read");
    let report = extract_sheets(&sheets);

    let jane = &report.document["Jane Doe"];
    let dates: Vec<&str> = jane.keys().map(String::as_str).collect();
    assert_eq!(dates, vec!["2024-01-10", "2024-01-17", "2024-01-24", "2024-01-31"]);

    assert_eq!(jane["2024-01-10"].attendance, Attendance::Attended);
    assert_eq!(jane["2024-01-10"].commitments.len(), 2);
    assert_eq!(jane["2024-01-10"].commitments[1].fulfilled, Fulfillment::Unfulfilled);

    assert_eq!(jane["2024-01-17"].attendance, Attendance::Attended);
    assert_eq!(jane["2024-01-17"].commitments[0].text, "Pair with John");
    assert_eq!(jane["2024-01-17"].commitments[0].fulfilled, Fulfillment::Unknown);

    assert_eq!(jane["2024-01-24"].attendance, Attendance::NotAttended);
    assert_eq!(jane["2024-01-31"].attendance, Attendance::Unknown);

    let john = &report.document["John Roe"];
    assert_eq!(john["2024-01-10"].attendance, Attendance::NotAttended);
    assert!(john["2024-01-10"].commitments.is_empty());

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].sheet, "Notes");
    assert_eq!(report.skipped[0].reason, SkipReason::NoDateColumn);
}
