use bioreport::logger::{Logger, LoggerConfig};
use bioreport::table::{Table, read_table};
use bioreport::venn::{
    CellMetrics, MIN_CANVAS_WIDTH, OutputFormat, PALETTE, REFERENCE_GLYPH, TextMeasurer,
    VennEngine, VennError, VennOptions,
};
use proptest::prelude::*;

fn column(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| (!v.is_empty()).then(|| (*v).to_string()))
        .collect()
}

fn engine(formats: Vec<OutputFormat>) -> VennEngine {
    VennEngine::offline(VennOptions {
        formats,
        ..VennOptions::default()
    })
}

fn three_set_table() -> Table {
    Table::from_columns(
        vec!["Set1".to_string(), "Set2".to_string(), "Set3".to_string()],
        vec![
            column(&["A", "B", "C", ""]),
            column(&["B", "C", "D", "E"]),
            column(&["A", "E", "F", ""]),
        ],
    )
    .unwrap()
}

#[test]
fn test_three_sets_are_drawn_saved_and_tabulated() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("out").join("venn");
    let log_path = dir.path().join("log.txt");
    let logger = Logger::new(LoggerConfig::new(&log_path, false, true));

    let result = engine(vec![OutputFormat::Png, OutputFormat::Svg])
        .draw(&three_set_table(), &stem, Some(&logger))
        .unwrap();

    assert_eq!(result.table.column_count(), 3);
    assert_eq!(result.table.row_count(), 4);
    assert_eq!(result.table.column("Set1").unwrap()[3], None);
    assert_eq!(
        result.table.column("Set2").unwrap()[3],
        Some("E".to_string())
    );

    let glyph = CellMetrics.width(REFERENCE_GLYPH, "sans-serif", 12.0);
    assert_eq!(result.plot.canvas.height, 2.0 * glyph + 7.0);
    assert_eq!(result.plot.canvas.width, MIN_CANVAS_WIDTH);
    assert_eq!(result.plot.colors, PALETTE[..3].to_vec());

    assert_eq!(result.saved.len(), 2);
    for path in &result.saved {
        assert!(path.exists(), "missing {}", path.display());
    }
    let png = image::open(&result.saved[0]).unwrap();
    assert!((2399..=2401).contains(&png.width()));

    let log = std::fs::read_to_string(&log_path).unwrap();
    let saved_lines = log
        .lines()
        .filter(|line| line.contains("[INFO] - Venn diagram saved to"))
        .count();
    assert_eq!(saved_lines, 2);
}

#[test]
fn test_five_sets_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["a", "b", "c", "d", "e"];
    let table = Table::from_columns(
        names.iter().map(|n| (*n).to_string()).collect(),
        names.iter().map(|n| column(&[*n])).collect(),
    )
    .unwrap();

    let err = engine(vec![OutputFormat::Svg])
        .draw(&table, &dir.path().join("venn"), None)
        .unwrap_err();

    assert!(matches!(err, VennError::UnsupportedSetCount(5)));
    assert!(!dir.path().join("venn.svg").exists());
}

#[test]
fn test_single_set_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let table = Table::from_columns(vec!["only".to_string()], vec![column(&["x", "y"])]).unwrap();

    let err = engine(vec![OutputFormat::Svg])
        .draw(&table, &dir.path().join("venn"), None)
        .unwrap_err();

    assert!(matches!(err, VennError::UnsupportedSetCount(1)));
}

#[test]
fn test_csv_file_round_trip_through_engine() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sets.csv");
    std::fs::write(
        &input,
        "up,down,shared,unused\nTP53,BRCA1,TP53,\nEGFR,,BRCA1,\nMYC,,,\n",
    )
    .unwrap();

    let table = read_table(&input, None).unwrap();
    let result = engine(vec![OutputFormat::Svg])
        .draw(&table, &dir.path().join("venn"), None)
        .unwrap();

    assert_eq!(result.table.headers, vec!["up", "down", "shared"]);
    assert_eq!(result.table.row_count(), 3);
    let all_three = result
        .plot
        .regions
        .iter()
        .find(|r| r.mask == 0b111)
        .unwrap();
    assert!(all_three.members.is_empty());
    let up_and_shared = result.plot.regions.iter().find(|r| r.mask == 0b101).unwrap();
    assert_eq!(up_and_shared.members, vec!["TP53"]);

    let out = dir.path().join("table.csv");
    result.table.write_csv(&out).unwrap();
    let written = read_table(&out, None).unwrap();
    assert_eq!(written, result.table);
}

#[test]
fn test_repeated_draws_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine(vec![OutputFormat::Svg]);

    let first = engine
        .draw(&three_set_table(), &dir.path().join("a"), None)
        .unwrap();
    let second = engine
        .draw(&three_set_table(), &dir.path().join("b"), None)
        .unwrap();

    assert_eq!(first.plot, second.plot);
    assert_eq!(
        first.plot.canvas.width.to_bits(),
        second.plot.canvas.width.to_bits()
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn drawn_table_matches_non_empty_columns(
        columns in proptest::collection::vec(
            proptest::collection::vec(proptest::option::of("[a-f]{1,3}"), 0..6),
            2..=6,
        ),
    ) {
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        let padded = columns
            .iter()
            .map(|c| {
                let mut c = c.clone();
                c.resize(rows, None);
                c
            })
            .collect::<Vec<_>>();
        let headers = (0..padded.len()).map(|i| format!("set{i}")).collect::<Vec<_>>();
        let non_empty = padded
            .iter()
            .filter(|c| c.iter().any(Option::is_some))
            .collect::<Vec<_>>();
        let table = Table::from_columns(headers, padded.clone()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let result = engine(vec![OutputFormat::Svg]).draw(&table, &dir.path().join("venn"), None);

        if (2..=4).contains(&non_empty.len()) {
            let result = result.unwrap();
            let longest = non_empty
                .iter()
                .map(|c| c.iter().flatten().count())
                .max()
                .unwrap_or(0);
            prop_assert_eq!(result.table.column_count(), non_empty.len());
            prop_assert_eq!(result.table.row_count(), longest);
            prop_assert!(result.plot.canvas.width >= MIN_CANVAS_WIDTH);
        } else {
            prop_assert!(
                matches!(result, Err(VennError::UnsupportedSetCount(n)) if n == non_empty.len()),
                "unexpected result"
            );
        }
    }
}
