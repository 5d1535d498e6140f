use std::fs;

use tabstat::domain::{DEFAULT_PERCENTILES, DropHow, LoadOptions, TableError};
use tabstat::loader::TableLoader;
use tabstat::view::TableView;
use tabstat::{read_csv, read_table};

const PEOPLE: &str = "Name,Age,City\nJohn,30,NY\nAlice,25,LN\nBob,35,TK\n";

fn write_fixture(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.csv");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn load_people_file() {
    let (_dir, path) = write_fixture(PEOPLE);
    let view = read_csv(&path).unwrap();
    assert_eq!(view.row_count(), 3);
    assert_eq!(view.column_count(), 3);
    assert_eq!(view.headers(), &["Name", "Age", "City"]);
    assert_eq!(view.get_column("Age").unwrap(), vec!["30", "25", "35"]);
}

#[test]
fn statistics_on_simple_column() {
    let table = TableLoader::parse_str("x\n1\n2\n3\n4\n", &LoadOptions::default()).unwrap();
    let view = TableView::from(table);
    assert_eq!(view.mean("x").unwrap(), 2.5);
    assert!((view.var("x").unwrap() - 5.0 / 3.0).abs() < 1e-12);
    assert!((view.std("x").unwrap() - 1.2910).abs() < 1e-4);
    assert_eq!(view.min("x").unwrap(), 1.0);
    assert_eq!(view.max("x").unwrap(), 4.0);
    assert_eq!(view.quantile("x", 0.5).unwrap(), 2.5);
}

#[test]
fn empty_cells_are_skipped_by_reductions() {
    let table = TableLoader::parse_str("v\n1\n\n3\n", &LoadOptions::default()).unwrap();
    // the blank line is not a row
    assert_eq!(table.row_count(), 2);

    let table = TableLoader::parse_str("v,w\n1,a\n,b\n3,c\n", &LoadOptions::default()).unwrap();
    let view = TableView::from(table);
    let values = view.numeric_column("v").unwrap();
    assert_eq!(values[0], 1.0);
    assert!(values[1].is_nan());
    assert_eq!(values[2], 3.0);
    assert_eq!(view.count("v").unwrap(), 2);
    assert_eq!(view.mean("v").unwrap(), 2.0);
    assert_eq!(view.var("v").unwrap(), 2.0);
}

#[test]
fn projection_resolves_against_full_table() {
    let table = TableLoader::parse_str("A,B,C\n1,2,3\n", &LoadOptions::default()).unwrap();
    let narrowed = TableView::from(table).project(&["B"]).unwrap();
    match narrowed.project(&["D"]) {
        Err(TableError::ColumnsNotFound(names)) => assert_eq!(names, vec!["D"]),
        other => panic!("unexpected result: {other:?}"),
    }
    let widened = narrowed.project(&["C", "A"]).unwrap();
    assert_eq!(widened.get_row(0).unwrap(), vec!["3", "1"]);
}

#[test]
fn save_and_reload_projection() {
    let (dir, path) = write_fixture(PEOPLE);
    let view = read_csv(&path).unwrap().project(&["City", "Name"]).unwrap();
    let out = dir.path().join("out.tsv");
    view.save(&out, '\t').unwrap();

    let options = LoadOptions::default().delimiter('\t');
    let reloaded = read_table(&out, &options).unwrap();
    assert_eq!(reloaded.headers(), &["City", "Name"]);
    assert_eq!(reloaded.data().unwrap(), view.data().unwrap());
}

#[test]
fn save_and_reload_full_table() {
    let (dir, path) = write_fixture("a,b\n1,\n,2\n");
    let options = LoadOptions::default();
    let table = TableLoader::load(&path, &options).unwrap();
    let out = dir.path().join("copy.csv");
    table.save(&out, ',').unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "a,b\n1,\n,2\n");
    let reloaded = TableLoader::load(&out, &options).unwrap();
    assert_eq!(reloaded, table);
    assert_eq!(reloaded.get_row(0).unwrap(), &["1", ""]);
    assert_eq!(reloaded.get_row(1).unwrap(), &["", "2"]);
}

#[test]
fn save_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let table = TableLoader::parse_str("a\n1\n", &LoadOptions::default()).unwrap();
    let target = dir.path().join("no_such_dir").join("out.csv");
    assert!(matches!(table.save(&target, ','), Err(TableError::Io(_))));
    assert!(TableView::from(table).save(&target, ',').is_err());
}

#[test]
fn dropna_then_describe() {
    let (_dir, path) = write_fixture("a,b,c\n1,2,x\n,4,y\n5,,\n7,8,z\n");
    let view = read_csv(&path).unwrap();

    let any = view.dropna::<&str>(&[], DropHow::Any).unwrap();
    assert_eq!(any.row_count(), 2);
    assert!(any.row_count() <= view.row_count());
    for row in any.data().unwrap() {
        assert!(row.iter().all(|c| !c.is_empty()));
    }

    let subset = view.dropna(&["a"], DropHow::All).unwrap();
    assert_eq!(subset.row_count(), 3);
    assert_eq!(subset.headers(), view.headers());

    let summary = any.describe(&DEFAULT_PERCENTILES).unwrap();
    assert_eq!(summary.columns(), &["a", "b"]);
    assert_eq!(
        summary.index(),
        &["count", "mean", "std", "min", "max", "25.0%", "50.0%", "75.0%"]
    );
    assert_eq!(summary.value("count", "a"), 2.0);
    assert_eq!(summary.value("mean", "b"), 5.0);
    assert_eq!(summary.value("max", "a"), 7.0);

    // the source view still sees every row
    assert_eq!(view.row_count(), 4);
}

#[test]
fn dropna_rejects_inactive_subset() {
    let table = TableLoader::parse_str("a,b\n1,2\n", &LoadOptions::default()).unwrap();
    let view = TableView::from(table).project(&["a"]).unwrap();
    assert!(matches!(
        view.dropna(&["b"], DropHow::Any),
        Err(TableError::ColumnsNotFound(_))
    ));
}

#[test]
fn missing_file_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_csv(dir.path().join("absent.csv")),
        Err(TableError::FileNotFound(_))
    ));
    assert!(matches!(
        read_csv(dir.path()),
        Err(TableError::LoadingFailed(_))
    ));
}

#[test]
fn headerless_load_with_semicolons() {
    let (_dir, path) = write_fixture("1;2\r\n3;4\r\n");
    let options = LoadOptions::default().has_header(false).delimiter(';');
    let view = read_table(&path, &options).unwrap();
    assert!(view.headers().is_empty());
    assert_eq!(view.row_count(), 2);
    assert_eq!(view.table().get_column_at(1).unwrap(), vec!["2", "4"]);
}
