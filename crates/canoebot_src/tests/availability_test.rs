//! Tests for hourly availability reduction and rendering.

mod test_utils;

use canoebot_error::SrcErrorKind;
use canoebot_src::{HourlySlot, RawTable, SlotAvailability, format_day, render_slots};
use test_utils::weekly_table;

fn uniform_row(hour: &str, court: usize, cell: &str) -> Vec<String> {
    let mut row = vec![hour.to_string(), court.to_string()];
    row.extend(std::iter::repeat_n(cell.to_string(), 8));
    row
}

fn hour_block(hour: &str, cells: &[&str]) -> Vec<Vec<String>> {
    cells
        .iter()
        .enumerate()
        .map(|(court, cell)| uniform_row(hour, court + 1, cell))
        .collect()
}

#[test]
fn test_slot_availability_from_cell() {
    assert_eq!(SlotAvailability::from("Avail"), SlotAvailability::Available);
    assert_eq!(SlotAvailability::from(" AVAIL "), SlotAvailability::Available);
    assert_eq!(SlotAvailability::from("Closed"), SlotAvailability::Closed);
    assert_eq!(
        SlotAvailability::from("NTU DBM"),
        SlotAvailability::Booked("NTU DBM".to_string())
    );
    assert_eq!(SlotAvailability::Closed.to_string(), "CLOSED");
    assert_eq!(
        "U1234567A".parse::<SlotAvailability>().unwrap(),
        SlotAvailability::Booked("U1234567A".to_string())
    );
}

#[test]
fn test_all_available_counts_every_court() {
    let table = RawTable::new(hour_block("0700-0800", &["Avail"; 6]));

    let slots = format_day(&table, 6, 0).unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].slots_text(), "6/6");
    assert_eq!(slots[0].available, 6);
}

#[test]
fn test_mixed_bookings_with_nothing_free() {
    let table = RawTable::new(hour_block(
        "0700-0800",
        &["NTU DBM", "U123", "NTU DBM", "CLOSED", "NTU DBM", "NTU DBM"],
    ));

    let slots = format_day(&table, 6, 0).unwrap();

    assert_eq!(slots[0].slots_text(), "0/6");
    assert_eq!(slots[0].label, None);
}

#[test]
fn test_uniform_booking_shows_label() {
    let table = RawTable::new(hour_block("0700-0800", &["NTU DBM"; 4]));

    let slots = format_day(&table, 4, 0).unwrap();

    assert_eq!(slots[0].slots_text(), "NTU DBM");
}

#[test]
fn test_uniform_closure_shows_closed() {
    let table = RawTable::new(hour_block("2100-2200", &["closed"; 3]));

    let slots = format_day(&table, 3, 0).unwrap();

    assert_eq!(slots[0].slots_text(), "CLOSED");
}

#[test]
fn test_partial_availability_ignores_labels() {
    let table = RawTable::new(hour_block("0700-0800", &["Avail", "NTU DBM", "NTU DBM"]));

    let slots = format_day(&table, 3, 0).unwrap();

    assert_eq!(slots[0].slots_text(), "1/3");
}

#[test]
fn test_single_court_always_reports_none_free() {
    let mut rows = hour_block("0700-0800", &["Avail"]);
    rows.extend(hour_block("0800-0900", &["U1234567A"]));
    let table = RawTable::new(rows);

    let slots = format_day(&table, 1, 0).unwrap();

    assert!(slots.iter().all(|slot| slot.slots_text() == "0/1"));
}

#[test]
fn test_offset_selects_day_column() {
    let table = weekly_table(6, 2);

    for day in 1..7 {
        let slots = format_day(&table, 6, day).unwrap();
        assert_eq!(slots[0].slots_text(), format!("{}/6", day));
    }
    assert_eq!(format_day(&table, 6, 0).unwrap()[0].slots_text(), "NTU DBM");
}

#[test]
fn test_offset_outside_table_is_rejected() {
    let table = weekly_table(2, 1);

    let err = format_day(&table, 2, 8).unwrap_err();

    assert!(matches!(err.kind(), SrcErrorKind::Format(_)));
}

#[test]
fn test_rows_not_divisible_by_courts() {
    let table = weekly_table(6, 2);
    let mut rows = table.rows().to_vec();
    rows.pop();

    let err = format_day(&RawTable::new(rows), 6, 0).unwrap_err();

    assert!(matches!(err.kind(), SrcErrorKind::Format(_)));
}

#[test]
fn test_short_row_is_rejected() {
    let mut rows = hour_block("0700-0800", &["Avail", "Avail"]);
    rows[1].truncate(5);

    assert!(RawTable::new(rows).validate(2).is_err());
    assert!(RawTable::default().validate(2).is_err());
}

#[test]
fn test_hour_labels_one_per_block() {
    let table = weekly_table(4, 3);

    let labels = table.hour_labels(4).unwrap();

    assert_eq!(labels, vec!["0800-0900", "0900-1000", "1000-1100"]);
}

#[test]
fn test_render_slots_aligns_columns() {
    let slots = vec![
        HourlySlot {
            time: "0700-0800".to_string(),
            total: 6,
            available: 6,
            label: None,
        },
        HourlySlot {
            time: "0800-0900".to_string(),
            total: 6,
            available: 0,
            label: Some("NTU DBM".to_string()),
        },
    ];

    let rendered = render_slots(&slots);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "time         slots");
    assert_eq!(lines[1], "0700-0800      6/6");
    assert_eq!(lines[2], "0800-0900  NTU DBM");
}

#[test]
fn test_render_empty_slots_is_header_only() {
    assert_eq!(render_slots(&[]), "time  slots\n");
}
