//! Integration tests for ResultSet over manager-built partitions.
//!
//! These tests drive the public API the way a consumer would: check
//! availability, pull, and observe which partitions are still live.

use resultset::datum::{Type, Value};
use resultset::fallback::{FallbackObject, FallbackValue};
use resultset::partition::{Partition, PartitionManager, PartitionManagerConfig};
use resultset::{ResultSet, Row, RowLimit, Schema};

fn bool_schema() -> Schema {
    Schema::new(vec![Type::Bool])
}

/// Builds one partition holding the given rows.
fn build_partition(manager: &PartitionManager, schema: &Schema, values: Vec<Vec<Value>>) -> Partition {
    let mut writer = manager.writer(schema);
    for values in values {
        writer
            .append(&Row::new(schema.clone(), values).unwrap())
            .unwrap();
    }
    writer.finish().unwrap()
}

fn text(row: &Row) -> &str {
    match &row.values()[0] {
        Value::Text(s) => s,
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_single_partition_fixed_width_rows() {
    let manager = PartitionManager::default();
    let schema = bool_schema();
    let partition = build_partition(
        &manager,
        &schema,
        vec![
            vec![Value::Boolean(true)],
            vec![Value::Boolean(false)],
            vec![Value::Boolean(true)],
        ],
    );
    let id = partition.id();

    let mut rs = ResultSet::new(schema, vec![partition], Vec::new(), Vec::new(), RowLimit::AtMost(10));

    let first = rs.get_next_row().unwrap().unwrap();
    let second = rs.get_next_row().unwrap().unwrap();
    assert!(manager.is_live(id));
    let third = rs.get_next_row().unwrap().unwrap();
    assert!(!manager.is_live(id), "partition retired after its last row");

    assert_eq!(first.values(), &[Value::Boolean(true)]);
    assert_eq!(second.values(), &[Value::Boolean(false)]);
    assert_eq!(third.values(), &[Value::Boolean(true)]);
    // 1 bitmap byte + 1 value byte
    assert_eq!(first.serialized_len(), 2);

    assert!(rs.get_next_row().unwrap().is_none());
    assert!(!rs.has_next_row());
}

#[test]
fn test_fallback_only_with_duplicate_indices() {
    let objects = vec![
        (0, FallbackObject::new(FallbackValue::Str("a".into()))),
        (0, FallbackObject::new(FallbackValue::Str("b".into()))),
        (2, FallbackObject::new(FallbackValue::Str("c".into()))),
    ];
    let mut rs = ResultSet::new(
        Schema::new(vec![Type::Text]),
        Vec::new(),
        Vec::new(),
        objects,
        RowLimit::AtMost(10),
    );

    let mut seen = Vec::new();
    while rs.has_next_row() {
        let row = rs.get_next_row().unwrap().unwrap();
        seen.push(text(&row).to_string());
    }
    assert_eq!(seen, ["a", "b", "c"]);
    assert!(rs.get_next_row().unwrap().is_none());
}

#[test]
fn test_bound_smaller_than_partition() {
    let manager = PartitionManager::default();
    let schema = Schema::new(vec![Type::Int4]);
    let values = (0..5).map(|n| vec![Value::Int32(n)]).collect();
    let partition = build_partition(&manager, &schema, values);

    let mut rs = ResultSet::new(schema.clone(), vec![partition], Vec::new(), Vec::new(), RowLimit::AtMost(2));
    let rows: Vec<Row> = rs.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!rs.has_next_row());
    assert_eq!(rs.rows_retrieved(), 2);
    assert_eq!(rs.row_count(), 5);

    // Same input consumed in bulk first
    let values = (0..5).map(|n| vec![Value::Int32(n)]).collect();
    let partition = build_partition(&manager, &schema, values);
    let mut rs = ResultSet::new(schema, vec![partition], Vec::new(), Vec::new(), RowLimit::AtMost(2));
    let taken = rs.get_next_partition().unwrap();
    assert_eq!(rs.rows_retrieved(), 5);
    assert!(!rs.has_next_row());
    assert_eq!(taken.num_rows(), 5);
}

#[test]
fn test_negative_limit_is_unbounded() {
    let manager = PartitionManager::new(PartitionManagerConfig {
        partition_capacity: 64,
        memory_budget: None,
    });
    let schema = Schema::new(vec![Type::Int8]);
    let rows: Vec<Row> = (0..100)
        .map(|n| Row::new(schema.clone(), vec![Value::Int64(n)]).unwrap())
        .collect();
    let partitions = manager.partition_rows(&schema, &rows).unwrap();
    assert!(partitions.len() > 1);

    let mut rs = ResultSet::new(schema, partitions, Vec::new(), Vec::new(), RowLimit::from(-1i64));
    assert_eq!(rs.max_rows(), usize::MAX);
    let pulled: Vec<Row> = rs.rows().collect::<Result<_, _>>().unwrap();
    assert_eq!(pulled, rows);
    assert_eq!(manager.stats().live_partitions, 0);
}

#[test]
fn test_variable_length_rows_across_partitions() {
    let manager = PartitionManager::new(PartitionManagerConfig {
        partition_capacity: 48,
        memory_budget: None,
    });
    let schema = Schema::new(vec![Type::Text, Type::Int4]);
    let rows: Vec<Row> = ["", "a", "bb", "a much longer string value", "ccc"]
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let name = if i == 2 { Value::Null } else { Value::Text(s.to_string()) };
            Row::new(schema.clone(), vec![name, Value::Int32(i as i32)]).unwrap()
        })
        .collect();
    let partitions = manager.partition_rows(&schema, &rows).unwrap();

    let mut rs = ResultSet::new(schema, partitions, Vec::new(), Vec::new(), RowLimit::Unbounded);
    let pulled = rs.get_rows(100).unwrap();
    assert_eq!(pulled, rows);
}

#[test]
fn test_partitions_iterator_hands_off_in_order() {
    let manager = PartitionManager::default();
    let schema = bool_schema();
    let partitions: Vec<Partition> = (0..3)
        .map(|_| build_partition(&manager, &schema, vec![vec![Value::Boolean(true)]; 2]))
        .collect();
    let ids: Vec<_> = partitions.iter().map(Partition::id).collect();

    let mut rs = ResultSet::new(
        schema,
        partitions,
        Vec::new(),
        vec![(0, FallbackObject::new(FallbackValue::Bool(false)))],
        RowLimit::AtMost(4),
    );
    let taken: Vec<Partition> = rs.partitions().collect();

    // Bound of 4 is crossed after the second partition
    assert_eq!(taken.iter().map(Partition::id).collect::<Vec<_>>(), &ids[..2]);
    assert_eq!(rs.rows_retrieved(), 4);
    assert_eq!(rs.pending_fallback_rows(), 1);
    assert!(manager.is_live(ids[2]));

    drop(taken);
    drop(rs);
    assert_eq!(manager.stats().live_partitions, 0);
}

#[test]
fn test_clear_exhausts_and_releases() {
    let manager = PartitionManager::default();
    let schema = bool_schema();
    let mut rs = ResultSet::new(
        schema.clone(),
        vec![build_partition(&manager, &schema, vec![vec![Value::Boolean(true)]; 3])],
        vec![build_partition(&manager, &schema, vec![vec![Value::Null]])],
        vec![(1, FallbackObject::new(FallbackValue::Bool(false)))],
        RowLimit::Unbounded,
    );
    rs.get_next_row().unwrap();

    rs.clear();
    assert!(!rs.has_next_row());
    assert!(!rs.has_next_partition());
    assert_eq!(rs.row_count() - rs.pending_fallback_rows(), 0);
    assert_eq!(manager.stats().live_partitions, 0);
    assert_eq!(manager.stats().invalidated, 2);

    // Clearing again has nothing left to release
    rs.clear();
    assert_eq!(manager.stats().invalidated, 2);
}
