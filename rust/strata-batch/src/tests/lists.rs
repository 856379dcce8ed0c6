use strata_common::{Result, error::ErrorKind};
use strata_format::Kind;
use strata_sequence::{builder::DataNodeBuilder, value::Value};

use crate::{
    batch::Batch,
    tests::fixtures::{build_batch, generate_records},
};

/// A batch with a single `list<INTEGER>` field `xs` whose rows are `lists`.
fn int_lists(lists: &[Option<&[i32]>]) -> Batch {
    let mut xs = DataNodeBuilder::list(DataNodeBuilder::new(Kind::Int32).unwrap());
    for list in lists {
        match list {
            Some(items) => {
                for &item in *items {
                    xs.item_mut().unwrap().push(Value::Int32(item)).unwrap();
                }
                xs.close_entry().unwrap();
            }
            None => xs.push_null(),
        }
    }
    Batch::builder(lists.len())
        .column("xs", xs.build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_list_window_reads() {
    let batch = int_lists(&[Some(&[0, 0]), Some(&[10, 11, 12]), Some(&[13, 14, 15]), Some(&[16])]);
    let mut accessor = batch.accessor();
    accessor.seek(2).unwrap();

    let list = accessor.read_list("xs").unwrap();
    assert_eq!((list.offset(), list.len()), (5, 3));
    assert_eq!(list.item_kind(), Kind::Int32);
    assert_eq!(list.read::<i32>(0).unwrap(), 13);
    assert_eq!(list.read::<i32>(2).unwrap(), 15);

    // Element 3 exists in the item column but belongs to the next row.
    let err = list.read::<i32>(3).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::OutOfRange { index: 3, bound: 3, .. }));
}

#[test]
fn test_null_and_empty_lists() {
    let batch = int_lists(&[None, Some(&[]), Some(&[1])]);
    let row = batch.row(0).unwrap();
    assert!(row.is_null("xs").unwrap());
    assert!(row.read_list("xs").unwrap().is_empty());

    let row = batch.row(1).unwrap();
    assert!(!row.is_null("xs").unwrap());
    assert!(row.read_list("xs").unwrap().is_empty());

    let list = batch.row(2).unwrap().read_list("xs").unwrap();
    assert_eq!(list.iter::<i32>().collect::<Result<Vec<_>>>().unwrap(), vec![1]);
}

#[test]
fn test_list_of_lists() {
    let mut outer = DataNodeBuilder::list(DataNodeBuilder::list(
        DataNodeBuilder::new(Kind::Int64).unwrap(),
    ));
    for row in [vec![vec![1i64, 2], vec![3]], vec![vec![], vec![4, 5, 6]]] {
        for inner in row {
            let inner_builder = outer.item_mut().unwrap();
            for v in inner {
                inner_builder.item_mut().unwrap().push(Value::Int64(v)).unwrap();
            }
            inner_builder.close_entry().unwrap();
        }
        outer.close_entry().unwrap();
    }
    let batch = Batch::builder(2)
        .column("nested", outer.build().unwrap())
        .build()
        .unwrap();

    let second = batch.row(1).unwrap().read_list("nested").unwrap();
    assert_eq!(second.len(), 2);
    assert!(second.read_list(0).unwrap().is_empty());
    let inner = second.read_list(1).unwrap();
    assert_eq!(
        inner.iter::<i64>().collect::<Result<Vec<_>>>().unwrap(),
        vec![4, 5, 6]
    );
    assert!(second.read_list(2).unwrap_err().is_out_of_range());
}

#[test]
fn test_string_lists_match_records() {
    let records = generate_records(300, 11);
    let batch = build_batch(&records, false);
    let mut accessor = batch.accessor();
    for (row_id, record) in records.iter().enumerate() {
        accessor.seek(row_id).unwrap();
        let list = accessor.read_list("tags").unwrap();
        let tags = list.iter::<&str>().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(accessor.is_null("tags").unwrap(), record.tags.is_none());
        assert_eq!(tags, record.tags.clone().unwrap_or_default());
        for i in 0..list.len() {
            assert!(!list.is_null(i).unwrap());
        }
    }
}

#[test]
fn test_read_list_on_non_list() {
    let batch = build_batch(&generate_records(2, 12), true);
    let row = batch.row(0).unwrap();
    for field in ["id", "country", "attrs"] {
        let err = row.read_list(field).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaError { .. }), "{field}: {err}");
    }
}
