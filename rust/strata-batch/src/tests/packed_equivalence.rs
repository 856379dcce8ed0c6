use crate::{
    Value,
    tests::fixtures::{PACKED_FIELDS, build_batch, generate_records},
};

#[test]
fn test_packed_and_column_reads_agree() {
    let records = generate_records(2000, 42);
    let batch = build_batch(&records, true);
    for row_id in 0..batch.rows() {
        let row = batch.row(row_id).unwrap();
        assert_eq!(row.read::<i32>("level").unwrap(), row.read_unpacked::<i32>("level").unwrap());
        assert_eq!(row.read::<bool>("flag").unwrap(), row.read_unpacked::<bool>("flag").unwrap());
        assert_eq!(
            row.read::<&str>("country").unwrap(),
            row.read_unpacked::<&str>("country").unwrap()
        );
        assert_eq!(row.read::<i64>("ts").unwrap(), row.read_unpacked::<i64>("ts").unwrap());
        assert_eq!(
            row.read::<i128>("delta").unwrap(),
            row.read_unpacked::<i128>("delta").unwrap()
        );
    }
}

#[test]
fn test_packed_decoder_matches_column_values() {
    let records = generate_records(500, 43);
    let batch = build_batch(&records, true);
    let packed = batch.packed().unwrap();
    for row_id in 0..batch.rows() {
        let word = packed.word(row_id).unwrap();
        for field in PACKED_FIELDS {
            let column = batch.column(field).unwrap();
            if column.is_null(row_id).unwrap() {
                continue;
            }
            let decoded = packed.decode(field, word);
            assert_eq!(decoded, column.value_at(row_id).unwrap(), "row {row_id}, field {field}");
        }
        assert_eq!(packed.decode("name", word), None);
    }
}

#[test]
fn test_packed_and_plain_batches_read_the_same() {
    let records = generate_records(300, 44);
    let packed = build_batch(&records, true);
    let plain = build_batch(&records, false);
    assert!(plain.packed().is_none());
    assert_eq!(plain.row(0).unwrap().packed_word(), None);

    let (mut a, mut b) = (packed.accessor(), plain.accessor());
    for row_id in 0..records.len() {
        a.seek(row_id).unwrap();
        b.seek(row_id).unwrap();
        for field in packed.field_names() {
            if field == "tags" || field == "attrs" {
                continue;
            }
            assert_eq!(a.value(field).unwrap(), b.value(field).unwrap(), "{field}");
        }
    }
}

#[test]
fn test_field_decoded_without_column_access() {
    let records = generate_records(16, 45);
    let batch = build_batch(&records, true);
    let row = batch.row(5).unwrap();
    let word = row.packed_word().unwrap();
    let slot = batch.packed().unwrap().layout().get("country").unwrap();
    let ordinal = slot.extract(word) as usize;
    assert_eq!(
        row.value("country").unwrap(),
        Some(Value::String(crate::tests::fixtures::COUNTRIES[ordinal]))
    );
    assert_eq!(row.read::<&str>("country").unwrap(), records[5].country);
}

#[test]
fn test_null_packed_slots_read_from_column() {
    let records = generate_records(400, 46);
    let batch = build_batch(&records, true);
    let packed = batch.packed().unwrap();
    let nulls = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.level.is_none())
        .map(|(row_id, _)| row_id)
        .collect::<Vec<_>>();
    assert!(!nulls.is_empty());

    for row_id in nulls {
        let row = batch.row(row_id).unwrap();
        // The word still holds bits for the slot; they decode to the space's base.
        assert_eq!(
            packed.decode("level", row.packed_word().unwrap()),
            Some(Value::Int32(-5))
        );
        assert!(row.is_null("level").unwrap());
        assert_eq!(row.value("level").unwrap(), None);
        assert_eq!(row.read::<i32>("level").unwrap(), 0);
        assert_eq!(row.read_unpacked::<i32>("level").unwrap(), 0);
    }
}
