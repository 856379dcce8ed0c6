//! Randomized test batches.
//!
//! Every batch built here has the same fields:
//!
//! | field     | kind       | packed                    |
//! |-----------|------------|---------------------------|
//! | `id`      | BIGINT     | no                        |
//! | `level`   | INTEGER    | direct, base -5, 5 bits, nullable |
//! | `flag`    | BOOLEAN    | direct, 1 bit             |
//! | `country` | VARCHAR    | ordinal, 2 bits           |
//! | `ts`      | TIMESTAMP  | direct, base [`TS_BASE`]  |
//! | `delta`   | INT128     | direct, base -100, 8 bits |
//! | `score`   | DOUBLE     | no, nullable              |
//! | `name`    | VARCHAR    | no                        |
//! | `payload` | VARBINARY  | no                        |
//! | `tags`    | list<VARCHAR> | no, nullable           |
//! | `attrs`   | map<VARCHAR, INTEGER> | no             |
//!
//! Null `level` slots are stored in the packed word as zero bits, which decode
//! to -5; reads must still report them as null.

use rand::{Rng, SeedableRng, rngs::StdRng};
use strata_bits::bitpacking::BitArrayBuilder;
use strata_format::Kind;
use strata_sequence::{builder::DataNodeBuilder, value::Value};

use crate::{
    batch::Batch,
    packed::{DimensionDecoder, FieldLayout, PackedRows, ValueSpace},
};

pub const COUNTRIES: [&str; 4] = ["CN", "US", "FR", "DE"];

pub const TS_BASE: i64 = 1_700_000_000_000;

pub const PACKED_FIELDS: [&str; 5] = ["level", "flag", "country", "ts", "delta"];

#[derive(Debug, Clone)]
pub struct Record {
    pub id: i64,
    pub level: Option<i32>,
    pub flag: bool,
    pub country: &'static str,
    pub ts: i64,
    pub delta: i128,
    pub score: Option<f64>,
    pub name: String,
    pub payload: Vec<u8>,
    pub tags: Option<Vec<String>>,
    pub attrs: Vec<(String, i32)>,
}

pub fn generate_records(count: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| Record {
            id: i as i64 * 10 + 1,
            level: rng.random_bool(0.85).then(|| rng.random_range(-5..=26)),
            flag: rng.random_bool(0.5),
            country: COUNTRIES[rng.random_range(0..COUNTRIES.len())],
            ts: TS_BASE + rng.random_range(0..1024),
            delta: rng.random_range(-100..=155),
            score: rng.random_bool(0.8).then(|| rng.random_range(0.0..100.0)),
            name: format!("name_{i}"),
            payload: (0..rng.random_range(0..6)).map(|_| rng.random()).collect(),
            tags: rng.random_bool(0.9).then(|| {
                (0..rng.random_range(0..4))
                    .map(|t| format!("tag_{i}_{t}"))
                    .collect()
            }),
            attrs: (0..rng.random_range(0..3))
                .map(|a| (format!("k{a}"), rng.random_range(0..1000)))
                .collect(),
        })
        .collect()
}

/// Layout, decoder and word width used for the packed dimension fields.
pub fn dimension_schema() -> (FieldLayout, DimensionDecoder) {
    let mut layout = FieldLayout::new();
    layout.push("level", 5).unwrap();
    layout.push("flag", 1).unwrap();
    layout.push("country", 2).unwrap();
    layout.push("ts", 10).unwrap();
    layout.push("delta", 8).unwrap();

    let decoder = DimensionDecoder::new()
        .with_space("level", ValueSpace::direct(Kind::Int32, -5).unwrap())
        .with_space("flag", ValueSpace::direct(Kind::Boolean, 0).unwrap())
        .with_space(
            "country",
            ValueSpace::ordinal(Kind::String, COUNTRIES.iter().map(|&c| c.into()).collect())
                .unwrap(),
        )
        .with_space("ts", ValueSpace::direct(Kind::Timestamp, TS_BASE).unwrap())
        .with_space("delta", ValueSpace::direct(Kind::Int128, -100).unwrap());
    (layout, decoder)
}

pub fn pack_records(records: &[Record]) -> PackedRows {
    let (layout, decoder) = dimension_schema();
    let word_bits = layout.word_bits() as usize;
    let mut store = BitArrayBuilder::with_capacity(records.len() * word_bits);
    for record in records {
        let values = [
            Value::Int32(record.level.unwrap_or(-5)),
            Value::Bool(record.flag),
            Value::String(record.country),
            Value::Timestamp(record.ts),
            Value::Int128(record.delta),
        ];
        let word = PACKED_FIELDS
            .iter()
            .zip(values)
            .fold(0u64, |word, (&field, value)| {
                let slot = layout.get(field).unwrap();
                let bits = decoder.space(field).unwrap().encode(value).unwrap();
                word | slot.place(bits)
            });
        store.push_bits(word, word_bits);
    }
    PackedRows::try_new(store.build(), word_bits, layout, decoder).unwrap()
}

pub fn build_batch(records: &[Record], packed: bool) -> Batch {
    let mut id = DataNodeBuilder::new(Kind::Int64).unwrap();
    let mut level = DataNodeBuilder::new(Kind::Int32).unwrap();
    let mut flag = DataNodeBuilder::new(Kind::Boolean).unwrap();
    let mut country = DataNodeBuilder::new(Kind::String).unwrap();
    let mut ts = DataNodeBuilder::new(Kind::Timestamp).unwrap();
    let mut delta = DataNodeBuilder::new(Kind::Int128).unwrap();
    let mut score = DataNodeBuilder::new(Kind::Float64).unwrap();
    let mut name = DataNodeBuilder::new(Kind::String).unwrap();
    let mut payload = DataNodeBuilder::new(Kind::Binary).unwrap();
    let mut tags = DataNodeBuilder::list(DataNodeBuilder::new(Kind::String).unwrap());
    let mut attrs = DataNodeBuilder::map(
        DataNodeBuilder::new(Kind::String).unwrap(),
        DataNodeBuilder::new(Kind::Int32).unwrap(),
    );

    for r in records {
        id.push(Value::Int64(r.id)).unwrap();
        level.push_opt(r.level.map(Value::Int32)).unwrap();
        flag.push(Value::Bool(r.flag)).unwrap();
        country.push(Value::String(r.country)).unwrap();
        ts.push(Value::Timestamp(r.ts)).unwrap();
        delta.push(Value::Int128(r.delta)).unwrap();
        score.push_opt(r.score.map(Value::Float64)).unwrap();
        name.push(Value::String(&r.name)).unwrap();
        payload.push(Value::Binary(&r.payload)).unwrap();
        match &r.tags {
            Some(list) => {
                for tag in list {
                    tags.item_mut().unwrap().push(Value::String(tag)).unwrap();
                }
                tags.close_entry().unwrap();
            }
            None => tags.push_null(),
        }
        for (key, value) in &r.attrs {
            attrs.child_mut(0).unwrap().push(Value::String(key)).unwrap();
            attrs.child_mut(1).unwrap().push(Value::Int32(*value)).unwrap();
        }
        attrs.close_entry().unwrap();
    }

    let mut builder = Batch::builder(records.len())
        .column("id", id.build().unwrap())
        .column("level", level.build().unwrap())
        .column("flag", flag.build().unwrap())
        .column("country", country.build().unwrap())
        .column("ts", ts.build().unwrap())
        .column("delta", delta.build().unwrap())
        .column("score", score.build().unwrap())
        .column("name", name.build().unwrap())
        .column("payload", payload.build().unwrap())
        .column("tags", tags.build().unwrap())
        .column("attrs", attrs.build().unwrap());
    if packed {
        builder = builder.packed(pack_records(records));
    }
    builder.build().unwrap()
}
