//! Packed per-row words and the dimension decoder.
//!
//! A batch may carry one fixed-width packed word per row that inlines the values of
//! low-cardinality ("dimension") fields. The [`FieldLayout`] records where each
//! field's bits live inside the word, and a [`PackedDecoder`] turns those bits back
//! into values, so reads of such fields never touch column storage.
//!
//! The packed word is an alternative access path to values that are also stored
//! in the batch's columns: for every row, decoding a field from the word and
//! reading it from its column must produce the same value.

use ahash::AHashMap;
use strata_bits::bitpacking::{BitArray, MAX_FIELD_BITS};
use strata_common::{Result, error::Error, verify_arg};
use strata_format::Kind;
use strata_sequence::value::{OwnedValue, Value};

/// Location of a field's bits within the packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSlot {
    offset: u32,
    width: u32,
}

impl BitSlot {
    /// Creates a slot of `width` bits starting at bit `offset` of the word.
    ///
    /// # Errors
    ///
    /// Returns an error if the width is zero or the slot does not fit into a
    /// 64-bit word.
    pub fn new(offset: u32, width: u32) -> Result<BitSlot> {
        verify_arg!(width, width > 0);
        verify_arg!(
            offset,
            offset.checked_add(width).is_some_and(|end| end as usize <= MAX_FIELD_BITS)
        );
        Ok(BitSlot { offset, width })
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// First bit past the slot.
    pub fn end(&self) -> u32 {
        self.offset + self.width
    }

    /// Returns the largest value the slot can hold.
    pub fn max_value(&self) -> u64 {
        u64::MAX >> (64 - self.width)
    }

    /// Extracts the slot's bits from `word`, zero-extended.
    #[inline]
    pub fn extract(&self, word: u64) -> u64 {
        (word >> self.offset) & self.max_value()
    }

    /// Places `bits` into the slot's position within a word.
    #[inline]
    pub fn place(&self, bits: u64) -> u64 {
        (bits & self.max_value()) << self.offset
    }
}

/// Field name to bit slot mapping for a batch's packed word.
#[derive(Debug, Clone, Default)]
pub struct FieldLayout {
    slots: AHashMap<String, BitSlot>,
}

impl FieldLayout {
    pub fn new() -> FieldLayout {
        FieldLayout::default()
    }

    /// Appends a slot of `width` bits right after the last slot in the word.
    pub fn push(&mut self, field: impl Into<String>, width: u32) -> Result<BitSlot> {
        let slot = BitSlot::new(self.word_bits(), width)?;
        self.insert(field, slot)?;
        Ok(slot)
    }

    /// Adds a slot at an explicit position.
    ///
    /// # Errors
    ///
    /// Returns an error if the field already has a slot or the slot overlaps
    /// another field's slot.
    pub fn insert(&mut self, field: impl Into<String>, slot: BitSlot) -> Result<()> {
        let field = field.into();
        if self.slots.contains_key(&field) {
            return Err(Error::invalid_arg(
                "field",
                format!("field {field} already has a slot"),
            ));
        }
        if let Some((other, _)) = self
            .slots
            .iter()
            .find(|(_, s)| slot.offset < s.end() && s.offset < slot.end())
        {
            return Err(Error::invalid_arg(
                "slot",
                format!("slot of {field} overlaps slot of {other}"),
            ));
        }
        self.slots.insert(field, slot);
        Ok(())
    }

    #[inline]
    pub fn get(&self, field: &str) -> Option<BitSlot> {
        self.slots.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.slots.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Number of bits covered by the layout (the end of the highest slot).
    pub fn word_bits(&self) -> u32 {
        self.slots.values().map(BitSlot::end).max().unwrap_or(0)
    }
}

/// Mapping between a packed field's bits and its values.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSpace {
    /// Boolean and integer-valued kinds: the value is `base + bits`.
    /// For `Boolean`, any non-zero bits decode to `true`.
    Direct { kind: Kind, base: i64 },
    /// Any scalar kind: the bits are an ordinal into a table of values.
    Ordinal { kind: Kind, values: Vec<OwnedValue> },
}

impl ValueSpace {
    /// Creates a frame-of-reference space for a boolean or integer-valued kind.
    pub fn direct(kind: Kind, base: i64) -> Result<ValueSpace> {
        if kind != Kind::Boolean && !kind.is_integer() {
            return Err(Error::invalid_arg(
                "kind",
                format!("{kind} cannot be stored directly in a packed word"),
            ));
        }
        Ok(ValueSpace::Direct { kind, base })
    }

    /// Creates an ordinal space over `values`, all of which must be of `kind`.
    pub fn ordinal(kind: Kind, values: Vec<OwnedValue>) -> Result<ValueSpace> {
        verify_arg!(kind, kind.is_primitive());
        if let Some(value) = values.iter().find(|v| v.kind() != kind) {
            return Err(Error::type_mismatch(kind.name(), value.kind().name()));
        }
        Ok(ValueSpace::Ordinal { kind, values })
    }

    pub fn kind(&self) -> Kind {
        match self {
            ValueSpace::Direct { kind, .. } | ValueSpace::Ordinal { kind, .. } => *kind,
        }
    }

    /// Decodes slot bits into a value, or `None` if the bits do not map to a value
    /// of the space (the caller then falls back to column storage).
    pub fn decode(&self, bits: u64) -> Option<Value<'_>> {
        match self {
            ValueSpace::Direct { kind, base } => {
                let v = *base as i128 + bits as i128;
                match kind {
                    Kind::Boolean => Some(Value::Bool(bits != 0)),
                    Kind::Int8 => i8::try_from(v).ok().map(Value::Int8),
                    Kind::Int16 => i16::try_from(v).ok().map(Value::Int16),
                    Kind::Int32 => i32::try_from(v).ok().map(Value::Int32),
                    Kind::Int64 => i64::try_from(v).ok().map(Value::Int64),
                    Kind::Timestamp => i64::try_from(v).ok().map(Value::Timestamp),
                    Kind::Int128 => Some(Value::Int128(v)),
                    _ => None,
                }
            }
            ValueSpace::Ordinal { values, .. } => usize::try_from(bits)
                .ok()
                .and_then(|i| values.get(i))
                .map(OwnedValue::as_value),
        }
    }

    /// Returns the bits that [`decode`](Self::decode) maps back to `value`, or
    /// `None` if the value is not part of the space.
    pub fn encode(&self, value: Value<'_>) -> Option<u64> {
        if value.kind() != self.kind() {
            return None;
        }
        match self {
            ValueSpace::Direct { base, .. } => {
                let v = match value {
                    Value::Bool(v) => return Some(v as u64),
                    Value::Int8(v) => v as i128,
                    Value::Int16(v) => v as i128,
                    Value::Int32(v) => v as i128,
                    Value::Int64(v) | Value::Timestamp(v) => v as i128,
                    Value::Int128(v) => v,
                    _ => return None,
                };
                u64::try_from(v.checked_sub(*base as i128)?).ok()
            }
            ValueSpace::Ordinal { values, .. } => values
                .iter()
                .position(|v| v.as_value() == value)
                .map(|i| i as u64),
        }
    }
}

/// Decodes field values from a row's packed word.
///
/// Implementations must be total and pure: for a given field, layout and word,
/// `decode` always returns the same result and never fails. `None` means the
/// field is not eligible for packed decoding.
pub trait PackedDecoder: Send + Sync + 'static {
    fn decode(&self, field: &str, layout: &FieldLayout, word: u64) -> Option<Value<'_>>;

    /// Kind of the values decoded for `field`, or `None` if the field is not packed.
    fn kind(&self, field: &str) -> Option<Kind>;
}

/// [`PackedDecoder`] backed by a [`ValueSpace`] per dimension field.
#[derive(Debug, Clone, Default)]
pub struct DimensionDecoder {
    spaces: AHashMap<String, ValueSpace>,
}

impl DimensionDecoder {
    pub fn new() -> DimensionDecoder {
        DimensionDecoder::default()
    }

    pub fn with_space(mut self, field: impl Into<String>, space: ValueSpace) -> Self {
        self.insert(field, space);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, space: ValueSpace) {
        self.spaces.insert(field.into(), space);
    }

    pub fn space(&self, field: &str) -> Option<&ValueSpace> {
        self.spaces.get(field)
    }
}

impl PackedDecoder for DimensionDecoder {
    #[inline]
    fn decode(&self, field: &str, layout: &FieldLayout, word: u64) -> Option<Value<'_>> {
        let slot = layout.get(field)?;
        self.spaces.get(field)?.decode(slot.extract(word))
    }

    fn kind(&self, field: &str) -> Option<Kind> {
        self.spaces.get(field).map(ValueSpace::kind)
    }
}

/// The packed words of a batch: one `word_bits`-wide word per row, stored
/// back to back in a bit array, with the layout and decoder to read them.
pub struct PackedRows {
    store: BitArray,
    word_bits: usize,
    layout: FieldLayout,
    decoder: Box<dyn PackedDecoder>,
}

impl PackedRows {
    /// # Errors
    ///
    /// Returns an error if `word_bits` exceeds 64 or the layout does not fit into
    /// the word.
    pub fn try_new(
        store: BitArray,
        word_bits: usize,
        layout: FieldLayout,
        decoder: impl PackedDecoder,
    ) -> Result<PackedRows> {
        verify_arg!(word_bits, word_bits <= MAX_FIELD_BITS);
        verify_arg!(layout, layout.word_bits() as usize <= word_bits);
        Ok(PackedRows {
            store,
            word_bits,
            layout,
            decoder: Box::new(decoder),
        })
    }

    pub fn word_bits(&self) -> usize {
        self.word_bits
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    pub fn store(&self) -> &BitArray {
        &self.store
    }

    /// Number of complete words held by the store.
    pub fn capacity(&self) -> usize {
        self.store.len().checked_div(self.word_bits).unwrap_or(usize::MAX)
    }

    /// Reads the packed word of `row`.
    #[inline]
    pub fn word(&self, row: usize) -> Result<u64> {
        self.store.read_bits(row * self.word_bits, self.word_bits)
    }

    /// Kind of the values decoded for `field`, or `None` if the field is not packed.
    pub fn kind(&self, field: &str) -> Option<Kind> {
        self.decoder.kind(field)
    }

    /// Decodes `field` from a packed word, or `None` if the field is not packed.
    #[inline]
    pub fn decode(&self, field: &str, word: u64) -> Option<Value<'_>> {
        self.decoder.decode(field, &self.layout, word)
    }
}

impl std::fmt::Debug for PackedRows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedRows")
            .field("word_bits", &self.word_bits)
            .field("store_bits", &self.store.len())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use strata_bits::bitpacking::BitArrayBuilder;

    use super::*;

    #[test]
    fn test_bit_slot() {
        let slot = BitSlot::new(4, 3).unwrap();
        assert_eq!(slot.end(), 7);
        assert_eq!(slot.max_value(), 7);
        assert_eq!(slot.extract(0b101_0000), 0b101);
        assert_eq!(slot.place(0b110), 0b110_0000);
        assert_eq!(BitSlot::new(0, 64).unwrap().max_value(), u64::MAX);
        assert!(BitSlot::new(0, 0).is_err());
        assert!(BitSlot::new(60, 5).is_err());
    }

    #[test]
    fn test_layout_push_and_overlap() {
        let mut layout = FieldLayout::new();
        assert_eq!(layout.push("a", 3).unwrap(), BitSlot::new(0, 3).unwrap());
        assert_eq!(layout.push("b", 5).unwrap(), BitSlot::new(3, 5).unwrap());
        assert_eq!(layout.word_bits(), 8);
        assert!(layout.push("a", 1).is_err());
        assert!(layout.insert("c", BitSlot::new(6, 4).unwrap()).is_err());
        layout.insert("c", BitSlot::new(8, 4).unwrap()).unwrap();
        assert_eq!(layout.len(), 3);
        assert!(layout.contains("c"));
        assert!(layout.get("d").is_none());
    }

    #[test]
    fn test_direct_space() {
        let space = ValueSpace::direct(Kind::Int16, -10).unwrap();
        assert_eq!(space.decode(0), Some(Value::Int16(-10)));
        assert_eq!(space.decode(25), Some(Value::Int16(15)));
        assert_eq!(space.encode(Value::Int16(15)), Some(25));
        assert_eq!(space.encode(Value::Int16(-11)), None);
        assert_eq!(space.encode(Value::Int32(15)), None);
        assert_eq!(space.decode(u64::MAX), None);

        let flags = ValueSpace::direct(Kind::Boolean, 0).unwrap();
        assert_eq!(flags.decode(1), Some(Value::Bool(true)));
        assert_eq!(flags.encode(Value::Bool(false)), Some(0));

        assert!(ValueSpace::direct(Kind::String, 0).is_err());
    }

    #[test]
    fn test_ordinal_space() {
        let space = ValueSpace::ordinal(
            Kind::String,
            vec!["CN".into(), "US".into(), "FR".into()],
        )
        .unwrap();
        assert_eq!(space.decode(1), Some(Value::String("US")));
        assert_eq!(space.decode(3), None);
        assert_eq!(space.encode(Value::String("FR")), Some(2));
        assert_eq!(space.encode(Value::String("DE")), None);

        let err = ValueSpace::ordinal(Kind::String, vec![OwnedValue::Int8(1)]).unwrap_err();
        assert!(err.to_string().contains("type mismatch"));
    }

    #[test]
    fn test_dimension_decoder() {
        let mut layout = FieldLayout::new();
        let level = layout.push("level", 4).unwrap();
        let country = layout.push("country", 2).unwrap();
        let decoder = DimensionDecoder::new()
            .with_space("level", ValueSpace::direct(Kind::Int32, 1).unwrap())
            .with_space(
                "country",
                ValueSpace::ordinal(Kind::String, vec!["CN".into(), "US".into()]).unwrap(),
            );

        let word = level.place(6) | country.place(1);
        assert_eq!(decoder.decode("level", &layout, word), Some(Value::Int32(7)));
        assert_eq!(
            decoder.decode("country", &layout, word),
            Some(Value::String("US"))
        );
        assert_eq!(decoder.decode("missing", &layout, word), None);
        assert_eq!(decoder.kind("country"), Some(Kind::String));
        assert_eq!(decoder.kind("missing"), None);
    }

    #[test]
    fn test_packed_rows_words() {
        let mut layout = FieldLayout::new();
        layout.push("x", 5).unwrap();
        let mut store = BitArrayBuilder::new();
        for v in [3u64, 17, 31] {
            store.push_bits(v, 6);
        }
        let packed = PackedRows::try_new(store.build(), 6, layout, DimensionDecoder::new()).unwrap();
        assert_eq!(packed.capacity(), 3);
        assert_eq!(packed.word(1).unwrap(), 17);
        assert_eq!(packed.word(2).unwrap(), 31);
        assert!(packed.word(3).is_err());

        let mut wide = FieldLayout::new();
        wide.push("x", 9).unwrap();
        assert!(PackedRows::try_new(BitArray::new(), 8, wide, DimensionDecoder::new()).is_err());
    }
}
