//! Decoding whitespace separated records by column index.
//!
//! A [`Layout`] is an ordered list of [`Column`]s. Each column binds a zero
//! based token index to a setter, a value kind and a [`Policy`]. Layouts are
//! built once (see the `LazyLock` statics in `procfs`) and then applied to
//! every record of the file.

use super::{Policy, primitive};
use crate::error::DecodeError;

/// Setter for one column, tagged with how the token is decoded.
pub enum Slot<T> {
    Int(fn(&mut T, i64)),
    Uint(fn(&mut T, u64)),
    Float(fn(&mut T, f64)),
    Str(fn(&mut T, &str)),
}

/// One entry of a positional layout.
pub struct Column<T> {
    pub index: usize,
    pub name: &'static str,
    pub slot: Slot<T>,
    pub policy: Policy,
}

impl<T> Column<T> {
    fn new(index: usize, name: &'static str, slot: Slot<T>) -> Self {
        Self {
            index,
            name,
            slot,
            policy: Policy::Fatal,
        }
    }

    pub fn int(index: usize, name: &'static str, set: fn(&mut T, i64)) -> Self {
        Self::new(index, name, Slot::Int(set))
    }

    pub fn uint(index: usize, name: &'static str, set: fn(&mut T, u64)) -> Self {
        Self::new(index, name, Slot::Uint(set))
    }

    pub fn float(index: usize, name: &'static str, set: fn(&mut T, f64)) -> Self {
        Self::new(index, name, Slot::Float(set))
    }

    pub fn str(index: usize, name: &'static str, set: fn(&mut T, &str)) -> Self {
        Self::new(index, name, Slot::Str(set))
    }

    /// Malformed tokens in this column decode as zero instead of failing.
    pub fn lenient(mut self) -> Self {
        self.policy = Policy::Lenient;
        self
    }

    fn assign(&self, target: &mut T, token: &str) -> Result<(), DecodeError> {
        match self.slot {
            Slot::Int(set) => set(
                target,
                primitive::apply(primitive::int(self.name, token), self.policy)?,
            ),
            Slot::Uint(set) => set(
                target,
                primitive::apply(primitive::uint(self.name, token), self.policy)?,
            ),
            Slot::Float(set) => set(
                target,
                primitive::apply(primitive::float(self.name, token), self.policy)?,
            ),
            Slot::Str(set) => set(target, token),
        }
        Ok(())
    }
}

/// Fixed column schema of one record type.
pub struct Layout<T> {
    record: &'static str,
    required: usize,
    columns: Vec<Column<T>>,
}

impl<T: Default> Layout<T> {
    /// Creates a layout.
    ///
    /// # Arguments
    /// * `record` - Record name used in error messages
    /// * `required` - Minimum number of tokens; shorter records are rejected
    /// * `columns` - Column bindings. Columns at or beyond `required` are
    ///   optional and only assigned when the record is long enough.
    pub fn new(record: &'static str, required: usize, columns: Vec<Column<T>>) -> Self {
        Self {
            record,
            required,
            columns,
        }
    }

    /// Decodes pre-split tokens. Tokens past the last column are ignored.
    pub fn decode(&self, tokens: &[&str]) -> Result<T, DecodeError> {
        if tokens.len() < self.required {
            return Err(DecodeError::MissingField {
                record: self.record,
                expected: self.required,
                found: tokens.len(),
            });
        }

        let mut out = T::default();
        for column in &self.columns {
            if let Some(token) = tokens.get(column.index) {
                column.assign(&mut out, token)?;
            }
        }
        Ok(out)
    }

    /// Splits `line` on whitespace runs and decodes the tokens.
    pub fn decode_line(&self, line: &str) -> Result<T, DecodeError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.decode(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ValueKind;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        name: String,
        count: u64,
        delta: i64,
        ratio: f64,
        extra: u64,
    }

    type C = Column<Sample>;

    fn layout() -> Layout<Sample> {
        Layout::new(
            "sample",
            4,
            vec![
                C::str(0, "name", |s, v| s.name = v.to_string()),
                C::uint(1, "count", |s, v| s.count = v),
                C::int(2, "delta", |s, v| s.delta = v).lenient(),
                C::float(3, "ratio", |s, v| s.ratio = v),
                C::uint(4, "extra", |s, v| s.extra = v),
            ],
        )
    }

    #[test]
    fn test_decode_line() {
        let sample = layout().decode_line("  disk  12\t-3   0.5  9").unwrap();
        assert_eq!(sample.name, "disk");
        assert_eq!(sample.count, 12);
        assert_eq!(sample.delta, -3);
        assert!((sample.ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(sample.extra, 9);
    }

    #[test]
    fn test_optional_and_trailing_columns() {
        let sample = layout().decode_line("disk 1 2 3").unwrap();
        assert_eq!(sample.extra, 0);

        let sample = layout().decode_line("disk 1 2 3 4 5 6 7").unwrap();
        assert_eq!(sample.extra, 4);
    }

    #[test]
    fn test_short_record() {
        let err = layout().decode_line("disk 1").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                record: "sample",
                expected: 4,
                found: 2,
            }
        );
    }

    #[test]
    fn test_fatal_and_lenient_columns() {
        let sample = layout().decode_line("disk 1 oops 3").unwrap();
        assert_eq!(sample.delta, 0);

        let err = layout().decode_line("disk many 2 3").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidValue {
                field: "count",
                kind: ValueKind::Uint,
                token: "many".to_string(),
            }
        );
    }
}
