//! Decoding "label: value" lines through a static label table.
//!
//! Each [`Field`] declares a primary label, optional alternate spellings and
//! a [`Setter`] that says how the value text is decoded. A [`LabelTable`]
//! indexes all fields once; primary labels always win over aliases, so an
//! alias can never shadow another field's own name. Labels that match no
//! field are ignored, which keeps parsers working when the kernel adds new
//! lines.

use std::collections::HashMap;

use tracing::trace;

use super::{Policy, primitive, split};
use crate::error::DecodeError;

/// Setter for one labeled field, tagged with how its value is decoded.
pub enum Setter<T> {
    Int(fn(&mut T, i64)),
    Uint(fn(&mut T, u64)),
    HexUint(fn(&mut T, u64)),
    Byte(fn(&mut T, u8)),
    Float(fn(&mut T, f64)),
    Str(fn(&mut T, &str)),
    /// Space separated words.
    StrList(fn(&mut T, Vec<String>)),
    /// Space separated signed decimals.
    IntList(fn(&mut T, Vec<i64>)),
    /// Comma separated 32-bit hex words.
    HexList(fn(&mut T, Vec<u32>)),
    /// "a/b" decimal pair.
    Pair(fn(&mut T, u64, u64)),
    /// "N [kB|KB|MB]", normalized to KB.
    Size(fn(&mut T, u64)),
    /// Exactly four space separated decimals (real, effective, saved, fs ids).
    Quad(fn(&mut T, [u64; 4])),
}

/// One entry of a label table.
pub struct Field<T> {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub setter: Setter<T>,
    pub policy: Policy,
}

impl<T> Field<T> {
    fn new(name: &'static str, setter: Setter<T>) -> Self {
        Self {
            name,
            aliases: &[],
            setter,
            policy: Policy::Fatal,
        }
    }

    pub fn int(name: &'static str, set: fn(&mut T, i64)) -> Self {
        Self::new(name, Setter::Int(set))
    }

    pub fn uint(name: &'static str, set: fn(&mut T, u64)) -> Self {
        Self::new(name, Setter::Uint(set))
    }

    pub fn hex(name: &'static str, set: fn(&mut T, u64)) -> Self {
        Self::new(name, Setter::HexUint(set))
    }

    pub fn float(name: &'static str, set: fn(&mut T, f64)) -> Self {
        Self::new(name, Setter::Float(set))
    }

    pub fn str(name: &'static str, set: fn(&mut T, &str)) -> Self {
        Self::new(name, Setter::Str(set))
    }

    pub fn byte(name: &'static str, set: fn(&mut T, u8)) -> Self {
        Self::new(name, Setter::Byte(set))
    }

    pub fn size(name: &'static str, set: fn(&mut T, u64)) -> Self {
        Self::new(name, Setter::Size(set))
    }

    pub fn str_list(name: &'static str, set: fn(&mut T, Vec<String>)) -> Self {
        Self::new(name, Setter::StrList(set))
    }

    pub fn int_list(name: &'static str, set: fn(&mut T, Vec<i64>)) -> Self {
        Self::new(name, Setter::IntList(set))
    }

    pub fn hex_list(name: &'static str, set: fn(&mut T, Vec<u32>)) -> Self {
        Self::new(name, Setter::HexList(set))
    }

    pub fn pair(name: &'static str, set: fn(&mut T, u64, u64)) -> Self {
        Self::new(name, Setter::Pair(set))
    }

    pub fn quad(name: &'static str, set: fn(&mut T, [u64; 4])) -> Self {
        Self::new(name, Setter::Quad(set))
    }

    /// Additional labels that map to this field when no field is named after
    /// them.
    pub fn alias(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Malformed values decode as zero (or empty) instead of failing.
    pub fn lenient(mut self) -> Self {
        self.policy = Policy::Lenient;
        self
    }

    fn assign(&self, target: &mut T, value: &str) -> Result<(), DecodeError> {
        let name = self.name;
        let policy = self.policy;

        match self.setter {
            Setter::Int(set) => {
                set(target, primitive::apply(primitive::int(name, value), policy)?)
            }
            Setter::Uint(set) => {
                set(target, primitive::apply(primitive::uint(name, value), policy)?)
            }
            Setter::HexUint(set) => set(
                target,
                primitive::apply(primitive::hex_uint(name, value), policy)?,
            ),
            Setter::Byte(set) => {
                set(target, primitive::apply(primitive::byte(name, value), policy)?)
            }
            Setter::Float(set) => set(
                target,
                primitive::apply(primitive::float(name, value), policy)?,
            ),
            Setter::Str(set) => set(target, value),
            Setter::StrList(set) => {
                set(target, value.split_whitespace().map(str::to_string).collect())
            }
            Setter::IntList(set) => {
                let parsed = value
                    .split_whitespace()
                    .map(|token| primitive::int_list_item(name, token))
                    .collect::<Result<Vec<_>, _>>();
                set(target, primitive::apply(parsed, policy)?)
            }
            Setter::HexList(set) => {
                let parsed = value
                    .split(',')
                    .map(|word| primitive::hex_u32(name, word.trim()))
                    .collect::<Result<Vec<_>, _>>();
                set(target, primitive::apply(parsed, policy)?)
            }
            Setter::Pair(set) => {
                let (a, b) = primitive::apply(primitive::pair(name, value), policy)?;
                set(target, a, b)
            }
            Setter::Size(set) => set(
                target,
                primitive::apply(primitive::size_kb(name, value), policy)?,
            ),
            Setter::Quad(set) => set(target, primitive::apply(quad(name, value), policy)?),
        }
        Ok(())
    }
}

fn quad(field: &'static str, value: &str) -> Result<[u64; 4], DecodeError> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(DecodeError::MissingField {
            record: field,
            expected: 4,
            found: tokens.len(),
        });
    }

    let mut ids = [0u64; 4];
    for (slot, token) in ids.iter_mut().zip(tokens) {
        *slot = primitive::uint(field, token)?;
    }
    Ok(ids)
}

/// Label to field lookup for one record type.
pub struct LabelTable<T> {
    record: &'static str,
    fields: Vec<Field<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T> LabelTable<T> {
    /// Indexes `fields` by primary label, then by alias where the alias is
    /// not already taken.
    pub fn new(record: &'static str, fields: Vec<Field<T>>) -> Self {
        let mut index = HashMap::with_capacity(fields.len());

        for (i, field) in fields.iter().enumerate() {
            index.insert(field.name, i);
        }
        for (i, field) in fields.iter().enumerate() {
            for alias in field.aliases {
                index.entry(*alias).or_insert(i);
            }
        }

        Self {
            record,
            fields,
            index,
        }
    }

    /// Finds the field bound to `label`.
    pub fn resolve(&self, label: &str) -> Option<&Field<T>> {
        self.index.get(label).map(|&i| &self.fields[i])
    }

    /// Decodes `value` into the field bound to `label`.
    ///
    /// Returns `Ok(false)` if no field is bound to the label.
    pub fn apply(&self, target: &mut T, label: &str, value: &str) -> Result<bool, DecodeError> {
        match self.resolve(label) {
            Some(field) => {
                field.assign(target, value)?;
                Ok(true)
            }
            None => {
                trace!(record = self.record, label, "ignoring unknown label");
                Ok(false)
            }
        }
    }

    /// Applies every pair in order. Later duplicates overwrite earlier ones.
    pub fn apply_all<'a>(
        &self,
        target: &mut T,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), DecodeError> {
        for (label, value) in pairs {
            self.apply(target, label, value)?;
        }
        Ok(())
    }
}

impl<T: Default> LabelTable<T> {
    /// Decodes a whole file as one label block.
    ///
    /// Lines without a colon are skipped.
    pub fn decode(&self, content: &str) -> Result<T, DecodeError> {
        let mut out = T::default();
        self.apply_all(&mut out, split::label_values(content))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ValueKind;

    #[derive(Debug, Default)]
    struct Sample {
        active: u64,
        active_anon: u64,
        mask: u64,
        words: Vec<String>,
        groups: Vec<i64>,
        cpus: Vec<u32>,
        queue: (u64, u64),
        ids: [u64; 4],
        cache: u64,
        mode: u8,
    }

    type F = Field<Sample>;

    fn table() -> LabelTable<Sample> {
        LabelTable::new(
            "sample",
            vec![
                F::size("Active", |s, v| s.active = v).lenient(),
                F::size("ActiveAnon", |s, v| s.active_anon = v)
                    .alias(&["Active(anon)", "Active"])
                    .lenient(),
                F::hex("SigBlk", |s, v| s.mask = v),
                F::str_list("flags", |s, v| s.words = v),
                F::int_list("Groups", |s, v| s.groups = v),
                F::hex_list("Cpus_allowed", |s, v| s.cpus = v),
                F::pair("SigQ", |s, a, b| s.queue = (a, b)),
                F::quad("Uid", |s, v| s.ids = v),
                F::size("cache size", |s, v| s.cache = v),
                F::byte("Seccomp", |s, v| s.mode = v),
            ],
        )
    }

    #[test]
    fn test_alias_resolution() {
        let table = table();
        let sample = table.decode("Active(anon): 100 kB\nActive: 7 kB\n").unwrap();
        assert_eq!(sample.active_anon, 100);
        assert_eq!(sample.active, 7);
        assert_eq!(table.resolve("Active").map(|f| f.name), Some("Active"));
        assert_eq!(table.resolve("Active(anon)").map(|f| f.name), Some("ActiveAnon"));
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let table = table();
        let mut sample = Sample::default();
        assert!(!table.apply(&mut sample, "Brand New Field", "5").unwrap());
        let sample = table.decode("Brand New Field: 5\nnot a pair\n").unwrap();
        assert_eq!(sample.active, 0);
    }

    #[test]
    fn test_last_write_wins() {
        let sample = table().decode("Active: 1 kB\nActive: 2 kB\n").unwrap();
        assert_eq!(sample.active, 2);
    }

    #[test]
    fn test_compound_values() {
        let content = "\
flags\t\t: fpu vme de
Groups:\t4 24 -1
Cpus_allowed:\tff,ffffffff
SigQ:\t0/63432
Uid:\t1000\t1000\t1000\t1000
SigBlk:\t0000000000010000
cache size\t: 8 MB
Seccomp:\t2
";
        let sample = table().decode(content).unwrap();
        assert_eq!(sample.words, vec!["fpu", "vme", "de"]);
        assert_eq!(sample.groups, vec![4, 24, -1]);
        assert_eq!(sample.cpus, vec![0xff, 0xffff_ffff]);
        assert_eq!(sample.queue, (0, 63432));
        assert_eq!(sample.ids, [1000; 4]);
        assert_eq!(sample.mask, 0x10000);
        assert_eq!(sample.cache, 8192);
        assert_eq!(sample.mode, 2);
    }

    #[test]
    fn test_fatal_and_lenient_fields() {
        let table = table();
        let sample = table.decode("Active: garbage\n").unwrap();
        assert_eq!(sample.active, 0);

        let err = table.decode("SigBlk: xyz\n").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidValue {
                field: "SigBlk",
                kind: ValueKind::HexUint,
                token: "xyz".to_string(),
            }
        );

        assert!(matches!(
            table.decode("SigQ: 12\n"),
            Err(DecodeError::MalformedPair { field: "SigQ", .. })
        ));
        assert!(matches!(
            table.decode("SigQ: 1/x\n"),
            Err(DecodeError::InvalidValue { kind: ValueKind::Pair, .. })
        ));
        assert!(matches!(
            table.decode("Groups: 4 x\n"),
            Err(DecodeError::InvalidValue { field: "Groups", kind: ValueKind::IntList, .. })
        ));
        assert!(matches!(
            table.decode("Uid: 1 2\n"),
            Err(DecodeError::MissingField { expected: 4, found: 2, .. })
        ));
    }
}
