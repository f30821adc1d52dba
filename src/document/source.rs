//! JSON document source.
//!
//! Records are decoded one array element at a time and handed to a callback, so reading a
//! file never holds more than one record in memory.

use super::types::RawRecord;
use crate::loader::types::LoadError;

use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use serde_json::error::Category;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Key of the record array when the document is an object.
const PAPERS_FIELD: &str = "papers";

/// Streams every record of a JSON document file into `on_record`.
///
/// Accepts `[ {...}, ... ]` or `{ "papers": [ {...}, ... ] }`. Array entries that are not
/// JSON objects become empty records, so the loader counts them as dropped. Reading stops
/// early, without error, once `on_record` returns `false`. Returns the number of records
/// handed over.
pub fn stream_documents<F>(path: &Path, on_record: F) -> Result<usize, LoadError>
where
    F: FnMut(RawRecord) -> bool,
{
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Source {
        path: source_name.clone(),
        source: source.into(),
    })?;

    stream_records(BufReader::new(file), &source_name, on_record)
}

/// Streams records from any JSON reader; `source_name` labels read errors.
pub fn stream_records<R, F>(reader: R, source_name: &str, on_record: F) -> Result<usize, LoadError>
where
    R: Read,
    F: FnMut(RawRecord) -> bool,
{
    let mut state = StreamState {
        on_record,
        forwarded: 0,
        stopped: false,
        found_papers: false,
    };

    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let outcome = DocumentSeed(&mut state)
        .deserialize(&mut deserializer)
        .and_then(|()| deserializer.end());

    match outcome {
        Ok(()) => Ok(state.forwarded),
        // The consumer hung up; the unread remainder is irrelevant.
        Err(_) if state.stopped => Ok(state.forwarded),
        Err(e) if e.classify() == Category::Data => Err(LoadError::UnsupportedFormat),
        Err(e) => Err(LoadError::Source {
            path: source_name.to_string(),
            source: e.into(),
        }),
    }
}

struct StreamState<F> {
    on_record: F,
    forwarded: usize,
    stopped: bool,
    found_papers: bool,
}

impl<F: FnMut(RawRecord) -> bool> StreamState<F> {
    fn forward<'de, A: SeqAccess<'de>>(&mut self, mut seq: A) -> Result<(), A::Error> {
        while let Some(entry) = seq.next_element::<Value>()? {
            let record = match entry {
                Value::Object(record) => record,
                _ => RawRecord::new(),
            };
            self.forwarded += 1;
            if !(self.on_record)(record) {
                self.stopped = true;
                return Err(de::Error::custom("record consumer stopped"));
            }
        }
        Ok(())
    }
}

/// The top-level value: a record array or an object holding one.
struct DocumentSeed<'s, F>(&'s mut StreamState<F>);

impl<'de, F: FnMut(RawRecord) -> bool> DeserializeSeed<'de> for DocumentSeed<'_, F> {
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, F: FnMut(RawRecord) -> bool> Visitor<'de> for DocumentSeed<'_, F> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a JSON array of records or an object with a \"{}\" array", PAPERS_FIELD)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        self.0.forward(seq)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            if key == PAPERS_FIELD && !self.0.found_papers {
                self.0.found_papers = true;
                map.next_value_seed(PapersSeed(&mut *self.0))?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        if self.0.found_papers {
            Ok(())
        } else {
            Err(de::Error::missing_field(PAPERS_FIELD))
        }
    }
}

/// The `"papers"` value, which must be an array.
struct PapersSeed<'s, F>(&'s mut StreamState<F>);

impl<'de, F: FnMut(RawRecord) -> bool> DeserializeSeed<'de> for PapersSeed<'_, F> {
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F: FnMut(RawRecord) -> bool> Visitor<'de> for PapersSeed<'_, F> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        self.0.forward(seq)
    }
}
