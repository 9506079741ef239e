//! Bulk feed of backbone records.
//!
//! The feed is a tab separated text dump with one record per line and the
//! columns
//!
//! ```text
//! key  canonical  authorship  year  rank  kingdom  deleted
//! ```
//!
//! Empty fields are nulls. `rank` is an upper-case tag such as `SPECIES`,
//! `kingdom` the usage key of the backbone kingdom record and `deleted` a
//! boolean flag (`t`/`f`). An empty rank means unranked, an empty kingdom
//! incertae sedis. Fields are never quoted, so names must not contain the
//! delimiter or line breaks.
//!
//! # Example
//!
//! ```
//! use backbone_lookup::feed::{FeedConfig, FeedReader};
//! use backbone_lookup::{Kingdom, Rank};
//!
//! let input = "9\tAbies alba\t\t\tSPECIES\t6\tf\n10\tAbies alba\tMumpf.\t\tSPECIES\t6\tt\n";
//! let records: Vec<_> = FeedReader::new(input.as_bytes(), &FeedConfig::new())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].authorship.as_deref(), Some("Mumpf."));
//! assert_eq!(records[1].kingdom, Kingdom::Plantae);
//! assert!(records[1].deleted);
//! ```

use crate::{BackboneRecord, Kingdom, LookupError, Rank, Result};
use csv::{QuoteStyle, Reader, ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::io::{self, Read, Write};

const HEADERS: [&str; 7] = [
    "key",
    "canonical",
    "authorship",
    "year",
    "rank",
    "kingdom",
    "deleted",
];

const FALSE_VALUES: [&str; 4] = ["", "f", "false", "0"];

/// Configuration of the feed dialect.
///
/// # Examples
///
/// ```
/// use backbone_lookup::feed::FeedConfig;
///
/// let mut config = FeedConfig::new();
/// config.set_delimiter(b',').set_has_header(true);
/// ```
#[derive(Debug, Clone)]
pub struct FeedConfig {
    delimiter: u8,
    /// Whether the first line holds column names
    has_header: bool,
    /// Values of the deleted column that flag a record as deleted
    deleted_values: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedConfig {
    /// Tab separated, no header, `t`, `true` or `1` for deleted records.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delimiter: b'\t',
            has_header: false,
            deleted_values: vec!["t".to_string(), "true".to_string(), "1".to_string()],
        }
    }

    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn set_has_header(&mut self, has_header: bool) -> &mut Self {
        self.has_header = has_header;
        self
    }

    /// Sets the values of the deleted column that mark a deleted record.
    ///
    /// Any other value apart from an empty field, `f`, `false` or `0` is rejected.
    pub fn set_deleted_values(&mut self, values: Vec<String>) -> &mut Self {
        self.deleted_values = values;
        self
    }

    fn parse_deleted(&self, value: &str, line: usize) -> Result<bool> {
        if self.deleted_values.iter().any(|v| v == value) {
            Ok(true)
        } else if FALSE_VALUES.contains(&value) {
            Ok(false)
        } else {
            Err(LookupError::InvalidField {
                line,
                field: "deleted".to_string(),
                message: format!("not a boolean: {value:?}"),
            })
        }
    }
}

/// Iterator over the records of a feed.
///
/// Yields an error and stops if the input cannot be read or a record is
/// malformed.
pub struct FeedReader<R> {
    reader: Reader<R>,
    config: FeedConfig,
    record: StringRecord,
    consumed: usize,
    failed: bool,
}

impl<R: Read> FeedReader<R> {
    pub fn new(input: R, config: &FeedConfig) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(config.has_header)
            .quoting(false)
            .flexible(true)
            .from_reader(input);
        Self {
            reader,
            config: config.clone(),
            record: StringRecord::new(),
            consumed: 0,
            failed: false,
        }
    }

    /// Number of records decoded so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn decode(&self, line: usize) -> Result<BackboneRecord> {
        let row = &self.record;
        if row.len() != HEADERS.len() {
            return Err(LookupError::InvalidField {
                line,
                field: "record".to_string(),
                message: format!("expected {} columns, found {}", HEADERS.len(), row.len()),
            });
        }

        let key = row[0].parse::<u32>().map_err(|e| LookupError::InvalidField {
            line,
            field: HEADERS[0].to_string(),
            message: format!("{:?}: {e}", &row[0]),
        })?;

        let rank = match &row[4] {
            "" => Rank::Unranked,
            tag => Rank::from_tag(tag).ok_or_else(|| LookupError::InvalidRank {
                line,
                value: tag.to_string(),
            })?,
        };

        let kingdom = match &row[5] {
            "" => Kingdom::IncertaeSedis,
            id => id
                .parse::<u32>()
                .ok()
                .and_then(Kingdom::from_usage_key)
                .ok_or_else(|| LookupError::InvalidKingdom {
                    line,
                    value: id.to_string(),
                })?,
        };

        Ok(BackboneRecord {
            key,
            canonical: row[1].to_string(),
            authorship: non_empty(&row[2]),
            year: non_empty(&row[3]),
            rank,
            kingdom,
            deleted: self.config.parse_deleted(&row[6], line)?,
        })
    }
}

impl<R: Read> Iterator for FeedReader<R> {
    type Item = Result<BackboneRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.reader.read_record(&mut self.record) {
            Ok(false) => return None,
            Ok(true) => {
                let line = self
                    .record
                    .position()
                    .map_or(self.consumed + 1, |p| p.line() as usize);
                self.decode(line)
            }
            Err(e) => Err(LookupError::LoadFailed {
                consumed: self.consumed,
                message: e.to_string(),
            }),
        };

        match result {
            Ok(record) => {
                self.consumed += 1;
                Some(Ok(record))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Writes records in the feed format.
///
/// # Examples
///
/// ```
/// use backbone_lookup::feed::{FeedConfig, FeedWriter};
/// use backbone_lookup::{BackboneRecord, Kingdom, Rank};
///
/// let mut out = Vec::new();
/// let mut writer = FeedWriter::new(&mut out, &FeedConfig::new()).unwrap();
/// writer
///     .write(&BackboneRecord::new(7, "Rodentia", Rank::Order, Kingdom::Animalia).with_authorship("Bowdich"))
///     .unwrap();
/// writer.flush().unwrap();
/// drop(writer);
/// assert_eq!(String::from_utf8(out).unwrap(), "7\tRodentia\tBowdich\t\tORDER\t1\tf\n");
/// ```
pub struct FeedWriter<W: Write> {
    writer: Writer<W>,
    delimiter: char,
    line: usize,
}

impl<W: Write> FeedWriter<W> {
    /// Creates a writer, emitting the header line if the config asks for one.
    pub fn new(output: W, config: &FeedConfig) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(config.delimiter)
            .quote_style(QuoteStyle::Never)
            .has_headers(false)
            .from_writer(output);
        if config.has_header {
            writer.write_record(HEADERS).map_err(io::Error::from)?;
        }
        Ok(Self {
            writer,
            delimiter: char::from(config.delimiter),
            line: usize::from(config.has_header),
        })
    }

    /// Writes one record.
    ///
    /// Fields are never quoted, so a text field containing the delimiter or a
    /// line break is rejected with [`LookupError::InvalidField`] and nothing is
    /// written.
    pub fn write(&mut self, record: &BackboneRecord) -> Result<()> {
        self.line += 1;
        let text_fields = [
            ("canonical", Some(record.canonical.as_str())),
            ("authorship", record.authorship.as_deref()),
            ("year", record.year.as_deref()),
        ];
        for (field, value) in text_fields {
            if value.is_some_and(|v| v.contains([self.delimiter, '\n', '\r'])) {
                return Err(LookupError::InvalidField {
                    line: self.line,
                    field: field.to_string(),
                    message: format!("usage {} contains the delimiter or a line break", record.key),
                });
            }
        }

        let key = record.key.to_string();
        let kingdom = record.kingdom.usage_key().to_string();
        self.writer
            .write_record([
                key.as_str(),
                record.canonical.as_str(),
                record.authorship.as_deref().unwrap_or_default(),
                record.year.as_deref().unwrap_or_default(),
                record.rank.as_tag(),
                kingdom.as_str(),
                if record.deleted { "t" } else { "f" },
            ])
            .map_err(io::Error::from)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
