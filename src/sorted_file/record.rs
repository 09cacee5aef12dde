use std::cmp::Ordering;
use std::fmt;

use crate::sorted_file::constants::*;
use crate::sorted_file::error::{Result, SortFileError};

/// One fixed-width record: a numeric key and three text fields.
///
/// On-disk layout: 4-byte little-endian `id`, then `name`, `surname`, `city`
/// as NUL-padded fixed-width byte strings of 15, 20 and 20 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub city: String,
}

impl Record {
    pub fn new(id: i32, name: &str, surname: &str, city: &str) -> Result<Self> {
        check_width("name", name, NAME_SIZE)?;
        check_width("surname", surname, SURNAME_SIZE)?;
        check_width("city", city, CITY_SIZE)?;
        Ok(Self {
            id,
            name: name.to_string(),
            surname: surname.to_string(),
            city: city.to_string(),
        })
    }

    /// Encode into a buffer of exactly `RECORD_SIZE` bytes.
    ///
    /// `Record::new` is the validating constructor; text that was widened
    /// past its field afterwards is truncated to the on-disk width here
    /// rather than corrupting the layout.
    pub fn write_to(&self, buf: &mut [u8]) {
        assert_eq!(buf.len(), RECORD_SIZE);
        buf[..ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        let mut at = ID_SIZE;
        for (text, width) in [
            (&self.name, NAME_SIZE),
            (&self.surname, SURNAME_SIZE),
            (&self.city, CITY_SIZE),
        ] {
            let len = text.len().min(width);
            let field = &mut buf[at..at + width];
            field.fill(0);
            field[..len].copy_from_slice(&text.as_bytes()[..len]);
            at += width;
        }
    }

    /// Decode from a buffer of exactly `RECORD_SIZE` bytes.
    pub fn read_from(buf: &[u8]) -> Self {
        assert_eq!(buf.len(), RECORD_SIZE);
        let id = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        Self {
            id,
            name: text_field(buf, ID_SIZE, NAME_SIZE),
            surname: text_field(buf, ID_SIZE + NAME_SIZE, SURNAME_SIZE),
            city: text_field(buf, ID_SIZE + NAME_SIZE + SURNAME_SIZE, CITY_SIZE),
        }
    }
}

fn text_field(buf: &[u8], at: usize, width: usize) -> String {
    let field = &buf[at..at + width];
    let end = field.iter().position(|&b| b == 0).unwrap_or(width);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<15} {:<20} {:<20}",
            self.id, self.name, self.surname, self.city
        )
    }
}

fn check_width(field: &'static str, text: &str, max: usize) -> Result<()> {
    if text.len() > max {
        return Err(SortFileError::FieldTooWide { field, max });
    }
    Ok(())
}

/// Selector for the record attribute the file is ordered by.
///
/// `Id` compares numerically, the text fields byte-lexicographically; there is
/// no locale-aware collation. Equal keys carry no further ordering guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id = 0,
    Name = 1,
    Surname = 2,
    City = 3,
}

impl SortField {
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.as_bytes().cmp(b.name.as_bytes()),
            SortField::Surname => a.surname.as_bytes().cmp(b.surname.as_bytes()),
            SortField::City => a.city.as_bytes().cmp(b.city.as_bytes()),
        }
    }
}

impl TryFrom<u8> for SortField {
    type Error = SortFileError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(SortField::Id),
            1 => Ok(SortField::Name),
            2 => Ok(SortField::Surname),
            3 => Ok(SortField::City),
            other => Err(SortFileError::InvalidConfiguration {
                reason: format!("field index {} out of range (0-3)", other),
            }),
        }
    }
}
