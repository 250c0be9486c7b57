use std::io::Read;

use csv::StringRecord;

use crate::{Error, ShapeError};

/// One submission read from a bulk file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRow {
    pub id: String,
    pub role: String,
    pub answers: Vec<i64>,
}

/// Reads `id,role,a1,...,a8` rows after a header line.
///
/// Rows are not required to have the same width; a short or long row comes
/// back as-is and is rejected when it is evaluated.
pub fn read_bulk<R: Read>(reader: R) -> impl Iterator<Item = Result<BulkRow, Error>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .map(|record| parse_row(&record?))
}

fn parse_row(record: &StringRecord) -> Result<BulkRow, Error> {
    let line = record.position().map_or(0, |position| position.line());
    let (id, role) = match (record.get(0), record.get(1)) {
        (Some(id), Some(role)) if !id.is_empty() => (id, role),
        _ => return Err(Error::MalformedRow(format!("line {line}: missing id or role"))),
    };
    let answers = record
        .iter()
        .skip(2)
        .enumerate()
        .map(|(position, value)| {
            value
                .parse::<i64>()
                .map_err(|_| ShapeError::NotInteger { position })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkRow {
        id: id.to_string(),
        role: role.to_string(),
        answers,
    })
}
