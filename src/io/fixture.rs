//! Hex encoding of regression fixtures.
//!
//! A record is a hex string of little-endian `f64` values grouped in
//! `(x, y, z)` triples of 24 bytes. A fixture case is four consecutive
//! records: the vertices of polygon A, its inside point, the vertices of
//! polygon B and its inside point.

use std::fmt::Write as _;

use crate::error::{FixtureError, Result};
use crate::math::Vector3;
use crate::polygon::SphericalPolygon;

const TRIPLE_BYTES: usize = 24;
const RECORDS_PER_CASE: usize = 4;

/// One pair of polygons from a fixture file.
#[derive(Debug, Clone)]
pub struct FixtureCase {
    pub a_points: Vec<Vector3>,
    pub a_inside: Vector3,
    pub b_points: Vec<Vector3>,
    pub b_inside: Vector3,
}

impl FixtureCase {
    /// Builds both polygons of the case.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex list does not form a valid loop.
    pub fn polygons(&self) -> Result<(SphericalPolygon, SphericalPolygon)> {
        Ok((
            SphericalPolygon::from_points(&self.a_points, &self.a_inside)?,
            SphericalPolygon::from_points(&self.b_points, &self.b_inside)?,
        ))
    }
}

/// Decodes one hex record into vectors.
///
/// Surrounding whitespace is ignored. Vectors are returned as stored, without
/// normalization.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidHex`] for a non-hex character or a dangling
/// digit, and [`FixtureError::TruncatedRecord`] if the byte count is not a
/// multiple of 24.
pub fn decode_record(record: &str) -> Result<Vec<Vector3>> {
    let digits = record.trim().as_bytes();
    if digits.len() % 2 != 0 {
        return Err(FixtureError::InvalidHex { position: digits.len() }.into());
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for (i, pair) in digits.chunks_exact(2).enumerate() {
        let hi = hex_value(pair[0]).ok_or(FixtureError::InvalidHex { position: 2 * i })?;
        let lo = hex_value(pair[1]).ok_or(FixtureError::InvalidHex { position: 2 * i + 1 })?;
        bytes.push((hi << 4) | lo);
    }
    if bytes.len() % TRIPLE_BYTES != 0 {
        return Err(FixtureError::TruncatedRecord { len: bytes.len() }.into());
    }
    Ok(bytes
        .chunks_exact(TRIPLE_BYTES)
        .map(|t| Vector3::new(read_f64(&t[0..8]), read_f64(&t[8..16]), read_f64(&t[16..24])))
        .collect())
}

/// Encodes vectors as a lowercase hex record.
#[must_use]
pub fn encode_record(points: &[Vector3]) -> String {
    let mut out = String::with_capacity(points.len() * TRIPLE_BYTES * 2);
    for p in points {
        for c in [p.x, p.y, p.z] {
            for byte in c.to_le_bytes() {
                let _ = write!(out, "{byte:02x}");
            }
        }
    }
    out
}

/// Parses a fixture file into cases. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if a record fails to decode, an inside-point record does
/// not hold exactly one triple, or the file ends partway through a case.
pub fn parse_cases(text: &str) -> Result<Vec<FixtureCase>> {
    let records = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(decode_record)
        .collect::<Result<Vec<_>>>()?;

    let trailing = records.len() % RECORDS_PER_CASE;
    if trailing != 0 {
        return Err(FixtureError::IncompleteCase { records: trailing }.into());
    }

    records
        .chunks_exact(RECORDS_PER_CASE)
        .map(|case| {
            Ok(FixtureCase {
                a_points: case[0].clone(),
                a_inside: single(&case[1])?,
                b_points: case[2].clone(),
                b_inside: single(&case[3])?,
            })
        })
        .collect()
}

fn single(record: &[Vector3]) -> Result<Vector3> {
    match record {
        [p] => Ok(*p),
        _ => Err(FixtureError::InsideRecord { triples: record.len() }.into()),
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).and_then(|d| u8::try_from(d).ok())
}

fn read_f64(bytes: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    f64::from_le_bytes(buf)
}
