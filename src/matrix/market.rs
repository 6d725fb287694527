//! Matrix Market text I/O.
//!
//! The reader is a streaming tokenizer over any [`BufRead`]: it accepts the
//! canonical header
//!
//! ```text
//! %%MatrixMarket matrix <fmt> <type> <storage>
//! ```
//!
//! with `fmt ∈ {coordinate, array}`, `type ∈ {real, integer, complex,
//! pattern}` and `storage ∈ {general, symmetric, skew-symmetric,
//! hermitian}`, plus the `%%GraphBLAS <typename>` extension line that
//! overrides the element type.  Comments and blank lines are ignored
//! anywhere; a missing header defaults to `coordinate real general`.
//! Indices are 1-based in the file and 0-based in the returned matrix.
//! Off-diagonal tuples of the symmetric storages are materialised twice
//! with the symmetry-appropriate value.  Floating tokens additionally
//! accept `inf`, `+inf`, `-inf`, and `nan`.
//!
//! The writer emits `coordinate` format in column-major tuple order,
//! choosing the tightest storage the values admit (symmetric, then
//! skew-symmetric, then hermitian for complex) and printing floats with the
//! shortest decimal that round-trips.

use super::vector::SparseVector;
use super::SparseMatrix;
use crate::error::{GraphError, Result};
use crate::scalar::{parse_mm_f64, Scalar};
use crate::types::ScalarType;
use num_complex::Complex64;
use std::io::{BufRead, Write};

/// Longest legal line, excluding the terminator.
const MAX_LINE: usize = 4095;

/// Matrix Market layout (`coordinate` = sparse triples, `array` = dense
/// column-major values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MmFormat {
    /// Sparse triple layout.
    Coordinate,
    /// Dense column-major layout.
    Array,
}

/// Matrix Market value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MmField {
    /// Floating-point values.
    Real,
    /// Integer values.
    Integer,
    /// Real/imaginary pairs.
    Complex,
    /// Structure only; entries carry the implicit value 1.
    Pattern,
}

/// Matrix Market storage symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MmStorage {
    /// No symmetry exploited.
    General,
    /// `A(i,j) == A(j,i)`; file holds the lower triangle.
    Symmetric,
    /// `A(i,j) == -A(j,i)`; zero-free diagonal; file holds the strict
    /// lower triangle.
    SkewSymmetric,
    /// `A(i,j) == conj(A(j,i))`; complex only.
    Hermitian,
}

/// Parsed Matrix Market header plus size line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MmHeader {
    /// Layout of the body.
    pub format: MmFormat,
    /// Value field of the body.
    pub field: MmField,
    /// Storage symmetry.
    pub storage: MmStorage,
    /// Element type from the `%%GraphBLAS` extension line, when present.
    pub type_override: Option<ScalarType>,
    /// Declared number of rows.
    pub nrows: usize,
    /// Declared number of columns.
    pub ncols: usize,
    /// Declared number of coordinate entries (0 for `array`).
    pub nvals: usize,
}

impl MmHeader {
    /// The element type the file naturally produces: the `%%GraphBLAS`
    /// override when present, else the field default (`real` → fp64,
    /// `integer` → int64, `pattern` → bool, `complex` → complex).
    pub fn natural_type(&self) -> ScalarType {
        if self.field == MmField::Complex {
            // the complex field is never overridden
            return ScalarType::Complex;
        }
        self.type_override.unwrap_or(match self.field {
            MmField::Real => ScalarType::Fp64,
            MmField::Integer => ScalarType::Int64,
            MmField::Pattern => ScalarType::Bool,
            MmField::Complex => ScalarType::Complex,
        })
    }
}

/// One parsed body value, kept exact until the target type is known.
#[derive(Debug, Clone, Copy)]
enum RawValue {
    Pattern,
    Int(i128),
    Num(f64),
    Cpx(f64, f64),
}

impl RawValue {
    fn negated(self) -> Self {
        match self {
            RawValue::Pattern => RawValue::Pattern,
            RawValue::Int(v) => RawValue::Int(-v),
            RawValue::Num(v) => RawValue::Num(-v),
            RawValue::Cpx(re, im) => RawValue::Cpx(-re, -im),
        }
    }

    fn conjugated(self) -> Self {
        match self {
            RawValue::Cpx(re, im) => RawValue::Cpx(re, -im),
            other => other,
        }
    }

    fn into_scalar<T: Scalar>(self) -> T {
        match self {
            RawValue::Pattern => T::one(),
            RawValue::Int(v) => T::from_i128(v),
            RawValue::Num(v) => T::from_f64(v),
            RawValue::Cpx(re, im) => T::from_complex(re, im),
        }
    }
}

/// Line source with the Matrix Market conventions baked in: 1-based line
/// numbers, lower-casing, and the 4095-byte cap.
struct Lines<R> {
    reader: R,
    number: usize,
    buf: String,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            number: 0,
            buf: String::new(),
        }
    }

    /// Next raw line, lower-cased, without the terminator.  `None` at EOF.
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf).map_err(|e| GraphError::Io {
            message: e.to_string(),
            context: "matrix market read",
        })?;
        if n == 0 {
            return Ok(None);
        }
        self.number += 1;
        let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
        if line.len() > MAX_LINE {
            return Err(GraphError::parse(
                self.number,
                format!("line longer than {} bytes", MAX_LINE),
            ));
        }
        Ok(Some(line.to_lowercase()))
    }
}

fn parse_index(token: &str, bound: usize, line: usize, what: &str) -> Result<usize> {
    let v: usize = token
        .parse()
        .map_err(|_| GraphError::parse(line, format!("bad {} index {:?}", what, token)))?;
    if v < 1 || v > bound {
        return Err(GraphError::parse(
            line,
            format!("{} index {} outside 1..={}", what, v, bound),
        ));
    }
    Ok(v - 1)
}

fn parse_size_token(token: &str, line: usize, what: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| GraphError::parse(line, format!("bad {} in size line: {:?}", what, token)))
}

fn parse_value(tokens: &[&str], field: MmField, line: usize) -> Result<RawValue> {
    let need = match field {
        MmField::Pattern => 0,
        MmField::Complex => 2,
        _ => 1,
    };
    if tokens.len() != need {
        return Err(GraphError::parse(
            line,
            format!("expected {} value token(s), found {}", need, tokens.len()),
        ));
    }
    match field {
        MmField::Pattern => Ok(RawValue::Pattern),
        MmField::Integer => {
            // exact integer parse first; fall back to a float token
            if let Ok(v) = tokens[0].parse::<i128>() {
                Ok(RawValue::Int(v))
            } else {
                parse_mm_f64(tokens[0])
                    .map(RawValue::Num)
                    .ok_or_else(|| GraphError::parse(line, format!("bad integer {:?}", tokens[0])))
            }
        }
        MmField::Real => parse_mm_f64(tokens[0])
            .map(RawValue::Num)
            .ok_or_else(|| GraphError::parse(line, format!("bad value {:?}", tokens[0]))),
        MmField::Complex => {
            let re = parse_mm_f64(tokens[0])
                .ok_or_else(|| GraphError::parse(line, format!("bad value {:?}", tokens[0])))?;
            let im = parse_mm_f64(tokens[1])
                .ok_or_else(|| GraphError::parse(line, format!("bad value {:?}", tokens[1])))?;
            Ok(RawValue::Cpx(re, im))
        }
    }
}

struct ParsedFile {
    header: MmHeader,
    entries: Vec<(usize, usize, RawValue)>,
}

fn parse_header_line(line: &str, number: usize) -> Result<(MmFormat, MmField, MmStorage)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 5 || tokens[0] != "%%matrixmarket" || tokens[1] != "matrix" {
        return Err(GraphError::parse(number, "malformed %%MatrixMarket header"));
    }
    let format = match tokens[2] {
        "coordinate" => MmFormat::Coordinate,
        "array" => MmFormat::Array,
        other => {
            return Err(GraphError::parse(
                number,
                format!("unknown format {:?}", other),
            ))
        }
    };
    let field = match tokens[3] {
        "real" => MmField::Real,
        "integer" => MmField::Integer,
        "complex" => MmField::Complex,
        "pattern" => MmField::Pattern,
        other => {
            return Err(GraphError::parse(number, format!("unknown type {:?}", other)))
        }
    };
    let storage = match tokens[4] {
        "general" => MmStorage::General,
        "symmetric" => MmStorage::Symmetric,
        "skew-symmetric" => MmStorage::SkewSymmetric,
        "hermitian" => MmStorage::Hermitian,
        other => {
            return Err(GraphError::parse(
                number,
                format!("unknown storage {:?}", other),
            ))
        }
    };
    Ok((format, field, storage))
}

fn check_header(format: MmFormat, field: MmField, storage: MmStorage, line: usize) -> Result<()> {
    if field == MmField::Pattern {
        if format == MmFormat::Array {
            return Err(GraphError::parse(line, "pattern type requires coordinate format"));
        }
        if matches!(storage, MmStorage::SkewSymmetric | MmStorage::Hermitian) {
            return Err(GraphError::parse(
                line,
                "pattern type only combines with general or symmetric storage",
            ));
        }
    }
    if storage == MmStorage::Hermitian && field != MmField::Complex {
        return Err(GraphError::parse(line, "hermitian storage requires complex type"));
    }
    Ok(())
}

fn parse_file<R: BufRead>(reader: R) -> Result<ParsedFile> {
    let mut lines = Lines::new(reader);

    let mut format = MmFormat::Coordinate;
    let mut field = MmField::Real;
    let mut storage = MmStorage::General;
    let mut type_override: Option<ScalarType> = None;

    // the header, when present, is the very first line of the file
    let mut pending: Option<String> = None;
    if let Some(first) = lines.next_line()? {
        if first.starts_with("%%matrixmarket") {
            let (f, t, s) = parse_header_line(&first, lines.number)?;
            check_header(f, t, s, lines.number)?;
            format = f;
            field = t;
            storage = s;
        } else {
            pending = Some(first);
        }
    } else {
        return Err(GraphError::parse(1, "empty input"));
    }

    // scan comments for the %%GraphBLAS extension until the size line
    let size_line;
    let size_line_no;
    loop {
        let line = match pending.take() {
            Some(l) => l,
            None => lines
                .next_line()?
                .ok_or_else(|| GraphError::parse(lines.number, "missing size line"))?,
        };
        if line.starts_with("%%graphblas") {
            let mut it = line.split_whitespace();
            let _ = it.next();
            let name = it.next().ok_or_else(|| {
                GraphError::parse(lines.number, "%%GraphBLAS line without a type name")
            })?;
            let t = ScalarType::from_name(name).map_err(|_| {
                GraphError::parse(lines.number, format!("unknown %%GraphBLAS type {:?}", name))
            })?;
            if field != MmField::Complex {
                type_override = Some(t);
            }
            continue;
        }
        if line.starts_with('%') || line.trim().is_empty() {
            continue;
        }
        size_line = line;
        size_line_no = lines.number.max(1);
        break;
    }

    let size_tokens: Vec<&str> = size_line.split_whitespace().collect();
    let (nrows, ncols, declared_nvals) = match format {
        MmFormat::Coordinate => {
            if size_tokens.len() != 3 {
                return Err(GraphError::parse(
                    size_line_no,
                    "coordinate size line needs nrows ncols nvals",
                ));
            }
            (
                parse_size_token(size_tokens[0], size_line_no, "nrows")?,
                parse_size_token(size_tokens[1], size_line_no, "ncols")?,
                parse_size_token(size_tokens[2], size_line_no, "nvals")?,
            )
        }
        MmFormat::Array => {
            if size_tokens.len() != 2 {
                return Err(GraphError::parse(
                    size_line_no,
                    "array size line needs nrows ncols",
                ));
            }
            (
                parse_size_token(size_tokens[0], size_line_no, "nrows")?,
                parse_size_token(size_tokens[1], size_line_no, "ncols")?,
                0,
            )
        }
    };
    if storage != MmStorage::General && nrows != ncols {
        return Err(GraphError::parse(
            size_line_no,
            "symmetric storages require a square matrix",
        ));
    }

    let mut entries: Vec<(usize, usize, RawValue)> = Vec::new();
    let expand = |entries: &mut Vec<(usize, usize, RawValue)>,
                  i: usize,
                  j: usize,
                  v: RawValue,
                  line: usize|
     -> Result<()> {
        match storage {
            MmStorage::General => entries.push((i, j, v)),
            MmStorage::Symmetric => {
                entries.push((i, j, v));
                if i != j {
                    entries.push((j, i, v));
                }
            }
            MmStorage::SkewSymmetric => {
                if i == j {
                    return Err(GraphError::parse(
                        line,
                        "skew-symmetric storage forbids diagonal entries",
                    ));
                }
                entries.push((i, j, v));
                entries.push((j, i, v.negated()));
            }
            MmStorage::Hermitian => {
                entries.push((i, j, v));
                if i != j {
                    entries.push((j, i, v.conjugated()));
                }
            }
        }
        Ok(())
    };

    match format {
        MmFormat::Coordinate => {
            let mut seen = 0usize;
            while let Some(line) = lines.next_line()? {
                if line.starts_with('%') || line.trim().is_empty() {
                    continue;
                }
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() < 2 {
                    return Err(GraphError::parse(lines.number, "entry needs row and column"));
                }
                if seen == declared_nvals {
                    return Err(GraphError::parse(
                        lines.number,
                        format!("more than the declared {} entries", declared_nvals),
                    ));
                }
                let i = parse_index(tokens[0], nrows, lines.number, "row")?;
                let j = parse_index(tokens[1], ncols, lines.number, "column")?;
                let v = parse_value(&tokens[2..], field, lines.number)?;
                expand(&mut entries, i, j, v, lines.number)?;
                seen += 1;
            }
            if seen != declared_nvals {
                return Err(GraphError::parse(
                    lines.number + 1,
                    format!("truncated input: {} of {} entries", seen, declared_nvals),
                ));
            }
        }
        MmFormat::Array => {
            // column-major positions, lower triangle only for the
            // symmetric storages
            let mut positions: Vec<(usize, usize)> = Vec::new();
            for j in 0..ncols {
                let start = match storage {
                    MmStorage::General => 0,
                    MmStorage::SkewSymmetric => j + 1,
                    _ => j,
                };
                for i in start..nrows {
                    positions.push((i, j));
                }
            }
            let mut at = 0usize;
            while let Some(line) = lines.next_line()? {
                if line.starts_with('%') || line.trim().is_empty() {
                    continue;
                }
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if at == positions.len() {
                    return Err(GraphError::parse(lines.number, "more values than positions"));
                }
                let v = parse_value(&tokens, field, lines.number)?;
                let (i, j) = positions[at];
                expand(&mut entries, i, j, v, lines.number)?;
                at += 1;
            }
            if at != positions.len() {
                return Err(GraphError::parse(
                    lines.number + 1,
                    format!("truncated input: {} of {} values", at, positions.len()),
                ));
            }
        }
    }

    Ok(ParsedFile {
        header: MmHeader {
            format,
            field,
            storage,
            type_override,
            nrows,
            ncols,
            nvals: declared_nvals,
        },
        entries,
    })
}

/// Read a matrix, converting the file's values to `T`.
///
/// A `complex` file can only be read as complex; everything else converts
/// exactly (integers stay exact, pattern entries become `T::one()`).
pub fn read_matrix<T: Scalar, R: BufRead>(reader: R) -> Result<SparseMatrix<T>> {
    read_matrix_with_header(reader).map(|(m, _)| m)
}

/// [`read_matrix`] variant that also returns the parsed header.
pub fn read_matrix_with_header<T: Scalar, R: BufRead>(
    reader: R,
) -> Result<(SparseMatrix<T>, MmHeader)> {
    let parsed = parse_file(reader)?;
    if parsed.header.field == MmField::Complex && T::TYPE != ScalarType::Complex {
        return Err(GraphError::TypeMismatch {
            expected: ScalarType::Complex,
            actual: T::TYPE,
            operation: "read_matrix",
        });
    }
    let triplets: Vec<(usize, usize, T)> = parsed
        .entries
        .into_iter()
        .map(|(i, j, v)| (i, j, v.into_scalar::<T>()))
        .collect();
    let m = SparseMatrix::from_triplets(
        parsed.header.nrows,
        parsed.header.ncols,
        triplets,
        |_, b| b,
    )?;
    Ok((m, parsed.header))
}

/// A matrix whose element type was decided by the file that produced it.
#[derive(Debug, Clone)]
pub enum AnyMatrix {
    /// `bool` entries.
    Bool(SparseMatrix<bool>),
    /// `i8` entries.
    Int8(SparseMatrix<i8>),
    /// `i16` entries.
    Int16(SparseMatrix<i16>),
    /// `i32` entries.
    Int32(SparseMatrix<i32>),
    /// `i64` entries.
    Int64(SparseMatrix<i64>),
    /// `u8` entries.
    UInt8(SparseMatrix<u8>),
    /// `u16` entries.
    UInt16(SparseMatrix<u16>),
    /// `u32` entries.
    UInt32(SparseMatrix<u32>),
    /// `u64` entries.
    UInt64(SparseMatrix<u64>),
    /// `f32` entries.
    Fp32(SparseMatrix<f32>),
    /// `f64` entries.
    Fp64(SparseMatrix<f64>),
    /// Complex entries.
    Complex(SparseMatrix<Complex64>),
}

macro_rules! on_any {
    ($any:expr, $m:ident => $body:expr) => {
        match $any {
            AnyMatrix::Bool($m) => $body,
            AnyMatrix::Int8($m) => $body,
            AnyMatrix::Int16($m) => $body,
            AnyMatrix::Int32($m) => $body,
            AnyMatrix::Int64($m) => $body,
            AnyMatrix::UInt8($m) => $body,
            AnyMatrix::UInt16($m) => $body,
            AnyMatrix::UInt32($m) => $body,
            AnyMatrix::UInt64($m) => $body,
            AnyMatrix::Fp32($m) => $body,
            AnyMatrix::Fp64($m) => $body,
            AnyMatrix::Complex($m) => $body,
        }
    };
}

impl AnyMatrix {
    /// Runtime element type.
    pub fn scalar_type(&self) -> ScalarType {
        on_any!(self, m => m.scalar_type())
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        on_any!(self, m => m.nrows())
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        on_any!(self, m => m.ncols())
    }

    /// Number of explicit entries.
    pub fn nvals(&self) -> usize {
        on_any!(self, m => m.nvals())
    }
}

/// Read a matrix of the file's own element type (the `%%GraphBLAS`
/// override when present, else the field default).
pub fn read_matrix_any<R: BufRead>(reader: R) -> Result<(AnyMatrix, MmHeader)> {
    let parsed = parse_file(reader)?;
    let header = parsed.header.clone();

    fn assemble<T: Scalar>(p: ParsedFile) -> Result<SparseMatrix<T>> {
        let triplets: Vec<(usize, usize, T)> = p
            .entries
            .into_iter()
            .map(|(i, j, v)| (i, j, v.into_scalar::<T>()))
            .collect();
        SparseMatrix::from_triplets(p.header.nrows, p.header.ncols, triplets, |_, b| b)
    }

    let any = match header.natural_type() {
        ScalarType::Bool => AnyMatrix::Bool(assemble(parsed)?),
        ScalarType::Int8 => AnyMatrix::Int8(assemble(parsed)?),
        ScalarType::Int16 => AnyMatrix::Int16(assemble(parsed)?),
        ScalarType::Int32 => AnyMatrix::Int32(assemble(parsed)?),
        ScalarType::Int64 => AnyMatrix::Int64(assemble(parsed)?),
        ScalarType::UInt8 => AnyMatrix::UInt8(assemble(parsed)?),
        ScalarType::UInt16 => AnyMatrix::UInt16(assemble(parsed)?),
        ScalarType::UInt32 => AnyMatrix::UInt32(assemble(parsed)?),
        ScalarType::UInt64 => AnyMatrix::UInt64(assemble(parsed)?),
        ScalarType::Fp32 => AnyMatrix::Fp32(assemble(parsed)?),
        ScalarType::Fp64 => AnyMatrix::Fp64(assemble(parsed)?),
        ScalarType::Complex => AnyMatrix::Complex(assemble(parsed)?),
        ScalarType::UserDefined => {
            return Err(GraphError::NotImplemented(
                "user-defined element types in matrix market files",
            ))
        }
    };
    Ok((any, header))
}

/// Read a sparse vector stored as an `n × 1` (or `1 × n`) matrix.
pub fn read_vector<T: Scalar, R: BufRead>(reader: R) -> Result<SparseVector<T>> {
    let m: SparseMatrix<T> = read_matrix(reader)?;
    if m.ncols() == 1 {
        let entries = m.iter().map(|(i, _, v)| (i, *v)).collect();
        SparseVector::from_entries(m.nrows(), entries, |_, b| b)
    } else if m.nrows() == 1 {
        let entries = m.iter().map(|(_, j, v)| (j, *v)).collect();
        SparseVector::from_entries(m.ncols(), entries, |_, b| b)
    } else {
        Err(GraphError::invalid_value(
            "read_vector",
            format!("{}x{} matrix is not a vector", m.nrows(), m.ncols()),
        ))
    }
}

fn field_for(t: ScalarType, all_true: bool) -> MmField {
    match t {
        ScalarType::Bool => {
            if all_true {
                MmField::Pattern
            } else {
                // explicit false entries cannot survive pattern storage
                MmField::Integer
            }
        }
        t if t.is_integer() => MmField::Integer,
        ScalarType::Complex => MmField::Complex,
        _ => MmField::Real,
    }
}

fn storage_for<T: Scalar>(m: &SparseMatrix<T>) -> MmStorage {
    if !m.is_square() {
        return MmStorage::General;
    }
    let t = m.transpose();
    if m.is_equal(&t) {
        return MmStorage::Symmetric;
    }
    if m.ndiag() == 0 && m.isall(&t, |a, b| *a == b.negated()) {
        return MmStorage::SkewSymmetric;
    }
    if T::TYPE == ScalarType::Complex && m.isall(&t, |a, b| *a == b.conjugated()) {
        return MmStorage::Hermitian;
    }
    MmStorage::General
}

fn storage_name(s: MmStorage) -> &'static str {
    match s {
        MmStorage::General => "general",
        MmStorage::Symmetric => "symmetric",
        MmStorage::SkewSymmetric => "skew-symmetric",
        MmStorage::Hermitian => "hermitian",
    }
}

fn field_name(f: MmField) -> &'static str {
    match f {
        MmField::Real => "real",
        MmField::Integer => "integer",
        MmField::Complex => "complex",
        MmField::Pattern => "pattern",
    }
}

/// Write a matrix in `coordinate` format, column-major tuple order, with
/// the `%%GraphBLAS` type line and the tightest storage the values admit.
pub fn write_matrix<T: Scalar, W: Write>(m: &SparseMatrix<T>, out: &mut W) -> Result<()> {
    let all_true = T::TYPE == ScalarType::Bool
        && m.iter().all(|(_, _, v)| {
            let (re, _) = v.to_complex();
            re != 0.0
        });
    let field = field_for(T::TYPE, all_true);
    let storage = storage_for(m);

    // column-major traversal = row-major traversal of the transpose
    let transposed = m.transpose();
    let mut tuples: Vec<(usize, usize, T)> = Vec::new();
    for (j, i, v) in transposed.iter() {
        let keep = match storage {
            MmStorage::General => true,
            MmStorage::SkewSymmetric => i > j,
            _ => i >= j,
        };
        if keep {
            tuples.push((i, j, *v));
        }
    }

    writeln!(
        out,
        "%%MatrixMarket matrix coordinate {} {}",
        field_name(field),
        storage_name(storage)
    )?;
    writeln!(out, "%%GraphBLAS {}", T::TYPE.name())?;
    writeln!(out, "{} {} {}", m.nrows(), m.ncols(), tuples.len())?;
    for (i, j, v) in tuples {
        match field {
            MmField::Pattern => writeln!(out, "{} {}", i + 1, j + 1)?,
            _ => writeln!(out, "{} {} {}", i + 1, j + 1, v.format_entry())?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_str<T: Scalar>(text: &str) -> Result<SparseMatrix<T>> {
        read_matrix::<T, _>(text.as_bytes())
    }

    #[test]
    fn reads_plain_coordinate() {
        let text = "%%MatrixMarket matrix coordinate real general\n\
                    % a comment\n\
                    3 3 2\n\
                    1 2 1.5\n\
                    3 1 -2\n";
        let m = read_str::<f64>(text).unwrap();
        assert_eq!(m.nvals(), 2);
        assert_eq!(m.get(0, 1), Some(1.5));
        assert_eq!(m.get(2, 0), Some(-2.0));
    }

    #[test]
    fn header_is_optional() {
        let text = "2 2 1\n2 2 4.25\n";
        let m = read_str::<f64>(text).unwrap();
        assert_eq!(m.get(1, 1), Some(4.25));
    }

    #[test]
    fn graphblas_line_overrides_type() {
        let text = "%%MatrixMarket matrix coordinate integer general\n\
                    %%GraphBLAS uint8\n\
                    2 2 1\n\
                    1 1 200\n";
        let (any, header) = read_matrix_any(text.as_bytes()).unwrap();
        assert_eq!(header.natural_type(), ScalarType::UInt8);
        match any {
            AnyMatrix::UInt8(m) => assert_eq!(m.get(0, 0), Some(200)),
            other => panic!("wrong variant: {:?}", other.scalar_type()),
        }
    }

    #[test]
    fn symmetric_storage_expands() {
        let text = "%%MatrixMarket matrix coordinate real symmetric\n\
                    3 3 2\n\
                    2 1 5\n\
                    3 3 1\n";
        let m = read_str::<f64>(text).unwrap();
        assert_eq!(m.nvals(), 3);
        assert_eq!(m.get(0, 1), Some(5.0));
        assert_eq!(m.get(1, 0), Some(5.0));
    }

    #[test]
    fn skew_symmetric_negates_and_rejects_diagonal() {
        let text = "%%MatrixMarket matrix coordinate real skew-symmetric\n\
                    2 2 1\n\
                    2 1 3\n";
        let m = read_str::<f64>(text).unwrap();
        assert_eq!(m.get(1, 0), Some(3.0));
        assert_eq!(m.get(0, 1), Some(-3.0));

        let bad = "%%MatrixMarket matrix coordinate real skew-symmetric\n\
                   2 2 1\n\
                   1 1 3\n";
        assert!(read_str::<f64>(bad).is_err());
    }

    #[test]
    fn hermitian_conjugates() {
        let text = "%%MatrixMarket matrix coordinate complex hermitian\n\
                    2 2 1\n\
                    2 1 1.5 2.5\n";
        let m = read_str::<Complex64>(text).unwrap();
        assert_eq!(m.get(1, 0), Some(Complex64::new(1.5, 2.5)));
        assert_eq!(m.get(0, 1), Some(Complex64::new(1.5, -2.5)));
    }

    #[test]
    fn pattern_combinations_are_checked() {
        let bad = "%%MatrixMarket matrix coordinate pattern skew-symmetric\n2 2 1\n2 1\n";
        assert!(read_str::<bool>(bad).is_err());
        let bad2 = "%%MatrixMarket matrix array pattern general\n2 2\n";
        assert!(read_str::<bool>(bad2).is_err());
        let bad3 = "%%MatrixMarket matrix coordinate real hermitian\n2 2 1\n2 1 3\n";
        assert!(read_str::<f64>(bad3).is_err());
    }

    #[test]
    fn truncated_and_overfull_input() {
        let short = "%%MatrixMarket matrix coordinate real general\n2 2 2\n1 1 1\n";
        assert!(read_str::<f64>(short).is_err());
        let long = "%%MatrixMarket matrix coordinate real general\n2 2 1\n1 1 1\n2 2 1\n";
        assert!(read_str::<f64>(long).is_err());
    }

    #[test]
    fn inf_and_nan_tokens() {
        let text = "%%MatrixMarket matrix coordinate real general\n\
                    2 2 3\n\
                    1 1 inf\n\
                    1 2 -inf\n\
                    2 1 nan\n";
        let m = read_str::<f64>(text).unwrap();
        assert_eq!(m.get(0, 0), Some(f64::INFINITY));
        assert_eq!(m.get(0, 1), Some(f64::NEG_INFINITY));
        assert!(m.get(1, 0).unwrap().is_nan());
    }

    #[test]
    fn array_format_column_major() {
        let text = "%%MatrixMarket matrix array real general\n\
                    2 2\n\
                    1\n2\n3\n4\n";
        let m = read_str::<f64>(text).unwrap();
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(1, 0), Some(2.0));
        assert_eq!(m.get(0, 1), Some(3.0));
        assert_eq!(m.get(1, 1), Some(4.0));
    }

    #[test]
    fn one_based_bounds_enforced() {
        let zero = "%%MatrixMarket matrix coordinate real general\n2 2 1\n0 1 5\n";
        assert!(read_str::<f64>(zero).is_err());
        let big = "%%MatrixMarket matrix coordinate real general\n2 2 1\n3 1 5\n";
        assert!(read_str::<f64>(big).is_err());
    }

    fn round_trip<T: Scalar>(m: &SparseMatrix<T>) {
        let mut text = Vec::new();
        write_matrix(m, &mut text).unwrap();
        let back: SparseMatrix<T> = read_matrix(text.as_slice()).unwrap();
        assert!(m.is_equal(&back), "round trip failed:\n{}", String::from_utf8_lossy(&text));
    }

    #[test]
    fn round_trips_every_type() {
        round_trip(
            &SparseMatrix::from_triplets(3, 3, vec![(0, 1, true), (2, 2, true)], |a, _| a).unwrap(),
        );
        round_trip(
            &SparseMatrix::from_triplets(2, 3, vec![(0, 1, -7i8), (1, 2, 100)], |a, _| a).unwrap(),
        );
        round_trip(
            &SparseMatrix::from_triplets(2, 2, vec![(0, 0, u64::MAX), (1, 0, 7u64)], |a, _| a)
                .unwrap(),
        );
        round_trip(
            &SparseMatrix::from_triplets(2, 2, vec![(0, 1, 0.1f32), (1, 1, -3.5)], |a, _| a)
                .unwrap(),
        );
        round_trip(
            &SparseMatrix::from_triplets(
                2,
                2,
                vec![(0, 1, 1.0 / 3.0), (1, 0, f64::INFINITY)],
                |a: f64, _| a,
            )
            .unwrap(),
        );
        round_trip(
            &SparseMatrix::from_triplets(
                2,
                2,
                vec![(0, 1, Complex64::new(1.5, -0.25))],
                |a, _| a,
            )
            .unwrap(),
        );
    }

    #[test]
    fn writer_detects_symmetric_storage() {
        let m = SparseMatrix::from_triplets(
            3,
            3,
            vec![(0, 1, 2.0f64), (1, 0, 2.0), (2, 2, 1.0)],
            |a, _| a,
        )
        .unwrap();
        let mut text = Vec::new();
        write_matrix(&m, &mut text).unwrap();
        let rendered = String::from_utf8(text).unwrap();
        assert!(rendered.contains("real symmetric"));
        // lower triangle only: two tuples
        assert!(rendered.contains("3 3 2"));
        let back: SparseMatrix<f64> = read_matrix(rendered.as_bytes()).unwrap();
        assert!(m.is_equal(&back));
    }

    #[test]
    fn false_bool_entries_survive() {
        let m = SparseMatrix::from_triplets(2, 2, vec![(0, 0, true), (1, 1, false)], |a, _| a)
            .unwrap();
        let mut text = Vec::new();
        write_matrix(&m, &mut text).unwrap();
        let rendered = String::from_utf8(text).unwrap();
        assert!(rendered.contains("integer"));
        let (any, _) = read_matrix_any(rendered.as_bytes()).unwrap();
        match any {
            AnyMatrix::Bool(back) => assert!(m.is_equal(&back)),
            other => panic!("wrong variant: {:?}", other.scalar_type()),
        }
    }
}
