//! NPY preamble and header dictionary parsing.
//!
//! Layout:
//! - 6 bytes magic `\x93NUMPY`
//! - 1 byte major version, 1 byte minor version
//! - header length: `u16` LE (v1) or `u32` LE (v2, v3)
//! - header: a Python dict literal, space padded, newline terminated
//! - raw array data

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, value},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use tracing::trace;

use crate::dtype::Dtype;
use crate::NpyError;

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Parsed `.npy` header.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyHeader {
    /// Format version `(major, minor)`.
    pub version: (u8, u8),
    pub dtype: Dtype,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
    /// Offset of the first data byte.
    pub data_offset: usize,
}

/// Read the preamble and header dictionary of a `.npy` payload.
pub fn read_header(data: &[u8]) -> Result<NpyHeader, NpyError> {
    if data.len() < 10 || &data[..6] != MAGIC {
        return Err(NpyError::InvalidMagic);
    }

    let version = (data[6], data[7]);
    let (header_len, header_start) = match version.0 {
        1 => (u16::from_le_bytes([data[8], data[9]]) as usize, 10),
        2 | 3 => {
            if data.len() < 12 {
                return Err(NpyError::Truncated {
                    expected: 12,
                    actual: data.len(),
                });
            }
            let len = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
            (len, 12)
        }
        _ => return Err(NpyError::UnsupportedVersion(version.0, version.1)),
    };

    let data_offset = header_start + header_len;
    if data.len() < data_offset {
        return Err(NpyError::Truncated {
            expected: data_offset,
            actual: data.len(),
        });
    }

    let text = std::str::from_utf8(&data[header_start..data_offset])
        .map_err(|e| NpyError::InvalidHeader(format!("header is not text: {}", e)))?;
    trace!(header = text.trim_end(), "NPY header");

    let (_, entries) = header_dict(text.trim_end())
        .map_err(|e| NpyError::InvalidHeader(format!("{}: {:?}", e, text.trim_end())))?;

    let mut descr = None;
    let mut fortran_order = None;
    let mut shape = None;
    for (key, val) in entries {
        match key.as_str() {
            "descr" => descr = Some(val),
            "fortran_order" => fortran_order = Some(val),
            "shape" => shape = Some(val),
            other => {
                return Err(NpyError::InvalidHeader(format!("unexpected key '{}'", other)))
            }
        }
    }

    let dtype = Dtype::from_descr(
        &descr.ok_or_else(|| NpyError::InvalidHeader("missing 'descr'".to_string()))?,
    )?;

    let fortran_order = match fortran_order {
        Some(PyValue::Bool(b)) => b,
        Some(other) => {
            return Err(NpyError::InvalidHeader(format!(
                "'fortran_order' must be a bool, got {:?}",
                other
            )))
        }
        None => return Err(NpyError::InvalidHeader("missing 'fortran_order'".to_string())),
    };

    let shape = match shape {
        Some(PyValue::Tuple(items)) => items
            .into_iter()
            .map(|item| match item {
                PyValue::Int(n) => Ok(n as usize),
                other => Err(NpyError::InvalidHeader(format!(
                    "shape entries must be integers, got {:?}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(NpyError::InvalidHeader(format!(
                "'shape' must be a tuple, got {:?}",
                other
            )))
        }
        None => return Err(NpyError::InvalidHeader("missing 'shape'".to_string())),
    };

    Ok(NpyHeader {
        version,
        dtype,
        fortran_order,
        shape,
        data_offset,
    })
}

/// The subset of Python literals that appear in NPY headers.
#[derive(Debug, Clone, PartialEq)]
pub enum PyValue {
    Str(String),
    Bool(bool),
    Int(u64),
    Tuple(Vec<PyValue>),
    List(Vec<PyValue>),
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn py_str(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        str::to_string,
    )(input)
}

fn py_bool(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("True")), value(false, tag("False"))))(input)
}

fn py_int(input: &str) -> IResult<&str, u64> {
    // Python 2 era headers may carry a long suffix, e.g. `(3L, 4L)`
    terminated(map_res(digit1, str::parse::<u64>), opt(char('L')))(input)
}

/// Comma separated items between `open` and `close`, trailing comma allowed.
fn py_seq<'a>(open: char, close: char) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<PyValue>> {
    delimited(
        pair(char(open), multispace0),
        terminated(
            separated_list0(ws(char(',')), py_value),
            opt(ws(char(','))),
        ),
        pair(multispace0, char(close)),
    )
}

fn py_value(input: &str) -> IResult<&str, PyValue> {
    alt((
        map(py_str, PyValue::Str),
        map(py_bool, PyValue::Bool),
        map(py_int, PyValue::Int),
        map(py_seq('(', ')'), PyValue::Tuple),
        map(py_seq('[', ']'), PyValue::List),
    ))(input)
}

fn dict_entry(input: &str) -> IResult<&str, (String, PyValue)> {
    separated_pair(py_str, ws(char(':')), py_value)(input)
}

fn header_dict(input: &str) -> IResult<&str, Vec<(String, PyValue)>> {
    all_consuming(delimited(
        pair(multispace0, char('{')),
        preceded(
            multispace0,
            terminated(
                separated_list0(ws(char(',')), dict_entry),
                opt(ws(char(','))),
            ),
        ),
        tuple((multispace0, char('}'), multispace0)),
    ))(input)
}
