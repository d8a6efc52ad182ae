//! NumPy dtype descriptors and sample decoding.

use std::fmt;

use crate::header::PyValue;
use crate::NpyError;

/// Byte order of a multi-byte sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Numeric kind of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Float,
    Signed,
    Unsigned,
}

/// A single-channel numeric dtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dtype {
    pub kind: ScalarKind,
    /// Sample width in bytes.
    pub size: usize,
    pub order: ByteOrder,
    /// Field name when the array was exported as a one-field record.
    pub field: Option<String>,
}

impl Dtype {
    /// Interpret a header `descr` value.
    ///
    /// Accepts a type string such as `'<f4'` or a structured dtype with a
    /// single field such as `[('LST', '<f4')]`.
    pub fn from_descr(descr: &PyValue) -> Result<Self, NpyError> {
        match descr {
            PyValue::Str(s) => Self::from_type_str(s),
            PyValue::List(fields) => match fields.as_slice() {
                [PyValue::Tuple(field)] => match field.as_slice() {
                    [PyValue::Str(name), PyValue::Str(type_str)] => {
                        let mut dtype = Self::from_type_str(type_str)?;
                        dtype.field = Some(name.clone());
                        Ok(dtype)
                    }
                    _ => Err(NpyError::UnsupportedDtype(format!(
                        "unsupported record field {:?}",
                        field
                    ))),
                },
                _ => Err(NpyError::UnsupportedDtype(format!(
                    "expected exactly one band, got {} fields",
                    fields.len()
                ))),
            },
            other => Err(NpyError::UnsupportedDtype(format!("{:?}", other))),
        }
    }

    /// Parse a type string like `<f4`, `>i2` or `|u1`.
    pub fn from_type_str(s: &str) -> Result<Self, NpyError> {
        let unsupported = || NpyError::UnsupportedDtype(s.to_string());

        let mut chars = s.chars();
        let order = match chars.next().ok_or_else(unsupported)? {
            '<' | '|' => ByteOrder::Little,
            '>' => ByteOrder::Big,
            // Native order; every target we ship on is little-endian
            '=' => ByteOrder::Little,
            _ => return Err(unsupported()),
        };
        let kind = match chars.next().ok_or_else(unsupported)? {
            'f' => ScalarKind::Float,
            'i' => ScalarKind::Signed,
            'u' => ScalarKind::Unsigned,
            _ => return Err(unsupported()),
        };
        let size: usize = chars.as_str().parse().map_err(|_| unsupported())?;

        let supported = match kind {
            ScalarKind::Float => matches!(size, 4 | 8),
            ScalarKind::Signed | ScalarKind::Unsigned => matches!(size, 1 | 2 | 4 | 8),
        };
        if !supported {
            return Err(unsupported());
        }

        Ok(Self {
            kind,
            size,
            order,
            field: None,
        })
    }

    /// Bytes per sample.
    pub fn itemsize(&self) -> usize {
        self.size
    }

    /// Decode one sample to `f32`. `bytes` must be exactly `itemsize()` long.
    pub fn decode(&self, bytes: &[u8]) -> f32 {
        let mut buf = [0u8; 8];
        buf[..self.size].copy_from_slice(&bytes[..self.size]);
        if self.order == ByteOrder::Big {
            buf[..self.size].reverse();
        }

        match (self.kind, self.size) {
            (ScalarKind::Float, 4) => f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            (ScalarKind::Float, _) => f64::from_le_bytes(buf) as f32,
            (ScalarKind::Signed, 1) => buf[0] as i8 as f32,
            (ScalarKind::Signed, 2) => i16::from_le_bytes([buf[0], buf[1]]) as f32,
            (ScalarKind::Signed, 4) => i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as f32,
            (ScalarKind::Signed, _) => i64::from_le_bytes(buf) as f32,
            (ScalarKind::Unsigned, 1) => buf[0] as f32,
            (ScalarKind::Unsigned, 2) => u16::from_le_bytes([buf[0], buf[1]]) as f32,
            (ScalarKind::Unsigned, 4) => u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as f32,
            (ScalarKind::Unsigned, _) => u64::from_le_bytes(buf) as f32,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
        };
        let kind = match self.kind {
            ScalarKind::Float => 'f',
            ScalarKind::Signed => 'i',
            ScalarKind::Unsigned => 'u',
        };
        match &self.field {
            Some(name) => write!(f, "{}:{}{}{}", name, order, kind, self.size),
            None => write!(f, "{}{}{}", order, kind, self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_str_parsing() {
        let d = Dtype::from_type_str("<f4").unwrap();
        assert_eq!((d.kind, d.size, d.order), (ScalarKind::Float, 4, ByteOrder::Little));

        let d = Dtype::from_type_str(">i2").unwrap();
        assert_eq!((d.kind, d.size, d.order), (ScalarKind::Signed, 2, ByteOrder::Big));

        assert!(Dtype::from_type_str("<f2").is_err());
        assert!(Dtype::from_type_str("<c8").is_err());
        assert!(Dtype::from_type_str("").is_err());
    }

    #[test]
    fn test_decode_big_endian_float() {
        let d = Dtype::from_type_str(">f4").unwrap();
        assert_eq!(d.decode(&31.5f32.to_be_bytes()), 31.5);
    }

    #[test]
    fn test_decode_f64_nan_stays_nan() {
        let d = Dtype::from_type_str("<f8").unwrap();
        assert!(d.decode(&f64::NAN.to_le_bytes()).is_nan());
    }

    #[test]
    fn test_decode_signed_negative() {
        let d = Dtype::from_type_str("<i2").unwrap();
        assert_eq!(d.decode(&(-1234i16).to_le_bytes()), -1234.0);
    }

    #[test]
    fn test_structured_single_field() {
        let descr = PyValue::List(vec![PyValue::Tuple(vec![
            PyValue::Str("LST".to_string()),
            PyValue::Str("<f8".to_string()),
        ])]);
        let d = Dtype::from_descr(&descr).unwrap();
        assert_eq!(d.field.as_deref(), Some("LST"));
        assert_eq!(d.to_string(), "LST:<f8");
    }

    #[test]
    fn test_structured_multi_field_rejected() {
        let field = |name: &str| {
            PyValue::Tuple(vec![
                PyValue::Str(name.to_string()),
                PyValue::Str("<f4".to_string()),
            ])
        };
        let descr = PyValue::List(vec![field("B11"), field("B12")]);
        assert!(matches!(
            Dtype::from_descr(&descr),
            Err(NpyError::UnsupportedDtype(_))
        ));
    }
}
