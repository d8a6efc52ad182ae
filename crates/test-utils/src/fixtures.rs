//! In-memory `.npy` payloads for loader and end-to-end tests.

/// Build an NPY v1.0 payload holding little-endian `f32` samples.
pub fn npy_f32(shape: &[usize], values: &[f32]) -> Vec<u8> {
    let body: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    npy_with_descr("'<f4'", shape, false, &body)
}

/// Build an NPY v1.0 payload holding little-endian `f64` samples.
pub fn npy_f64(shape: &[usize], values: &[f64]) -> Vec<u8> {
    let body: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    npy_with_descr("'<f8'", shape, false, &body)
}

/// Build an NPY v1.0 payload from a raw descr literal and body bytes.
///
/// `descr` is written verbatim, so it must already be a Python literal such
/// as `'<i2'` or `[('LST', '<f4')]`.
pub fn npy_with_descr(descr: &str, shape: &[usize], fortran_order: bool, body: &[u8]) -> Vec<u8> {
    let header = npy_header(descr, shape, fortran_order);
    let mut out = Vec::with_capacity(10 + header.len() + body.len());
    out.extend_from_slice(b"\x93NUMPY");
    out.push(1);
    out.push(0);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(body);
    out
}

/// Header dict padded with spaces and a trailing newline to a 64-byte boundary.
fn npy_header(descr: &str, shape: &[usize], fortran_order: bool) -> String {
    let shape_literal = match shape {
        [single] => format!("({},)", single),
        dims => format!(
            "({})",
            dims.iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    let mut header = format!(
        "{{'descr': {}, 'fortran_order': {}, 'shape': {}, }}",
        descr,
        if fortran_order { "True" } else { "False" },
        shape_literal
    );
    let unpadded = 10 + header.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    header.push_str(&" ".repeat(padding));
    header.push('\n');
    header
}
