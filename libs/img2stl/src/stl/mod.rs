//! Binary STL serialization.
//!
//! Layout, all little-endian:
//!
//! ```text
//! [0..80)    header, name bytes zero padded
//! [80..84)   u32 triangle count N
//! then N records of 50 bytes:
//!            normal  3 x f32
//!            v0 v1 v2 3 x f32 each
//!            u16 attribute byte count, always 0
//! ```

use std::io::{self, Write};

use config::constants::{binary_stl_len, STL_HEADER_LEN, STL_PREAMBLE_BYTES, STL_TRIANGLE_BYTES};
use glam::DVec3;

use crate::error::{ConvertError, Result};
use crate::mesh::{StlModel, Triangle};

/// Encodes `name` into the 80-byte header.
///
/// Non-ASCII characters become `?`; longer names are truncated.
///
/// # Examples
/// ```
/// use img2stl::stl::encode_header;
///
/// let header = encode_header("logo");
/// assert_eq!(&header[..4], b"logo");
/// assert!(header[4..].iter().all(|&b| b == 0));
/// ```
pub fn encode_header(name: &str) -> [u8; STL_HEADER_LEN] {
    let mut header = [0u8; STL_HEADER_LEN];
    let bytes = name.chars().map(|c| if c.is_ascii() { c as u8 } else { b'?' });
    for (slot, byte) in header.iter_mut().zip(bytes) {
        *slot = byte;
    }
    header
}

impl StlModel {
    /// Writes the model as binary STL.
    ///
    /// # Errors
    /// Propagates sink errors, and rejects models with more than `u32::MAX`
    /// triangles.
    pub fn write_binary<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let count = record_count(self.triangles.len())?;

        writer.write_all(&encode_header(&self.name))?;
        writer.write_all(&count.to_le_bytes())?;

        let mut record = [0u8; STL_TRIANGLE_BYTES];
        for triangle in &self.triangles {
            encode_triangle(triangle, &mut record);
            writer.write_all(&record)?;
        }
        writer.flush()
    }

    /// Serializes the model into a new byte vector of exactly
    /// `84 + 50 * N` bytes.
    ///
    /// # Errors
    /// Fails like [`StlModel::write_binary`] when the triangle count does not
    /// fit the format.
    ///
    /// # Examples
    /// ```
    /// use img2stl::{StlModel, Triangle};
    /// use glam::DVec3;
    ///
    /// let model = StlModel::new("tri", vec![Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y)]);
    /// let bytes = model.to_binary_bytes().unwrap();
    /// assert_eq!(bytes.len(), 134);
    /// assert_eq!(&bytes[80..84], &1u32.to_le_bytes());
    /// ```
    pub fn to_binary_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(binary_stl_len(self.triangles.len()));
        self.write_binary(&mut bytes)?;
        Ok(bytes)
    }
}

/// The on-disk triangle count, or an error past `u32::MAX`.
fn record_count(triangles: usize) -> io::Result<u32> {
    u32::try_from(triangles).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "binary STL holds at most u32::MAX triangles",
        )
    })
}

/// Fills one 50-byte triangle record.
fn encode_triangle(triangle: &Triangle, record: &mut [u8; STL_TRIANGLE_BYTES]) {
    let normal = triangle.normal();
    let vectors = [normal, triangle.vertices[0], triangle.vertices[1], triangle.vertices[2]];
    for (i, v) in vectors.iter().enumerate() {
        let base = i * 12;
        for (j, component) in v.to_array().iter().enumerate() {
            let offset = base + j * 4;
            record[offset..offset + 4].copy_from_slice(&(*component as f32).to_le_bytes());
        }
    }
    record[48..50].copy_from_slice(&0u16.to_le_bytes());
}

/// Decodes a binary STL produced by [`StlModel::write_binary`] or any other
/// writer of the format.
///
/// The stored normals are ignored; [`Triangle::normal`] recomputes them. The
/// header is read up to its first zero byte.
///
/// # Errors
/// Returns [`ConvertError::InvalidStl`] when the data is shorter than the
/// preamble or its length disagrees with the declared triangle count.
pub fn read_binary_stl(bytes: &[u8]) -> Result<StlModel> {
    if bytes.len() < STL_PREAMBLE_BYTES {
        return Err(ConvertError::invalid_stl(format!(
            "need at least {STL_PREAMBLE_BYTES} bytes, got {}",
            bytes.len()
        )));
    }

    let header = &bytes[..STL_HEADER_LEN];
    let name_len = header.iter().position(|&b| b == 0).unwrap_or(STL_HEADER_LEN);
    let name = String::from_utf8_lossy(&header[..name_len]).into_owned();

    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    let expected = count
        .checked_mul(STL_TRIANGLE_BYTES)
        .and_then(|n| n.checked_add(STL_PREAMBLE_BYTES))
        .ok_or_else(|| ConvertError::invalid_stl(format!("triangle count {count} overflows")))?;
    if bytes.len() != expected {
        return Err(ConvertError::invalid_stl(format!(
            "{count} triangles need {expected} bytes, got {}",
            bytes.len()
        )));
    }

    let triangles = bytes[STL_PREAMBLE_BYTES..]
        .chunks_exact(STL_TRIANGLE_BYTES)
        .map(|record| {
            // skip the stored normal at offset 0
            Triangle::new(
                read_vec3(record, 12),
                read_vec3(record, 24),
                read_vec3(record, 36),
            )
        })
        .collect();

    Ok(StlModel::new(name, triangles))
}

/// Reads the stored normal of triangle `index` without decoding the rest.
///
/// Returns `None` when the record is out of range.
pub fn stored_normal(bytes: &[u8], index: usize) -> Option<DVec3> {
    let start = STL_PREAMBLE_BYTES + index * STL_TRIANGLE_BYTES;
    let record = bytes.get(start..start + STL_TRIANGLE_BYTES)?;
    Some(read_vec3(record, 0))
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn read_vec3(data: &[u8], offset: usize) -> DVec3 {
    DVec3::new(
        f64::from(read_f32(data, offset)),
        f64::from(read_f32(data, offset + 4)),
        f64::from(read_f32(data, offset + 8)),
    )
}
