use crate::config::{BlobKind, IMAGE_COLS, IMAGE_ROWS, IMAGE_SIZE};
use crate::error::MnistError;
use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::MultiGzDecoder;
use ndarray::{Array1, Array3};
use std::io::{Cursor, Read};

/// Inflate a gzip-compressed blob, reading every member of the stream
pub fn decompress(kind: BlobKind, raw: &[u8]) -> Result<Vec<u8>, MnistError> {
    let mut decoder = MultiGzDecoder::new(raw);
    let mut data = Vec::new();

    decoder
        .read_to_end(&mut data)
        .map_err(|source| MnistError::Decompress { kind, source })?;

    Ok(data)
}

/// The samples following the header, after checking the header is all there
fn payload(kind: BlobKind, data: &[u8], header_size: usize) -> Result<&[u8], MnistError> {
    if data.len() < header_size {
        return Err(MnistError::Truncated {
            kind,
            len: data.len(),
            header_size,
        });
    }

    Ok(&data[header_size..])
}

/// Decode an uncompressed image blob into a stack of 28x28 grids.
/// The header is skipped, not interpreted; see `check_header` for that
pub fn decode_images(
    kind: BlobKind,
    data: &[u8],
    header_size: usize,
) -> Result<Array3<u8>, MnistError> {
    let pixels = payload(kind, data, header_size)?;

    if pixels.len() % IMAGE_SIZE != 0 {
        return Err(MnistError::Misaligned {
            kind,
            len: pixels.len(),
            stride: IMAGE_SIZE,
        });
    }

    let count = pixels.len() / IMAGE_SIZE;
    let images = Array3::from_shape_vec((count, IMAGE_ROWS, IMAGE_COLS), pixels.to_vec())?;

    Ok(images)
}

/// Decode an uncompressed label blob into a flat sequence
pub fn decode_labels(
    kind: BlobKind,
    data: &[u8],
    header_size: usize,
) -> Result<Array1<u8>, MnistError> {
    let labels = payload(kind, data, header_size)?;

    Ok(Array1::from(labels.to_vec()))
}

/// The big-endian IDX header: a magic number whose low byte is the
/// number of dimensions, followed by one u32 per dimension
#[derive(Debug, PartialEq, Eq)]
pub struct IdxHeader {
    pub magic: u32,
    pub dims: Vec<usize>,
}

impl IdxHeader {
    pub fn read(kind: BlobKind, data: &[u8]) -> Result<IdxHeader, MnistError> {
        let truncated = |header_size| MnistError::Truncated {
            kind,
            len: data.len(),
            header_size,
        };
        let mut reader = Cursor::new(data);

        let magic = reader.read_u32::<BigEndian>().map_err(|_| truncated(4))?;
        let num_dims = (magic & 0xff) as usize;
        let needed = 4 + 4 * num_dims;
        let mut dims = Vec::with_capacity(num_dims);

        for _ in 0..num_dims {
            let dim = reader.read_u32::<BigEndian>().map_err(|_| truncated(needed))?;
            dims.push(dim as usize);
        }

        Ok(IdxHeader { magic, dims })
    }
}

/// Check the header against what the kind should hold and
/// the number of items that were actually decoded
pub fn check_header(kind: BlobKind, data: &[u8], items: usize) -> Result<(), MnistError> {
    let header = IdxHeader::read(kind, data)?;

    if header.magic != kind.magic() {
        return Err(MnistError::BadMagic {
            kind,
            found: header.magic,
            expected: kind.magic(),
        });
    }

    // the magic fixes the dimension count, so dims[0] exists
    if header.dims[0] != items {
        return Err(MnistError::CountMismatch {
            kind,
            declared: header.dims[0],
            actual: items,
        });
    }

    if kind.is_images() && (header.dims[1] != IMAGE_ROWS || header.dims[2] != IMAGE_COLS) {
        return Err(MnistError::BadDimensions {
            kind,
            rows: header.dims[1],
            cols: header.dims[2],
        });
    }

    Ok(())
}
