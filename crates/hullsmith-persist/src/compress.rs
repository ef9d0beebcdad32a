use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use hullsmith_core::constants::VOXEL_BYTES;
use hullsmith_core::types::PackedBlock;
use std::io::{Read, Write};

use crate::error::{CorruptReason, PersistError};

/// Serialize words as consecutive 3-byte big-endian integers.
pub fn pack_words(blocks: &[PackedBlock]) -> Vec<u8> {
    let mut out = Vec::with_capacity(blocks.len() * VOXEL_BYTES);
    for block in blocks {
        let bytes = block.raw().to_be_bytes();
        out.extend_from_slice(&bytes[1..]);
    }
    out
}

/// Inverse of `pack_words`. Words with id 0 are normalized to empty.
pub fn unpack_words(data: &[u8]) -> Vec<PackedBlock> {
    data.chunks_exact(VOXEL_BYTES)
        .map(|b| {
            let block = PackedBlock::from_raw(u32::from_be_bytes([0, b[0], b[1], b[2]]));
            if block.is_empty() {
                PackedBlock::EMPTY
            } else {
                block
            }
        })
        .collect()
}

/// Zlib-compress a segment payload.
pub fn compress_payload(data: &[u8]) -> Result<Vec<u8>, PersistError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PersistError::Compress(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PersistError::Compress(e.to_string()))
}

/// Inflate a segment payload and unpack exactly `voxel_count` words.
pub fn decompress_payload(
    compressed: &[u8],
    voxel_count: usize,
) -> Result<Vec<PackedBlock>, CorruptReason> {
    let mut data = Vec::with_capacity(voxel_count * VOXEL_BYTES);
    ZlibDecoder::new(compressed)
        .read_to_end(&mut data)
        .map_err(|e| CorruptReason::Inflate(e.to_string()))?;

    if data.len() % VOXEL_BYTES != 0 {
        return Err(CorruptReason::PartialWord(data.len()));
    }
    let expected = voxel_count * VOXEL_BYTES;
    if data.len() != expected {
        return Err(CorruptReason::WrongSize {
            expected,
            actual: data.len(),
        });
    }
    Ok(unpack_words(&data))
}
