use cellpack_core::encode::Encoder;
use cellpack_core::layout::{column_letters, layout, unlayout};
use cellpack_core::manifest::{Chunk, Manifest};
use cellpack_core::{CodecConfig, CodecError};

fn chunks(n: usize) -> Vec<Chunk> {
    (0..n).map(|i| Chunk { index: i as u64, content: format!("{}", i + 1) }).collect()
}

fn manifest_for(n: u64) -> Manifest {
    let mut m = Encoder::new(1).unwrap().encode(&[1]).manifest;
    m.chunk_count = n;
    m
}

fn columns(n: usize) -> CodecConfig {
    CodecConfig::new(4, 10, n).unwrap()
}

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
}

#[test]
fn fills_row_major_with_partial_last_row() {
    let cfg = CodecConfig::new(4, 3, 3).unwrap();
    let grid = layout(&chunks(7), &cfg).unwrap();
    assert_eq!(grid.len(), 7);
    assert_eq!(grid.capacity(), 9);
    assert_eq!(grid.used_rows(), 3);
    assert_eq!(grid.position(4), (1, 1));
    assert_eq!(grid.cell(1, 1), Some("5"));
    assert_eq!(grid.cell(2, 1), None);
    assert_eq!(grid.cell(0, 3), None);
    assert_eq!(grid.to_rows(), rows(&[&["1", "2", "3"], &["4", "5", "6"], &["7"]]));
    assert_eq!(grid.a1_range().as_deref(), Some("A1:C3"));
}

#[test]
fn capacity_boundary() {
    // 2-digit chunks in a 2x3 grid hold exactly 12 digits
    let cfg = CodecConfig::new(2, 2, 3).unwrap();
    let enc = Encoder::from_config(&cfg).unwrap();

    let fits = enc.encode(&100_000_000_000u64.to_be_bytes());
    assert_eq!(fits.manifest.sizes.numeric, 12);
    assert_eq!(fits.chunks.len(), 6);
    let grid = layout(&fits.chunks, &cfg).unwrap();
    assert_eq!(grid.len(), grid.capacity());

    let over = enc.encode(&1_000_000_000_000u64.to_be_bytes());
    assert_eq!(over.chunks.len(), 7);
    let err = layout(&over.chunks, &cfg).unwrap_err();
    assert!(matches!(err, CodecError::CapacityExceeded { chunks: 7, capacity: 6 }), "{err}");
}

#[test]
fn layout_rejects_out_of_order_chunks() {
    let cfg = CodecConfig::new(4, 3, 3).unwrap();
    let mut cs = chunks(3);
    cs.swap(0, 2);
    assert!(matches!(layout(&cs, &cfg), Err(CodecError::MalformedChunk { index: 0, .. })));
}

#[test]
fn unlayout_reads_ragged_rows() {
    let data = rows(&[&["1", "2", "3"], &["4"]]);
    let out = unlayout(&data, &manifest_for(4), &columns(3)).unwrap();
    assert_eq!(out, chunks(4));
}

#[test]
fn unlayout_ignores_trailing_empty_cells() {
    let data = rows(&[&["1", "2"], &["3", ""], &["", ""]]);
    let out = unlayout(&data, &manifest_for(3), &columns(2)).unwrap();
    assert_eq!(out, chunks(3));
}

#[test]
fn unlayout_count_mismatch() {
    let data = rows(&[&["1", "2"], &["3"]]);
    let err = unlayout(&data, &manifest_for(4), &columns(2)).unwrap_err();
    assert!(matches!(err, CodecError::ChunkCountMismatch { declared: 4, found: 3 }), "{err}");
    let err = unlayout(&data, &manifest_for(2), &columns(2)).unwrap_err();
    assert!(matches!(err, CodecError::ChunkCountMismatch { declared: 2, found: 3 }), "{err}");
}

#[test]
fn unlayout_rejects_gap_before_last_chunk() {
    // short middle row: a cell went missing
    let data = rows(&[&["1", "2", "3"], &["4"], &["5", "6", "7"]]);
    let err = unlayout(&data, &manifest_for(7), &columns(3)).unwrap_err();
    assert!(matches!(err, CodecError::MalformedChunk { index: 4, .. }), "{err}");
}

#[test]
fn unlayout_rejects_non_digit_cell() {
    let data = rows(&[&["1", "2a"]]);
    let err = unlayout(&data, &manifest_for(2), &columns(2)).unwrap_err();
    assert!(matches!(err, CodecError::MalformedChunk { index: 1, .. }), "{err}");
}

#[test]
fn unlayout_rejects_cells_outside_the_grid() {
    let wide = rows(&[&["1", "2", "3"]]);
    let err = unlayout(&wide, &manifest_for(3), &columns(2)).unwrap_err();
    assert!(matches!(err, CodecError::MalformedChunk { index: 2, .. }), "{err}");

    // trailing empties past the last column are harmless
    let padded = rows(&[&["1", "2", ""]]);
    assert_eq!(unlayout(&padded, &manifest_for(2), &columns(2)).unwrap(), chunks(2));

    let tall = CodecConfig::new(4, 1, 2).unwrap();
    let data = rows(&[&["1", "2"], &["3"]]);
    let err = unlayout(&data, &manifest_for(3), &tall).unwrap_err();
    assert!(matches!(err, CodecError::MalformedChunk { index: 2, .. }), "{err}");
}

#[test]
fn empty_grid_for_empty_payload() {
    let cfg = CodecConfig::default();
    let grid = layout(&[], &cfg).unwrap();
    assert!(grid.is_empty());
    assert!(grid.to_rows().is_empty());
    assert_eq!(grid.a1_range(), None);
    assert!(unlayout(&[], &manifest_for(0), &cfg).unwrap().is_empty());
}

#[test]
fn column_names() {
    assert_eq!(column_letters(0), "A");
    assert_eq!(column_letters(25), "Z");
    assert_eq!(column_letters(26), "AA");
    assert_eq!(column_letters(27), "AB");
    assert_eq!(column_letters(701), "ZZ");
    assert_eq!(column_letters(702), "AAA");
}
