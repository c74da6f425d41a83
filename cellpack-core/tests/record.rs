use cellpack_core::manifest::Sizes;
use cellpack_core::source::{discover, ByteSource, FileSource, MemorySource};
use cellpack_core::{build, build_all, rebuild, CodecConfig, CodecError, FileRecord};
use std::fs;

#[test]
fn build_from_file_keeps_payload_and_name() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("temp");
    fs::write(&path, b"temp").unwrap();

    let packed = build(&FileSource::new(&path), &CodecConfig::default()).unwrap();
    assert_eq!(packed.record.name, "temp");
    assert_eq!(packed.record.payload.as_deref(), Some(&b"temp"[..]));
    // "temp" = 0x74656d70
    assert_eq!(packed.grid.to_rows(), vec![vec!["1952804208".to_string()]]);
    assert_eq!(packed.record.sizes, Sizes { declared: 4, numeric: 10, encoded: 10 });
    assert_eq!(packed.record.sizes, packed.manifest.sizes);

    let meta = packed.metadata();
    assert_eq!(meta.name, "temp");
    assert_eq!(meta.chunk_count, 1);

    let rec = rebuild(&meta, &packed.grid.to_rows(), &CodecConfig::default()).unwrap();
    assert_eq!(rec.name, "temp");
    assert_eq!(rec.payload.as_deref(), Some(&b"temp"[..]));
}

#[test]
fn build_reports_capacity_exceeded() {
    let cfg = CodecConfig::new(1, 1, 2).unwrap();
    let err = build(&MemorySource::new("x", vec![0xffu8]), &cfg).unwrap_err();
    assert!(matches!(err, CodecError::CapacityExceeded { chunks: 3, capacity: 2 }), "{err}");
}

#[test]
fn build_missing_file_is_io_error() {
    let td = tempfile::tempdir().unwrap();
    let err = build(&FileSource::new(td.path().join("nope")), &CodecConfig::default()).unwrap_err();
    assert!(matches!(err, CodecError::Io(_)), "{err}");
}

#[test]
fn empty_file_round_trips() {
    let packed = build(&MemorySource::new("empty", Vec::new()), &CodecConfig::default()).unwrap();
    assert_eq!(packed.manifest.chunk_count, 0);
    assert!(packed.grid.is_empty());
    let rec = rebuild(&packed.metadata(), &[], &CodecConfig::default()).unwrap();
    assert_eq!(rec.payload, Some(Vec::new()));
    assert_eq!(rec.sizes, Sizes::default());
}

#[test]
fn discover_names_files_relative_to_root() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("a.bin"), vec![1u8; 10]).unwrap();
    fs::write(root.join("sub").join("b.bin"), vec![2u8; 20]).unwrap();

    let sources = discover(root).unwrap();
    let names: Vec<String> = sources.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["a.bin".to_string(), "sub/b.bin".to_string()]);
    assert_eq!(sources[1].read().unwrap(), vec![2u8; 20]);
}

#[test]
fn build_all_keeps_input_order() {
    let sources: Vec<MemorySource> = (0..8u8)
        .map(|i| MemorySource::new(format!("f{i}"), vec![i; i as usize + 1]))
        .collect();
    let cfg = CodecConfig::new(5, 10, 4).unwrap();
    let built = build_all(&sources, &cfg);
    assert_eq!(built.len(), sources.len());
    for (src, res) in sources.iter().zip(built) {
        let packed = res.unwrap();
        assert_eq!(packed.record.name, src.name);
        let rec = rebuild(&packed.metadata(), &packed.grid.to_rows(), &cfg).unwrap();
        assert_eq!(rec.payload.as_ref(), Some(&src.bytes));
    }
}

#[test]
fn listing_entry_then_attach_payload() {
    let packed = build(&MemorySource::new("doc", b"hello sheets".to_vec()), &CodecConfig::default())
        .unwrap();
    let props = packed.metadata().to_properties();

    let mut rec = FileRecord::from_listing("sheet-1", "doc", None, Vec::new(), &props).unwrap();
    assert_eq!(rec.id.as_deref(), Some("sheet-1"));
    assert!(!rec.has_payload());
    assert_eq!(rec.sizes, packed.record.sizes);

    let err = rec.attach_payload(b"hello sheets!".to_vec()).unwrap_err();
    assert!(matches!(err, CodecError::Metadata(_)), "{err}");
    assert!(!rec.has_payload());

    rec.attach_payload(b"hello sheets".to_vec()).unwrap();
    assert_eq!(rec.payload.as_deref(), Some(&b"hello sheets"[..]));
}

#[test]
fn listing_entry_without_sizes_is_rejected() {
    let props = std::collections::BTreeMap::new();
    let err = FileRecord::from_listing("id", "name", None, Vec::new(), &props).unwrap_err();
    assert!(matches!(err, CodecError::Metadata(_)), "{err}");
}

#[test]
fn from_payload_measures_sizes() {
    let rec = FileRecord::from_payload("p", vec![0, 0x01, 0x02, 0x03]);
    assert_eq!(rec.sizes, Sizes { declared: 4, numeric: 5, encoded: 5 });
}

#[test]
fn config_from_json_with_defaults() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("cellpack.json");
    fs::write(&path, r#"{ "chunk_length_bound": 1000 }"#).unwrap();
    let cfg = CodecConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.chunk_length_bound, 1000);
    assert_eq!(cfg.max_rows, CodecConfig::default().max_rows);
    assert_eq!(cfg.max_columns, 26);

    fs::write(&path, r#"{ "max_rows": 0 }"#).unwrap();
    assert!(matches!(CodecConfig::from_json_file(&path), Err(CodecError::Config(_))));
    fs::write(&path, "not json").unwrap();
    assert!(matches!(CodecConfig::from_json_file(&path), Err(CodecError::Config(_))));
}
