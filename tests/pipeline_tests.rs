//! End-to-end tests: launch lines, files, and hand-built pipelines.

use md5sum::digest::{Blake3, DigestAlgorithm, Md5};
use md5sum::elements::{AppSink, FileSrc, Md5Sum, NullSink};
use md5sum::error::Error;
use md5sum::observability::MemoryReporter;
use md5sum::pipeline::Pipeline;
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file_with(content: &[u8]) -> NamedTempFile {
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(content).unwrap();
    temp.flush().unwrap();
    temp
}

#[test]
fn test_launch_line_passes_data_through() {
    let mut pipeline =
        Pipeline::parse(r#"datasrc data="hello world" chunk-size=4 ! md5sum ! appsink name=out"#)
            .unwrap();
    let out = pipeline.appsink_handle("out").unwrap();

    let stats = pipeline.run().unwrap();
    assert_eq!(stats.buffers_in, 3);
    assert_eq!(stats.buffers_out, 3);
    assert_eq!(stats.bytes_out, 11);

    let bytes: Vec<u8> = out
        .drain()
        .iter()
        .flat_map(|b| b.try_as_bytes().unwrap().to_vec())
        .collect();
    assert_eq!(bytes, b"hello world");
    assert!(out.is_eos());
}

#[test]
fn test_launch_line_silent_and_stats() {
    let mut pipeline = Pipeline::parse(
        "datasrc data=abcdef chunk-size=2 ! md5sum name=sum silent=TRUE algorithm=md5 ! nullsink",
    )
    .unwrap();
    let control = pipeline.md5sum_control("sum").unwrap();
    assert!(control.silent());

    pipeline.run().unwrap();
    assert_eq!(control.stats().buffer_count, 3);
    assert_eq!(control.stats().byte_count, 6);
}

#[test]
fn test_filesrc_blocks_are_digested() {
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let temp = temp_file_with(&content);

    let reporter = MemoryReporter::new();
    let mut pipeline = Pipeline::new(
        FileSrc::new(temp.path()).with_blocksize(4096).unwrap(),
        NullSink::new(),
    );
    pipeline.add_element(Md5Sum::new().with_reporter(reporter.clone()));

    let stats = pipeline.run().unwrap();
    assert_eq!(stats.buffers_out, 3);
    assert_eq!(stats.bytes_out, content.len() as u64);

    let records = reporter.records();
    let expected: Vec<(usize, String)> = content
        .chunks(4096)
        .map(|chunk| (chunk.len(), Md5.digest(chunk)))
        .collect();
    let actual: Vec<(usize, String)> = records.into_iter().map(|r| (r.size, r.digest)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_filesrc_from_launch_line() {
    let temp = temp_file_with(b"abc");
    let description = format!(
        r#"filesrc location="{}" ! md5sum ! appsink name=out"#,
        temp.path().display()
    );

    let mut pipeline = Pipeline::parse(&description).unwrap();
    let out = pipeline.appsink_handle("out").unwrap();
    pipeline.run().unwrap();

    assert_eq!(out.try_pull_buffer().unwrap().try_as_bytes().unwrap(), b"abc");
}

#[test]
fn test_missing_file_fails_run() {
    let mut pipeline = Pipeline::parse(
        "filesrc location=/nonexistent/md5sum/input.bin ! md5sum ! nullsink",
    )
    .unwrap();
    assert!(matches!(pipeline.run().unwrap_err(), Error::Io(_)));
}

#[test]
fn test_chained_digests_agree_on_data() {
    let md5_log = MemoryReporter::new();
    let blake3_log = MemoryReporter::new();
    let sink = AppSink::new();
    let out = sink.handle();

    let mut pipeline = Pipeline::new(
        md5sum::elements::DataSrc::new(b"The quick brown fox jumps over the lazy dog".to_vec()),
        sink,
    );
    pipeline
        .add_element(Md5Sum::new().with_name("md5").with_reporter(md5_log.clone()))
        .add_element(
            Md5Sum::new()
                .with_name("blake3")
                .with_algorithm(Blake3)
                .with_reporter(blake3_log.clone()),
        );
    pipeline.run().unwrap();

    assert_eq!(
        md5_log.records()[0].digest,
        "9e107d9d372bb6826bd81d3542a419d6"
    );
    assert_eq!(
        blake3_log.records()[0].digest,
        Blake3.digest(b"The quick brown fox jumps over the lazy dog")
    );
    assert_eq!(out.queue_len(), 1);
}

#[test]
fn test_empty_data_yields_empty_digest() {
    let reporter = MemoryReporter::new();
    let mut pipeline = Pipeline::new(md5sum::elements::DataSrc::new(Vec::new()), NullSink::new());
    pipeline.add_element(Md5Sum::new().with_reporter(reporter.clone()));

    pipeline.run().unwrap();

    let records = reporter.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].size, 0);
    assert_eq!(records[0].digest, "d41d8cd98f00b204e9800998ecf8427e");
}
