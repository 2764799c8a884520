//! Throughput benchmarks for the md5sum element.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use md5sum::buffer::Buffer;
use md5sum::digest::{DigestAlgorithm, DigestKind};
use md5sum::element::Element;
use md5sum::elements::{DataSrc, Md5Sum, NullSink};
use md5sum::metadata::Metadata;
use md5sum::observability::{ReportEntry, ReportOrigin, Reporter};
use md5sum::pipeline::Pipeline;
use std::hint::black_box;

/// A reporter that drops every entry, so only hashing is measured.
struct DiscardReporter;

impl Reporter for DiscardReporter {
    fn report(&self, _origin: &ReportOrigin<'_>, entry: &ReportEntry) {
        black_box(entry);
    }
}

const SIZES: [usize; 4] = [64, 4096, 64 * 1024, 1024 * 1024];

fn bench_digest(c: &mut Criterion) {
    for kind in DigestKind::ALL {
        let mut group = c.benchmark_group(format!("digest_{kind}"));

        for size in SIZES {
            let data = vec![0xA5u8; size];
            let algorithm = kind.algorithm();

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
                b.iter(|| black_box(algorithm.digest(black_box(data))));
            });
        }

        group.finish();
    }
}

fn bench_element_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("md5sum_process");

    for size in SIZES {
        let buffer = Buffer::from_bytes(vec![0x5Au8; size], Metadata::with_sequence(0));
        let mut element = Md5Sum::new()
            .with_silent(true)
            .with_reporter(DiscardReporter);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &buffer, |b, buffer| {
            b.iter(|| black_box(element.process(buffer.clone()).unwrap()));
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_datasrc_md5sum_nullsink");
    let total = 4 * 1024 * 1024;

    for chunk in [4096, 64 * 1024] {
        group.throughput(Throughput::Bytes(total as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut pipeline = Pipeline::new(
                    DataSrc::new(vec![0u8; total]).with_chunk_size(chunk),
                    NullSink::new(),
                );
                pipeline.add_element(Md5Sum::new().with_reporter(DiscardReporter));
                black_box(pipeline.run().unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_digest, bench_element_process, bench_pipeline);
criterion_main!(benches);
