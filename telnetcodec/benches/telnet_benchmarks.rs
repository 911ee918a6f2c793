//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Benchmarks for telnetcodec performance

use bytes::BytesMut;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rconsole_telnetcodec::{
    Decoded, TelnetArgument, TelnetCodec, TelnetFrame, TelnetOption, consts, decode_command, naws,
};
use std::hint::black_box;
use tokio_util::codec::{Decoder, Encoder};

// ============================================================================
// Decoding Benchmarks
// ============================================================================

fn bench_decode_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_command");

    let negotiation = [consts::IAC, consts::WILL, consts::option::LINEMODE];
    group.bench_function("negotiation", |b| {
        b.iter(|| decode_command(black_box(&negotiation)));
    });

    let mut slc = vec![
        consts::IAC,
        consts::SB,
        consts::option::LINEMODE,
        consts::option::linemode::SLC,
    ];
    for function in 1..=18u8 {
        slc.extend_from_slice(&[function, 2, function + 0x40]);
    }
    slc.extend_from_slice(&[consts::IAC, consts::SE]);
    group.bench_function("slc_subnegotiation", |b| {
        b.iter(|| decode_command(black_box(&slc)));
    });

    group.bench_function("incomplete_subnegotiation", |b| {
        let truncated = &slc[..slc.len() - 1];
        b.iter(|| matches!(decode_command(black_box(truncated)), Decoded::Incomplete));
    });

    group.finish();
}

fn bench_decode_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_stream");

    for size in [10, 100, 1000, 10000] {
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let data: Vec<u8> = (0..size)
                .map(|i| if i % 64 == 63 { consts::IAC } else { b'a' + (i % 26) as u8 })
                .flat_map(|byte| {
                    if byte == consts::IAC {
                        vec![consts::IAC, consts::IAC]
                    } else {
                        vec![byte]
                    }
                })
                .collect();
            let mut codec = TelnetCodec::new();

            b.iter(|| {
                let mut buffer = BytesMut::from(&data[..]);
                while let Some(event) = codec.decode(&mut buffer).unwrap() {
                    black_box(event);
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    group.bench_function("negotiation", |b| {
        let mut codec = TelnetCodec::new();
        let mut buffer = BytesMut::with_capacity(64);
        b.iter(|| {
            buffer.clear();
            codec
                .encode(black_box(TelnetFrame::do_(TelnetOption::NAWS)), &mut buffer)
                .unwrap();
        });
    });

    group.bench_function("naws_subnegotiation", |b| {
        let mut codec = TelnetCodec::new();
        let mut buffer = BytesMut::with_capacity(64);
        let frame = TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(
            naws::WindowSize::new(0xFF, 0xFF),
        ));
        b.iter(|| {
            buffer.clear();
            codec.encode(black_box(frame.clone()), &mut buffer).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode_command, bench_decode_stream, bench_encode);
criterion_main!(benches);
