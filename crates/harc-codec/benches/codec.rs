//! Benchmarks for decode, encode and print throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use harc_codec::traits::InstructionDecoder;
use harc_codec::x86_64::{self, FormatterConfig, Instruction, X86_64Decoder};
use harc_core::AssemblySyntax;

/// A small function mixing moves, arithmetic, branches and memory operands.
const X86_64_CODE: &[u8] = &[
    0x55, // push rbp
    0x48, 0x89, 0xe5, // mov rbp, rsp
    0x48, 0x83, 0xec, 0x20, // sub rsp, 0x20
    0x48, 0x89, 0x7d, 0xf8, // mov [rbp-8], rdi
    0x48, 0x8b, 0x45, 0xf8, // mov rax, [rbp-8]
    0x48, 0x83, 0xc0, 0x01, // add rax, 1
    0x48, 0x89, 0x45, 0xf0, // mov [rbp-16], rax
    0x48, 0x83, 0x7d, 0xf0, 0x0a, // cmp qword [rbp-16], 10
    0x7e, 0x07, // jle .L1
    0xb8, 0x01, 0x00, 0x00, 0x00, // mov eax, 1
    0xeb, 0x05, // jmp .L2
    0xb8, 0x00, 0x00, 0x00, 0x00, // .L1: mov eax, 0
    0xc5, 0xf8, 0x58, 0xc2, // .L2: vaddps xmm0, xmm0, xmm2
    0x62, 0xf1, 0x7c, 0xc9, 0x58, 0xc2, // vaddps zmm0{k1}{z}, zmm0, zmm2
    0x48, 0x83, 0xc4, 0x20, // add rsp, 0x20
    0x5d, // pop rbp
    0xc3, // ret
];

fn generate_large_x86_64_block(size: usize) -> Vec<u8> {
    let mut result = Vec::with_capacity(size + X86_64_CODE.len());
    while result.len() < size {
        result.extend_from_slice(X86_64_CODE);
    }
    result
}

fn decode_all(code: &[u8]) -> Vec<Instruction> {
    let mut insns = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        match x86_64::try_decode(&code[offset..]) {
            Ok(decoded) => {
                insns.push(decoded.instruction);
                offset += decoded.size;
            }
            Err(_) => offset += 1,
        }
    }
    insns
}

fn bench_decode(c: &mut Criterion) {
    let decoder = X86_64Decoder::new();
    let mut group = c.benchmark_group("x86_64_decode");

    group.bench_function("single_instruction", |b| {
        b.iter(|| x86_64::try_decode(black_box(&X86_64_CODE[1..4])))
    });

    group.bench_function("small_function", |b| {
        b.iter(|| decoder.decode_block(black_box(X86_64_CODE)))
    });

    for size in [1024, 4096, 16384, 65536] {
        let code = generate_large_x86_64_block(size);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("throughput", size), &code, |b, code| {
            b.iter(|| decoder.decode_block(black_box(code)))
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let insns = decode_all(&generate_large_x86_64_block(4096));
    let mut group = c.benchmark_group("x86_64_encode");

    group.bench_function("single_instruction", |b| {
        b.iter(|| x86_64::encode(black_box(&insns[1])))
    });

    group.throughput(Throughput::Elements(insns.len() as u64));
    group.bench_function("block", |b| {
        b.iter(|| x86_64::encode_block(black_box(&insns)))
    });

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let insns = decode_all(X86_64_CODE);
    let mut group = c.benchmark_group("x86_64_format");
    group.throughput(Throughput::Elements(insns.len() as u64));

    for syntax in [AssemblySyntax::Intel, AssemblySyntax::Att] {
        let config = FormatterConfig::new(syntax).with_address(0x1000);
        group.bench_with_input(BenchmarkId::new("small_function", syntax), &config, |b, config| {
            b.iter(|| {
                for insn in &insns {
                    black_box(x86_64::format(insn, config));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_format);
criterion_main!(benches);
