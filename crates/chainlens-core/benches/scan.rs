use chainlens_core::{LocalConfig, Settings, scan, validate_text};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn large_config(entry_count: usize) -> String {
    let mut out = String::with_capacity(entry_count * 96);
    out.push_str("export const chains = {\n");
    for i in 0..entry_count {
        let chain_id = if i % 3 == 0 { 1 } else { 900_000 + i };
        out.push_str(&format!(
            "  chain{i}: {{ name: 'chain{i}', chainId: {chain_id}, rpc: 'http://localhost' }},\n"
        ));
    }
    out.push_str("};\n");
    out
}

fn bench_scan(c: &mut Criterion) {
    let text = large_config(10_000);
    c.bench_function("scan/10k_references", |b| {
        b.iter(|| black_box(scan(black_box(&text)).count()))
    });
}

fn bench_validate(c: &mut Criterion) {
    let text = large_config(10_000);
    let local = LocalConfig::empty();
    let cap = Settings::default().max_number_of_problems;
    c.bench_function("validate/default_cap", |b| {
        b.iter(|| black_box(validate_text(black_box(&text), cap, &local).len()))
    });
}

criterion_group!(benches, bench_scan, bench_validate);
criterion_main!(benches);
