use backend::{FFT64, FourierPoly, reim_addmul};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use rand_core::RngCore;
use sampling::source::Source;

fn bench_fft_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("negacyclic_product_fft64");

    fn runner(log_n: usize) -> impl FnMut() {
        let n: usize = 1 << log_n;
        let table: FFT64 = FFT64::new(n);
        let mut source: Source = Source::new([0u8; 32]);

        let a: Vec<u32> = (0..n).map(|_| source.next_u32()).collect();
        let b: Vec<i64> = (0..n).map(|_| (source.next_u32() & 63) as i64 - 32).collect();

        let mut a_dft: FourierPoly = FourierPoly::alloc(n);
        let mut b_dft: FourierPoly = FourierPoly::alloc(n);
        let mut c_dft: FourierPoly = FourierPoly::alloc(n);
        let mut res: Vec<u32> = vec![0; n];

        move || {
            table.forward_torus(&mut a_dft, &a);
            table.forward_i64(&mut b_dft, &b);
            c_dft.zero();
            reim_addmul(&mut c_dft, &a_dft, &b_dft);
            table.backward_torus(&mut res, &mut c_dft);
            black_box(&res);
        }
    }

    for log_n in [9usize, 10, 11] {
        let id = BenchmarkId::new("n", 1 << log_n);
        let mut runner = runner(log_n);
        group.bench_with_input(id, &log_n, |b, _| b.iter(&mut runner));
    }

    group.finish();
}

criterion_group!(benches, bench_fft_product);
criterion_main!(benches);
