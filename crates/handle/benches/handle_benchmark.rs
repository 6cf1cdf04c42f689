use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use shared_handle::SharedHandle;
use std::rc::Rc;

#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

const CLONES: usize = 100;

pub fn handle_benchmark(c: &mut Criterion) {
    c.bench_function("handle clone and drop", |b| {
        let handle = SharedHandle::new([0u64; 8]);
        b.iter(|| {
            let clones: Vec<_> = (0..CLONES).map(|_| handle.clone()).collect();
            black_box(clones);
        })
    });
    c.bench_function("rc clone and drop", |b| {
        let rc = Rc::new([0u64; 8]);
        b.iter(|| {
            let clones: Vec<_> = (0..CLONES).map(|_| rc.clone()).collect();
            black_box(clones);
        })
    });
    c.bench_function("handle new and drop", |b| {
        b.iter(|| black_box(SharedHandle::new(black_box([0u64; 8]))))
    });
    c.bench_function("rc new and drop", |b| {
        b.iter(|| black_box(Rc::new(black_box([0u64; 8]))))
    });
    c.bench_function("handle assign", |b| {
        let source = SharedHandle::new(String::from("source"));
        b.iter_batched(
            || SharedHandle::new(String::from("target")),
            |mut target| {
                SharedHandle::assign(&mut target, &source);
                target
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, handle_benchmark);
criterion_main!(benches);
