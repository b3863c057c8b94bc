use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chip8::{assemble, Chip8Vm};

fn criterion_benchmark(c: &mut Criterion) {
    let assembly = assemble(include_bytes!("../tests/maze.asm"), false).expect("assemble maze");

    c.bench_function("maze steps", |b| {
        let mut vm = Chip8Vm::load_assembly(&assembly).expect("load maze");

        b.iter(|| {
            for _ in 0..black_box(1000) {
                vm.step().expect("step");
            }
            vm.reset();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
