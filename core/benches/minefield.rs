use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use minegrid_core::{Difficulty, GameConfig, MineLayout, MinePlacer, Minefield, ShufflePlacer};

fn bench_placement(c: &mut Criterion) {
    let config = Difficulty::Hard.config();
    c.bench_function("place_hard", |b| {
        let mut placer = ShufflePlacer::new(99);
        b.iter(|| black_box(placer.place(config, (8, 15))));
    });
}

fn bench_flood_reveal(c: &mut Criterion) {
    // a single far-corner mine makes the first reveal flood the whole board
    let config = GameConfig::new_unchecked((16, 30), 1);
    let layout = MineLayout::from_mine_coords(config.size, &[(0, 29)]).unwrap();
    c.bench_function("flood_hard", |b| {
        b.iter(|| {
            let mut field = Minefield::from_layout(layout.clone());
            black_box(field.reveal((15, 0)).unwrap())
        });
    });
}

criterion_group!(benches, bench_placement, bench_flood_reveal);
criterion_main!(benches);
