use criterion::*;
use geo_types::{Coordinate, Line, Rect};
use planar_crossings::{IntersectionAlgorithm, PlanarCrossings};
use rand::{thread_rng, Rng};
use rand_distr::Standard;

const BBOX: [f64; 2] = [1024., 1024.];

#[inline]
fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

#[inline]
fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

#[inline]
fn uniform_line_with_length<R: Rng>(rng: &mut R, bounds: Rect<f64>, length: f64) -> Line<f64> {
    let start = uniform_point(rng, bounds);
    let shift: [f64; 2] = rng.sample(Standard);
    Line::new(
        start,
        Coordinate {
            x: start.x + (2. * shift[0] - 1.) * length,
            y: start.y + (2. * shift[1] - 1.) * length,
        },
    )
}

fn solver(algorithm: IntersectionAlgorithm, lines: &[Line<f64>]) -> PlanarCrossings {
    let mut plane = PlanarCrossings::new();
    plane.config_mut().intersection = algorithm;
    for line in lines {
        plane.add_segment(*line);
    }
    plane
}

fn length_lc(c: &mut Criterion) {
    const NUM_LINES: usize = 512;

    let bbox: Rect<f64> = Rect::new([0., 0.], BBOX);
    let line_len = BBOX[0] / 5.;

    let lines: Vec<_> = (0..NUM_LINES)
        .map(|_| uniform_line_with_length(&mut thread_rng(), bbox, line_len))
        .collect();

    c.bench_function("Bentley-Ottmann - short random lines", |b| {
        let mut plane = solver(IntersectionAlgorithm::BentleyOttmann, &lines);
        b.iter(|| {
            let _ = black_box(plane.solve());
        })
    });
    c.bench_function("Brute-force - short random lines", |b| {
        let mut plane = solver(IntersectionAlgorithm::BruteForce, &lines);
        b.iter(|| {
            let _ = black_box(plane.solve());
        })
    });
}

fn uniform_lc(c: &mut Criterion) {
    const NUM_LINES: usize = 512;
    let bbox: Rect<f64> = Rect::new([0., 0.], BBOX);

    let lines: Vec<_> = (0..NUM_LINES)
        .map(|_| uniform_line(&mut thread_rng(), bbox))
        .collect();

    c.bench_function("Bentley-Ottmann - uniform random lines", |b| {
        let mut plane = solver(IntersectionAlgorithm::BentleyOttmann, &lines);
        b.iter(|| {
            let _ = black_box(plane.solve());
        })
    });
    c.bench_function("Brute-force - uniform random lines", |b| {
        let mut plane = solver(IntersectionAlgorithm::BruteForce, &lines);
        b.iter(|| {
            let _ = black_box(plane.solve());
        })
    });
}

criterion_group!(random, uniform_lc, length_lc);
criterion_main!(random);
