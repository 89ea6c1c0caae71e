use embview::geometry::polygon::{classify_flat, vertices_from_flat};
use embview::{EngineConfig, PointSet, SelectionState, Vec2};
use std::time::Instant;

// Deterministic scatter in [-1, 1]^2 (xorshift)
fn scatter(n: usize) -> Vec<f32> {
    let mut s: u32 = 0x9e37_79b9;
    let mut next = || { s ^= s << 13; s ^= s >> 17; s ^= s << 5; (s as f32 / u32::MAX as f32) * 2.0 - 1.0 };
    (0..n * 2).map(|_| next()).collect()
}

// Wobbly closed loop in segment-pair layout, like a hand-drawn lasso
fn lasso(samples: usize) -> Vec<f32> {
    let mut st = SelectionState::new(PointSet::default(), &EngineConfig::default());
    for k in 0..samples {
        let t = k as f32 / samples as f32 * std::f32::consts::TAU;
        let r = 0.6 + 0.15 * (5.0 * t).sin();
        st.push_lasso_vertex(Vec2::new(r * t.cos(), r * t.sin()));
    }
    st.close_lasso();
    st.lasso().to_vec()
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let mut points = 100_000usize;
    let mut samples = 400usize;
    let mut iters = 50usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--points=") { if let Ok(v)=val.parse() { points=v; } }
        else if let Some(val)=a.strip_prefix("--lasso=") { if let Ok(v)=val.parse() { samples=v; } }
        else if let Some(val)=a.strip_prefix("--iters=") { if let Ok(v)=val.parse() { iters=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let positions = scatter(points);
    let polygon = vertices_from_flat(&lasso(samples));
    log::info!("classifying {} points against {} lasso vertices", points, polygon.len());

    let mut times_ms: Vec<f64> = Vec::with_capacity(iters);
    let mut inside = 0usize;
    for _ in 0..iters.max(1) {
        let t0 = Instant::now();
        let mask = classify_flat(&positions, &polygon);
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
        inside = mask.iter().filter(|&&m| m).count();
    }
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let threads = cfg!(feature = "threads");
    println!("points={} lasso_vertices={} threads={} inside={} median_ms={:.4} p90_ms={:.4}", points, polygon.len(), threads, inside, med, p90);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
