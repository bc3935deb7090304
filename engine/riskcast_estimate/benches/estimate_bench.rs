use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riskcast_estimate::{assess_flooding, estimate, Domain, Factor, FloodingConditions, ScenarioInput};

fn bench_estimate(c: &mut Criterion) {
    let input = ScenarioInput::new()
        .with(Factor::InfrastructureStrength, 8.0)
        .with(Factor::SoilMoistureRetention, 7.0)
        .with(Factor::VegetationDensity, 6.0)
        .with(Factor::FloodProbability, 0.3)
        .with(Factor::RainfallFactor, 0.5);

    c.bench_function("estimate_flooding", |b| {
        b.iter(|| estimate(black_box(&input), Domain::Flooding))
    });

    let partial = ScenarioInput::new()
        .with(Factor::PredictedRainfallMm, 80.0)
        .with(Factor::WindSpeed, 140.0);
    c.bench_function("normalize_then_estimate", |b| {
        b.iter(|| estimate(&black_box(&partial).normalized(), Domain::Cyclone))
    });

    let conditions = FloodingConditions {
        predicted_rainfall_mm: 120.0,
        infrastructure_strength: 4.0,
        soil_moisture_retention: 3.5,
        vegetation_density: 5.0,
        population_density: 2400.0,
    };
    c.bench_function("assess_flooding", |b| {
        b.iter(|| assess_flooding(black_box(&conditions)))
    });
}

criterion_group!(benches, bench_estimate);
criterion_main!(benches);
