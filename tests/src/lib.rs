//! Fixtures shared by the cross-crate tests.

use riskcast_estimate::FloodingConditions;
use riskcast_models::FloodingFeatures;
use riskcast_records::LocationParameters;

/// Scenario text a user would type for a stored location and a rainfall
/// amount.
pub fn scenario_text(params: &LocationParameters, rainfall_mm: f64) -> String {
    format!(
        "# {}\npredicted_rainfall_mm = {rainfall_mm}\ninfrastructure_strength = {}, soil_moisture_retention = {}\nvegetation_density = {}; population_density = {}\nsoil_type = \"{}\"\n",
        params.location,
        params.infrastructure_strength,
        params.soil_moisture_retention,
        params.vegetation_density,
        params.population_density,
        params.soil_type,
    )
}

pub fn conditions(params: &LocationParameters, rainfall_mm: f64) -> FloodingConditions {
    FloodingConditions {
        predicted_rainfall_mm: rainfall_mm,
        infrastructure_strength: params.infrastructure_strength,
        soil_moisture_retention: params.soil_moisture_retention,
        vegetation_density: params.vegetation_density,
        population_density: params.population_density,
    }
}

pub fn features(params: &LocationParameters, rainfall_mm: f64) -> FloodingFeatures {
    FloodingFeatures {
        rainfall_mm,
        infrastructure_strength: params.infrastructure_strength,
        soil_moisture_retention: params.soil_moisture_retention,
        vegetation_density: params.vegetation_density,
        population_density: params.population_density,
        ..FloodingFeatures::default()
    }
}
