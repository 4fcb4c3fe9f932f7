use crate::sampler::DayWeather;
use crate::units::clamp;

// Fluxes and end-of-day storage for one bucket day [mm]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayBalance {
    pub storage_mm: f64,
    pub etc_mm: f64,         // Crop evapotranspiration, kc * ET0
    pub inflow_mm: f64,      // Rain + irrigation
    pub percolation_mm: f64, // Drained above field capacity
}

// Advance bucket storage by one day. Inflow above field capacity drains away,
// and storage never drops below an empty bucket.
pub fn step(
    storage_mm: f64,
    weather: DayWeather,
    kc: f64,
    irrigation_mm: f64,
    field_capacity_mm: f64,
) -> DayBalance {
    let etc = kc * weather.et0_mm;
    let inflow = weather.rain_mm + irrigation_mm;
    let next_raw = storage_mm + inflow - etc;
    let percolation = (next_raw - field_capacity_mm).max(0.0);
    let next = clamp(next_raw - percolation, 0.0, field_capacity_mm);

    DayBalance {
        storage_mm: next,
        etc_mm: etc,
        inflow_mm: inflow,
        percolation_mm: percolation,
    }
}
