// Conversions between display moisture percent and stored water depth [mm].
// 0 % sits at the wilting point, 100 % at field capacity.

pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(x))
}

// Stored water [mm] for a moisture percent inside the bucket's operating range
pub fn storage_from_moisture_pct(moisture_pct: f64, wp: f64, fc: f64) -> f64 {
    let pct = clamp(moisture_pct, 0.0, 100.0);
    let storage = wp + (pct / 100.0) * (fc - wp);
    clamp(storage, 0.0, fc)
}

// Moisture percent for a stored water depth [mm]; a collapsed bucket (fc <= wp) reads as 0 %
pub fn moisture_pct_from_storage(storage_mm: f64, wp: f64, fc: f64) -> f64 {
    if fc <= wp {
        return 0.0;
    }
    let pct = 100.0 * (storage_mm - wp) / (fc - wp);
    clamp(pct, 0.0, 100.0)
}
