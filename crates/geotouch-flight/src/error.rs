use std::io;

#[derive(thiserror::Error, Debug)]
pub enum FlightError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("gazetteer entry {name:?} has an out-of-range coordinate ({lat}, {lon})")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },
}
