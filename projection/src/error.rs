use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("unsupported coordinate reference system EPSG:{0}")]
    Unsupported(u32),

    #[error("invalid CRS identifier {0:?}")]
    Parse(String),

    #[error("projection produced a non-finite coordinate from ({0}, {1})")]
    NonFinite(f64, f64),
}
