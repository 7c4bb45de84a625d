pub mod audio;
pub mod encode;
pub mod spectrum;

pub use spectrum::{
    create, Backend, BandScale, FrequencyBand, SpectrumConfig, SpectrumError, SpectrumMethod,
    DEFAULT_CAPACITY,
};
