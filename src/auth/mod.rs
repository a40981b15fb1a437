mod extractors;

pub use extractors::*;
