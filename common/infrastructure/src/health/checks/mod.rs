mod probe;

pub use probe::*;
