mod administrative;
mod functions;

pub use administrative::*;
pub use functions::*;
