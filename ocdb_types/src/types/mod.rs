mod object;

mod factory;
mod streamers;

mod arrayl64;
mod base;
mod map;
mod objarray;
mod objstring;


pub use object::*;

pub use factory::*;
pub use streamers::*;

pub use arrayl64::*;
pub use base::*;
pub use map::*;
pub use objarray::*;
pub use objstring::*;
