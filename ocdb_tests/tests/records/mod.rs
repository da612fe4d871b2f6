pub mod corruption;
pub mod helpers;
pub mod roundtrip;
pub mod scenario;
pub mod sparse_map;
