use std::env;
use std::path::PathBuf;

/// The parent of scratch dirs that tests and tools write containers into.
pub const ENV_VAR_PARENT_DIR: &str = "OCDB_PARENT_DIR";

pub fn default_scratch_dir(name: &str) -> PathBuf {
    let parent_dir_path = env::var(ENV_VAR_PARENT_DIR)
        .map_or_else(|_| env::temp_dir().join("ocdb"), PathBuf::from);
    parent_dir_path.join(name)
}
