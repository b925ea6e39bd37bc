mod load;
mod types;

pub use load::{
    apply_env_overrides, default_search_paths, expand_path, load, load_from_path,
    load_with_source, validate, CONFIG_FILE_NAME,
};
pub use types::*;
