use std::path::Path;

/// Default server used by every procedure when no `--url` is given.
pub const DEFAULT_URL: &str = "http://localhost:9999";

/// Loads `.env` from the crate directory, then from the working directory.
///
/// Values already present in the environment win over both files.
pub fn init() {
    let _ = dotenvy::from_path(Path::new(
        format!("{}/.env", env!("CARGO_MANIFEST_DIR")).as_str(),
    ));
    dotenvy::dotenv().ok();
}
