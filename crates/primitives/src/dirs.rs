use std::{fs, io, path::Path};

/// Creates `dir` and every missing parent, succeeding if it already exists.
pub fn ensure_dir_exists<P: AsRef<Path>>(dir: P) -> Result<(), io::Error> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
