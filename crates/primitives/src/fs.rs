use std::{
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("The file could not be created: {0}")]
    /// The file could not be created
    UnableToCreateFile(io::Error),
    #[error("The file could not be copied: {0}")]
    /// The file could not be copied
    UnableToCopyFile(io::Error),
    #[error("The file could not be renamed: {0}")]
    /// The file could not be renamed
    UnableToRenameFile(io::Error),
    #[error("Failed to set permissions: {0}")]
    /// Failed to set permissions
    UnableToSetPermissions(io::Error),
    #[error("Failed to retrieve file metadata: {0}")]
    /// Failed to retrieve file metadata
    UnableToRetrieveMetadata(io::Error),
    #[error("Failed to write bytes to file: {0}")]
    /// Failed to write bytes to file
    UnableToWriteFile(io::Error),
}

/// Write a file atomically by using a temporary file as an intermediate.
///
/// Care is taken to preserve the permissions of the file at `file_path` being written.
///
/// If no file exists at `file_path` one will be created with restricted 0o600-equivalent
/// permissions.
pub fn write_file_via_temporary(
    file_path: &Path,
    temp_path: &Path,
    bytes: &[u8],
) -> Result<(), FsError> {
    // If the file already exists, preserve its permissions by copying it.
    // Otherwise, create a new file with restricted permissions.
    if file_path.exists() {
        fs::copy(file_path, temp_path).map_err(FsError::UnableToCopyFile)?;
        fs::write(temp_path, bytes).map_err(FsError::UnableToWriteFile)?;
    } else {
        create_with_600_perms(temp_path, bytes)?;
    }

    // With the temporary file created, perform an atomic rename.
    fs::rename(temp_path, file_path).map_err(FsError::UnableToRenameFile)?;

    Ok(())
}

/// Creates a file with `600 (-rw-------)` permissions and writes the specified bytes to file.
pub fn create_with_600_perms<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), FsError> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(FsError::UnableToCreateFile)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perm = file
            .metadata()
            .map_err(FsError::UnableToRetrieveMetadata)?
            .permissions();
        perm.set_mode(0o600);
        file.set_permissions(perm)
            .map_err(FsError::UnableToSetPermissions)?;
    }

    file.write_all(bytes).map_err(FsError::UnableToWriteFile)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_through_temporary_and_replaces() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("data.json");
        let temp = dir.path().join(".data.json.tmp");

        write_file_via_temporary(&target, &temp, b"first").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"first");
        assert!(!temp.exists());

        write_file_via_temporary(&target, &temp, b"second").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert!(!temp.exists());
    }

    #[cfg(unix)]
    #[test]
    fn new_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let target = dir.path().join("secret");
        create_with_600_perms(&target, b"key material").unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
