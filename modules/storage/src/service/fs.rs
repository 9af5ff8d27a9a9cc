use super::Error;
use std::{io::Write, path::Path};

/// Write a file, so that it either appears completely or not at all.
///
/// The content is written to a temporary file in the target directory, synced, and then
/// renamed to the target name. An existing file is replaced.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), Error> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".ovaljson-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err)?;

    file.write_all(data).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;

    // on failure, dropping the temporary file removes it
    file.persist(path).map_err(|err| io_err(err.error))?;

    Ok(())
}
