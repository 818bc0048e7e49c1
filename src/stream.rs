//! Opening list inputs and committing rule outputs.
//!
//! A path of `-` means stdin or stdout. Gzip inputs are detected by their
//! magic bytes and decompressed on the fly, including files made of
//! several concatenated gzip members. File outputs are written to a
//! temporary sibling and renamed into place on commit, so a failed pass
//! never leaves a truncated rule file behind.

use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// Path that stands for stdin or stdout.
pub const STDIO_PATH: &str = "-";

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check whether a path refers to stdin/stdout.
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

/// Open a list for reading.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let mut reader = BufReader::new(File::open(path)?);
    if is_gzip(reader.fill_buf()?) {
        log::debug!("Reading gzip-compressed list: {:?}", path);
        return Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))));
    }

    Ok(Box::new(reader))
}

/// Check if data starts with the gzip magic.
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= GZIP_MAGIC.len() && data[..GZIP_MAGIC.len()] == GZIP_MAGIC
}

/// Destination for canonical rule lines.
pub enum Output {
    /// Standard output
    Stdout(BufWriter<io::Stdout>),
    /// File written through a temporary path
    File {
        path: PathBuf,
        temp_path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl Output {
    /// Create an output for `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if is_stdio(path) {
            return Ok(Output::Stdout(BufWriter::new(io::stdout())));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        let writer = BufWriter::new(File::create(&temp_path)?);

        Ok(Output::File {
            path: path.to_path_buf(),
            temp_path,
            writer,
        })
    }

    /// Flush everything and move file output into place.
    pub fn commit(self) -> Result<()> {
        match self {
            Output::Stdout(mut writer) => {
                writer.flush()?;
            }
            Output::File {
                path,
                temp_path,
                writer,
            } => {
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                file.sync_all()?;
                drop(file);
                // Atomic rename
                fs::rename(&temp_path, &path)?;
            }
        }
        Ok(())
    }

    /// Remove the temporary file of an output that will not be committed.
    pub fn discard(self) {
        if let Output::File { temp_path, writer, .. } = self {
            drop(writer);
            let _ = fs::remove_file(&temp_path);
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Read;

    #[test]
    fn test_is_gzip() {
        assert!(is_gzip(&[0x1f, 0x8b, 0x08]));
        assert!(!is_gzip(b"example.com\n"));
        assert!(!is_gzip(&[0x1f]));
    }

    #[test]
    fn test_is_stdio() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("./-")));
        assert!(!is_stdio(Path::new("list.txt")));
    }

    #[test]
    fn test_open_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("plain.txt");
        fs::write(&plain, "example.com\n").unwrap();

        let gz = dir.path().join("list.txt.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"example.com\n").unwrap();
        fs::write(&gz, encoder.finish().unwrap()).unwrap();

        for path in [&plain, &gz] {
            let mut content = String::new();
            open_input(path).unwrap().read_to_string(&mut content).unwrap();
            assert_eq!(content, "example.com\n");
        }
    }

    #[test]
    fn test_open_concatenated_gzip_members() {
        let dir = tempfile::tempdir().unwrap();
        let gz = dir.path().join("joined.txt.gz");

        let mut data = Vec::new();
        for part in [&b"# part one\nexample.com\n"[..], &b"1.2.3.4\n"[..]] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(part).unwrap();
            data.extend(encoder.finish().unwrap());
        }
        fs::write(&gz, data).unwrap();

        let mut content = String::new();
        open_input(&gz).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "# part one\nexample.com\n1.2.3.4\n");
    }

    #[test]
    fn test_open_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_input(&dir.path().join("missing.txt")),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn test_output_commit_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("rules.txt");

        let mut output = Output::create(&path).unwrap();
        writeln!(output, "+.example.com").unwrap();
        assert!(!path.exists());
        output.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "+.example.com\n");

        let other = dir.path().join("other.txt");
        let mut output = Output::create(&other).unwrap();
        writeln!(output, "1.2.3.4/32").unwrap();
        output.discard();
        assert!(!other.exists());
        assert!(!dir.path().join("other.txt.tmp").exists());
    }
}
