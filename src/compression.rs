//! Compression envelopes and NBT files on disk.
//!
//! Player and world data (`level.dat`, `<uuid>.dat`) is gzip compressed.
//! Files with a plain `.nbt` extension are treated as raw NBT. When reading,
//! the content decides: gzip and zlib streams are recognised by their
//! headers, so a mis-named file still opens. The extension is only a hint for
//! which envelope to write.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::{read::GzDecoder, read::ZlibDecoder, write::GzEncoder, write::ZlibEncoder};
use log::{debug, warn};

use crate::{error::Result, NamedTag};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extensions whose files the game writes gzip compressed.
const GZIP_EXTENSIONS: &[&str] = &["dat", "dat_old", "dat_mcr", "schematic"];

/// The envelope around an NBT stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw NBT, no envelope.
    #[default]
    None,
    Gzip,
    Zlib,
}

impl Compression {
    /// Sniff the envelope from the first bytes of a file.
    pub fn detect(bytes: &[u8]) -> Compression {
        match bytes {
            [a, b, ..] if [*a, *b] == GZIP_MAGIC => Compression::Gzip,
            // CMF 0x78 is deflate with a 32K window. The header as a big
            // endian u16 is a multiple of 31.
            [0x78, flg, ..] if (0x7800u16 | *flg as u16) % 31 == 0 => Compression::Zlib,
            _ => Compression::None,
        }
    }

    /// The envelope to write for a path, based on its extension.
    pub fn for_path(path: impl AsRef<Path>) -> Compression {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext {
            Some(ext) if GZIP_EXTENSIONS.contains(&ext.as_str()) => Compression::Gzip,
            _ => Compression::None,
        }
    }
}

/// Remove the envelope from `bytes`.
pub fn decompress(bytes: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match compression {
        Compression::None => out.extend_from_slice(bytes),
        Compression::Gzip => {
            GzDecoder::new(bytes).read_to_end(&mut out)?;
        }
        Compression::Zlib => {
            ZlibDecoder::new(bytes).read_to_end(&mut out)?;
        }
    }
    Ok(out)
}

/// Wrap `bytes` in the envelope.
pub fn compress(bytes: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_compressed(&mut out, bytes, compression)?;
    Ok(out)
}

fn write_compressed<W: Write>(writer: W, bytes: &[u8], compression: Compression) -> Result<()> {
    match compression {
        Compression::None => {
            let mut writer = writer;
            writer.write_all(bytes)?;
            writer.flush()?;
        }
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(writer, flate2::Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()?.flush()?;
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(writer, flate2::Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()?.flush()?;
        }
    }
    Ok(())
}

/// Read a file and strip its envelope, returning the raw NBT bytes and the
/// envelope that was found.
pub fn open(path: impl AsRef<Path>) -> Result<(Vec<u8>, Compression)> {
    let path = path.as_ref();
    let mut raw = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut raw)?;

    let found = Compression::detect(&raw);
    let hinted = Compression::for_path(path);
    if found != hinted {
        warn!(
            "{}: extension suggests {:?} but content is {:?}, using content",
            path.display(),
            hinted,
            found
        );
    }
    debug!("{}: read {} bytes, {:?}", path.display(), raw.len(), found);

    Ok((decompress(&raw, found)?, found))
}

/// Write raw NBT bytes to a file, picking the envelope from the extension.
pub fn save(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    save_with(path, bytes, Compression::for_path(path))
}

/// Write raw NBT bytes to a file in the given envelope.
pub fn save_with(path: impl AsRef<Path>, bytes: &[u8], compression: Compression) -> Result<()> {
    let path = path.as_ref();
    debug!(
        "{}: writing {} bytes, {:?}",
        path.display(),
        bytes.len(),
        compression
    );
    write_compressed(BufWriter::new(File::create(path)?), bytes, compression)
}

/// A decoded document together with the envelope it was stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
    pub tag: NamedTag,
    pub compression: Compression,
}

impl NbtFile {
    pub fn new(tag: NamedTag, compression: Compression) -> Self {
        Self { tag, compression }
    }

    /// Open, decompress and decode a file.
    pub fn open(path: impl AsRef<Path>) -> Result<NbtFile> {
        let (bytes, compression) = open(path)?;
        let tag = crate::decode(&bytes)?;
        Ok(NbtFile { tag, compression })
    }

    /// Encode and write, picking the envelope from the extension of `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save(path, &crate::encode(&self.tag)?)
    }

    /// Encode and write in the envelope this file was read with.
    pub fn save_preserving(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_as(path, self.compression)
    }

    /// Encode and write in the given envelope.
    pub fn save_as(&self, path: impl AsRef<Path>, compression: Compression) -> Result<()> {
        save_with(path, &crate::encode(&self.tag)?, compression)
    }
}
