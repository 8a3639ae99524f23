use anyhow::{Context, Error, Result, bail};
use safetensors::tensor::Metadata;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const HEADER_MIB_LIMIT: usize = 100;

pub struct Safetensors {
    metadata: Metadata,
}

impl Safetensors {
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut io = BufReader::new(File::open(path)?);
        let metadata = read_header(&mut io, path)?;
        Ok(Safetensors { metadata })
    }

    /// The free-form `__metadata__` string table, if the file has one.
    pub fn extra_metadata(&self) -> Option<&HashMap<String, String>> {
        self.metadata.metadata().as_ref()
    }

    pub fn tensor_count(&self) -> usize {
        self.metadata.tensors().len()
    }
}

pub fn read_header<I: Read>(io: &mut I, path: &Path) -> Result<Metadata, Error> {
    let mut header_size_bytes = [0u8; 8];
    io.read_exact(&mut header_size_bytes)
        .context("file is too short to hold a header length")?;
    let n = u64::from_le_bytes(header_size_bytes) as usize;

    if n > HEADER_MIB_LIMIT * 1024 * 1024 {
        bail!(
            "Header is larger than {HEADER_MIB_LIMIT}MiB. Is {} a safetensors file?",
            path.display()
        );
    }

    let mut metadata_bytes = vec![0u8; n];
    io.read_exact(&mut metadata_bytes)
        .with_context(|| format!("header claims {n} bytes but the file ends early"))?;

    let metadata_str =
        std::str::from_utf8(&metadata_bytes).context("header is not valid UTF-8")?;

    let metadata: Metadata =
        serde_json::from_str(metadata_str).context("header is not a safetensors header")?;

    Ok(metadata)
}
