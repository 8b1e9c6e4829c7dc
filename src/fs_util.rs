use std::fs;
use std::io::{BufReader, Read};

use camino::Utf8Path;
use flate2::read::GzDecoder;
use zip::ZipArchive;

use crate::chemont::ChemontLookup;
use crate::error::HmdbError;

fn read_error(path: &Utf8Path, err: impl ToString) -> HmdbError {
    HmdbError::InputRead {
        path: path.to_string(),
        message: err.to_string(),
    }
}

/// Reads the whole metabolite document. `.gz` files are inflated and `.zip`
/// archives yield their first `.xml` entry.
pub fn read_document(path: &Utf8Path) -> Result<String, HmdbError> {
    match path.extension() {
        Some("gz") => {
            let file = fs::File::open(path).map_err(|err| read_error(path, err))?;
            let mut text = String::new();
            GzDecoder::new(file)
                .read_to_string(&mut text)
                .map_err(|err| read_error(path, err))?;
            Ok(text)
        }
        Some("zip") => read_zipped_xml(path),
        _ => fs::read_to_string(path).map_err(|err| read_error(path, err)),
    }
}

fn read_zipped_xml(path: &Utf8Path) -> Result<String, HmdbError> {
    let file = fs::File::open(path).map_err(|err| read_error(path, err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| read_error(path, err))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|err| read_error(path, err))?;
        if entry.is_dir() || !entry.name().ends_with(".xml") {
            continue;
        }
        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .map_err(|err| read_error(path, err))?;
        return Ok(text);
    }
    Err(read_error(path, "archive contains no .xml entry"))
}

pub fn load_chemont(path: &Utf8Path) -> Result<ChemontLookup, HmdbError> {
    let file = fs::File::open(path).map_err(|err| read_error(path, err))?;
    ChemontLookup::from_reader(BufReader::new(file))
}
