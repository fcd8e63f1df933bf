/// Detached NRRD headers, so that raw volumes open in standard viewers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use units::mm_;

use crate::fov::FOV;

pub fn write_header(header: &Path, data_file: &Path, fov: FOV) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(header)?);
    out.write_all(header_text(data_file, fov).as_bytes())?;
    out.flush()
}

fn header_text(data_file: &Path, fov: FOV) -> String {
    let sizes = fov.dims().iter().join(" ");
    let spacings = std::iter::repeat(mm_(fov.voxel_size)).take(3).join(" ");
    // Detached data files are resolved relative to the header
    let data_file = data_file.file_name().map_or_else(
        || data_file.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    format!("NRRD0004\n\
             type: float\n\
             dimension: 3\n\
             sizes: {sizes}\n\
             spacings: {spacings}\n\
             units: \"mm\" \"mm\" \"mm\"\n\
             endian: little\n\
             encoding: raw\n\
             data file: {data_file}\n")
}
