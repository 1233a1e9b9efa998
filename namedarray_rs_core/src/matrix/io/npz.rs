use std::{
    fs::File,
    io::{self, Read, Seek, Write},
    path::Path,
};

use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use super::{invalid_data, npy_labels, COL_LABELS_ENTRY, DATA_ENTRY, ROW_LABELS_ENTRY};
use crate::{error::Result, matrix::LabeledMatrix, toolkit::array::AFloat};

// entries are stored as `<name>.npy`, which is what `numpy.load` expects
fn member(entry: &str) -> String {
    format!("{entry}.npy")
}

fn read_member<R: Read + Seek>(archive: &mut ZipArchive<R>, entry: &str) -> io::Result<Vec<u8>> {
    let mut file = archive.by_name(&member(entry)).map_err(invalid_data)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

impl<T: AFloat> LabeledMatrix<T> {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::debug!("saving {:?} matrix to {}", self.shape(), path.display());
        let mut file = File::create(path)?;
        self.save_to(&mut file)
    }

    /// Same as [`LabeledMatrix::save`], with deflate-compressed entries.
    pub fn save_compressed(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::debug!(
            "saving {:?} matrix to {} (compressed)",
            self.shape(),
            path.display()
        );
        let mut file = File::create(path)?;
        self.save_compressed_to(&mut file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let loaded = Self::load_from(&mut file)?;
        log::debug!("loaded {:?} matrix from {}", loaded.shape(), path.display());
        Ok(loaded)
    }

    pub fn save_to(&self, writer: &mut (impl Write + Seek)) -> Result<()> {
        self.write_entries(writer, CompressionMethod::Stored)?;
        Ok(())
    }

    pub fn save_compressed_to(&self, writer: &mut (impl Write + Seek)) -> Result<()> {
        self.write_entries(writer, CompressionMethod::Deflated)?;
        Ok(())
    }

    pub fn load_from(reader: &mut (impl Read + Seek)) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).map_err(invalid_data)?;
        let data = {
            let file = archive.by_name(&member(DATA_ENTRY)).map_err(invalid_data)?;
            Array2::<T>::read_npy(file).map_err(invalid_data)?
        };
        let row_labels = npy_labels::decode(&read_member(&mut archive, ROW_LABELS_ENTRY)?)?;
        let col_labels = npy_labels::decode(&read_member(&mut archive, COL_LABELS_ENTRY)?)?;
        let matrix =
            LabeledMatrix::new(data, Some(row_labels), Some(col_labels)).map_err(invalid_data)?;
        Ok(matrix)
    }

    fn write_entries<W: Write + Seek>(
        &self,
        writer: W,
        method: CompressionMethod,
    ) -> io::Result<()> {
        let row_labels = npy_labels::encode(&self.rows)?;
        let col_labels = npy_labels::encode(&self.cols)?;
        let options = SimpleFileOptions::default().compression_method(method);
        let mut zip = ZipWriter::new(writer);
        zip.start_file(member(DATA_ENTRY), options)?;
        self.data.write_npy(&mut zip).map_err(io::Error::other)?;
        zip.start_file(member(ROW_LABELS_ENTRY), options)?;
        zip.write_all(&row_labels)?;
        zip.start_file(member(COL_LABELS_ENTRY), options)?;
        zip.write_all(&col_labels)?;
        zip.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabeledError;
    use crate::matrix::meta::tests::{get_test_matrix, strings};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn get_unicode_matrix() -> LabeledMatrix<f32> {
        LabeledMatrix::from_rows(
            &[vec![1.5, -2.0, 0.25], vec![3.0, 4.0, f32::INFINITY]],
            Some(strings(&["größe", "数据"])),
            Some(strings(&["α", "", "col c"])),
        )
        .unwrap()
    }

    fn round_trip<T: AFloat>(m: &LabeledMatrix<T>) -> anyhow::Result<LabeledMatrix<T>> {
        let mut buffer = Cursor::new(Vec::new());
        m.save_to(&mut buffer)?;
        buffer.set_position(0);
        Ok(LabeledMatrix::<T>::load_from(&mut buffer)?)
    }

    #[test]
    fn test_fs_io() -> anyhow::Result<()> {
        let m = get_test_matrix();
        let dir = tempdir()?;
        let file_path = dir.path().join("t0.npz");
        let mut file = File::create(&file_path)?;
        m.save_to(&mut file)?;
        drop(file);
        let mut file = File::open(&file_path)?;
        let loaded = LabeledMatrix::<f64>::load_from(&mut file)?;
        assert_eq!(loaded, m);
        drop(file);

        let file_path = dir.path().join("t1.npz");
        m.save(&file_path)?;
        assert_eq!(LabeledMatrix::<f64>::load(&file_path)?, m);

        let file_path = dir.path().join("t2.npz");
        m.save_compressed(&file_path)?;
        assert_eq!(LabeledMatrix::<f64>::load(&file_path)?, m);
        dir.close()?;
        Ok(())
    }

    #[test]
    fn test_unicode_round_trip() -> anyhow::Result<()> {
        let m = get_unicode_matrix();
        let loaded = round_trip(&m)?;
        assert_eq!(loaded, m);
        assert_eq!(loaded.col_labels()[1], "");
        Ok(())
    }

    #[test]
    fn test_nul_labels_round_trip() -> anyhow::Result<()> {
        let m = get_test_matrix()
            .with_labels(0, ["S\01", "S2\0", "\0"])?
            .with_labels(1, ["a", "b\0", "\0\0", ""])?;
        let loaded = round_trip(&m)?;
        assert_eq!(loaded, m);
        assert_eq!(loaded.col_labels()[1], "b\0");
        Ok(())
    }

    #[test]
    fn test_entries() -> anyhow::Result<()> {
        let m = get_test_matrix();
        let mut buffer = Cursor::new(Vec::new());
        m.save_to(&mut buffer)?;
        buffer.set_position(0);
        let mut archive = ZipArchive::new(&mut buffer)?;
        assert_eq!(archive.len(), 3);

        let data = Array2::<f64>::read_npy(archive.by_name(&member(DATA_ENTRY))?)?;
        assert_eq!(data, m.data());
        for (entry, labels) in [
            (ROW_LABELS_ENTRY, m.row_labels()),
            (COL_LABELS_ENTRY, m.col_labels()),
        ] {
            let bytes = read_member(&mut archive, entry)?;
            let header = String::from_utf8_lossy(&bytes[..bytes.len().min(128)]).into_owned();
            assert!(header.contains(&format!("'shape': ({},)", labels.len())));
            assert_eq!(npy_labels::decode(&bytes)?, labels);
        }
        Ok(())
    }

    #[test]
    fn test_io_failures() {
        let dir = tempdir().unwrap();
        let missing = LabeledMatrix::<f64>::load(dir.path().join("missing.npz"));
        match missing {
            Err(LabeledError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected {other:?}"),
        }

        let mut garbage = Cursor::new(b"definitely not an archive".to_vec());
        assert!(matches!(
            LabeledMatrix::<f64>::load_from(&mut garbage),
            Err(LabeledError::Io(_))
        ));

        let mut partial = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut partial);
            zip.start_file(member(DATA_ENTRY), SimpleFileOptions::default())
                .unwrap();
            Array2::<f64>::zeros((2, 2)).write_npy(&mut zip).unwrap();
            zip.finish().unwrap();
        }
        partial.set_position(0);
        match LabeledMatrix::<f64>::load_from(&mut partial) {
            Err(LabeledError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected {other:?}"),
        }
    }
}
