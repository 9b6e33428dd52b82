use std::convert::TryFrom;
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use cqdb::CQDBWriter;

use super::dictionary::Dictionary;
use crate::model::{MODEL_MAGIC, MODEL_TYPE, MODEL_VERSION};
use crate::scorer::Scorer;

/// Write a trained scorer to a model file.
pub struct ModelWriter;

impl ModelWriter {
    /// Write `scorer` to `filename` in the binary model format.
    ///
    /// Layout: fixed header, `WGHT` chunk with one little-endian `f64` weight
    /// row per feature, then the CQDB feature dictionary. Row ids are
    /// assigned in sorted key order, so identical scorers produce identical
    /// files. Features whose entire row is zero are pruned; the reader treats
    /// missing features as zero anyway.
    pub fn write(filename: &Path, scorer: &Scorer) -> io::Result<()> {
        let mut keys: Vec<&str> = scorer
            .iter()
            .filter(|(_, row)| row.iter().any(|&weight| weight != 0.0))
            .map(|(feature, _)| feature)
            .collect();
        keys.sort_unstable();
        let mut features = Dictionary::new();
        for key in &keys {
            features.get_or_insert(key);
        }

        let mut file = File::create(filename)?;

        // Helper to convert stream position to u32 with overflow check
        let pos_to_u32 = |pos: u64| -> io::Result<u32> {
            u32::try_from(pos).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "file position exceeds u32::MAX")
            })
        };

        // Write header with zero offsets, patched once the sections are out
        Self::write_header(&mut file, scorer, &features, 0, 0, 0)?;

        let off_weights = pos_to_u32(file.stream_position()?)?;
        Self::write_weights(&mut file, scorer, &keys)?;

        let off_features = pos_to_u32(file.stream_position()?)?;
        Self::write_cqdb(&mut file, &features)?;

        let file_size = pos_to_u32(file.stream_position()?)?;
        file.seek(SeekFrom::Start(0))?;
        Self::write_header(&mut file, scorer, &features, file_size, off_weights, off_features)?;

        Ok(())
    }

    fn write_header(
        file: &mut File,
        scorer: &Scorer,
        features: &Dictionary,
        size: u32,
        off_weights: u32,
        off_features: u32,
    ) -> io::Result<()> {
        file.write_all(MODEL_MAGIC)?;
        file.write_all(&size.to_le_bytes())?;
        file.write_all(MODEL_TYPE)?;
        file.write_all(&MODEL_VERSION.to_le_bytes())?;
        file.write_all(&(scorer.num_classes() as u32).to_le_bytes())?;
        file.write_all(&(features.len() as u32).to_le_bytes())?;
        file.write_all(&off_weights.to_le_bytes())?;
        file.write_all(&off_features.to_le_bytes())?;
        Ok(())
    }

    fn write_weights(file: &mut File, scorer: &Scorer, keys: &[&str]) -> io::Result<()> {
        file.write_all(b"WGHT")?;

        let num_rows = u32::try_from(keys.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "number of features does not fit into u32",
            )
        })?;
        let chunk_size_u64 =
            12u64 + (num_rows as u64) * (scorer.num_classes() as u64) * 8u64;
        let chunk_size = u32::try_from(chunk_size_u64).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "weight chunk size exceeds u32::MAX",
            )
        })?;
        file.write_all(&chunk_size.to_le_bytes())?;
        file.write_all(&num_rows.to_le_bytes())?;

        for key in keys {
            for class in 0..scorer.num_classes() {
                file.write_all(&scorer.weight(key, class).to_le_bytes())?;
            }
        }

        Ok(())
    }

    fn write_cqdb(file: &mut File, dict: &Dictionary) -> io::Result<()> {
        let mut writer = CQDBWriter::new(file)?;
        for (feature, id) in dict.iter() {
            writer.put(feature, id)?;
        }
        // CQDBWriter flushes the database on drop; flush errors there cannot
        // be observed through the cqdb API.
        Ok(())
    }
}
