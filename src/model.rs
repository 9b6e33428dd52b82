use std::{
    convert::TryInto,
    fmt,
    io::{self, Write},
    mem,
};

use bstr::ByteSlice;
use cqdb::CQDB;

use crate::scorer::{argmax, Scorer};

pub(crate) const MODEL_MAGIC: &[u8; 4] = b"lPDG";
pub(crate) const MODEL_TYPE: &[u8; 4] = b"PERC";
pub(crate) const MODEL_VERSION: u32 = 100;

const CHUNK_HEADER_SIZE: usize = 12;

#[inline]
pub(crate) fn unpack_u32(buf: &[u8]) -> io::Result<u32> {
    if buf.len() < 4 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "not enough data for unpacking u32",
        ));
    }
    Ok(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

#[inline]
fn unpack_f64(buf: &[u8]) -> io::Result<f64> {
    if buf.len() < 8 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "not enough data for unpacking f64",
        ));
    }
    Ok(f64::from_le_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ]))
}

#[derive(Debug, Clone)]
#[repr(C)]
struct Header {
    magic: [u8; 4],
    size: u32,
    r#type: [u8; 4],
    version: u32,
    num_classes: u32,
    num_features: u32,
    off_weights: u32,
    off_features: u32,
}

/// A trained scorer model, read zero-copy from an in-memory buffer.
///
/// The layout is a fixed header, a `WGHT` chunk holding one little-endian
/// `f64` weight row per feature, and a CQDB section mapping feature strings
/// to the row ids.
#[derive(Clone)]
pub struct Model<'a> {
    buffer: &'a [u8],
    header: Header,
    features: CQDB<'a>,
}

impl<'a> fmt::Debug for Model<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("header", &self.header)
            .field("features", &self.features)
            .finish()
    }
}

impl<'a> Model<'a> {
    /// Create an instance of a model object from a model in memory
    pub fn new(buf: &'a [u8]) -> io::Result<Self> {
        let size = buf.len();
        if size <= mem::size_of::<Header>() {
            return Err(io::Error::new(io::ErrorKind::Other, "invalid model format"));
        }
        let magic = &buf[0..4];
        if magic != MODEL_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "invalid file format, magic mismatch",
            ));
        }
        let mut index = 4;
        let header_size = unpack_u32(&buf[index..])?;
        index += 4;
        let header_type = &buf[index..index + 4];
        index += 4;
        let version = unpack_u32(&buf[index..])?;
        index += 4;
        let num_classes = unpack_u32(&buf[index..])?;
        index += 4;
        let num_features = unpack_u32(&buf[index..])?;
        index += 4;
        let off_weights = unpack_u32(&buf[index..])?;
        index += 4;
        let off_features = unpack_u32(&buf[index..])?;
        let header = Header {
            magic: magic.try_into().unwrap(),
            size: header_size,
            r#type: header_type.try_into().unwrap(),
            version,
            num_classes,
            num_features,
            off_weights,
            off_features,
        };
        let features_start = off_features as usize;
        if features_start >= size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "feature dictionary offset past end of buffer",
            ));
        }
        let features = CQDB::new(&buf[features_start..size])?;
        Ok(Self {
            buffer: buf,
            header,
            features,
        })
    }

    /// Number of classes the model scores
    pub fn num_classes(&self) -> u32 {
        self.header.num_classes
    }

    /// Number of features with a stored weight row
    pub fn num_features(&self) -> u32 {
        self.header.num_features
    }

    /// Convert a feature string to its row id
    pub fn to_feature_id(&self, feature: &str) -> Option<u32> {
        self.features.to_id(feature)
    }

    /// Convert a feature row id to the feature string
    pub fn to_feature(&self, fid: u32) -> Option<&str> {
        self.features.to_str(fid).and_then(|s| s.to_str().ok())
    }

    /// Weight stored for one feature row and class
    pub fn weight(&self, fid: u32, class: u32) -> io::Result<f64> {
        if fid >= self.header.num_features || class >= self.header.num_classes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "feature row or class out of range",
            ));
        }
        let index = self.header.off_weights as usize
            + CHUNK_HEADER_SIZE
            + (fid as usize * self.header.num_classes as usize + class as usize) * 8;
        let buf = self.buffer.get(index..).ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "weight row past end of buffer")
        })?;
        unpack_f64(buf)
    }

    /// Per-class scores for a feature set, summed straight off the buffer.
    ///
    /// Features missing from the model contribute zero.
    pub fn scores(&self, features: &[String]) -> io::Result<Vec<f64>> {
        let num_classes = self.header.num_classes as usize;
        let mut scores = vec![0.0; num_classes];
        for feature in features {
            if let Some(fid) = self.to_feature_id(feature) {
                for (class, score) in scores.iter_mut().enumerate() {
                    *score += self.weight(fid, class as u32)?;
                }
            }
        }
        Ok(scores)
    }

    /// Best class for a feature set; ties break toward the lower class index
    pub fn predict(&self, features: &[String]) -> io::Result<usize> {
        Ok(argmax(&self.scores(features)?))
    }

    /// Materialize the model as an in-memory [`Scorer`], e.g. to drive a
    /// beam decoder.
    pub fn scorer(&self) -> io::Result<Scorer> {
        let mut scorer = Scorer::new(self.header.num_classes as usize);
        for fid in 0..self.header.num_features {
            let feature = self.to_feature(fid).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "feature row missing from dictionary",
                )
            })?;
            scorer.ensure_feature(feature);
            for class in 0..self.header.num_classes {
                let weight = self.weight(fid, class)?;
                if weight != 0.0 {
                    scorer.update(feature, class as usize, weight);
                }
            }
        }
        Ok(scorer)
    }

    /// Print the model in human-readable format
    pub fn dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let header = &self.header;
        writeln!(w, "FILEHEADER = {{")?;
        writeln!(
            w,
            "  magic: {}",
            std::str::from_utf8(&header.magic).unwrap()
        )?;
        writeln!(w, "  size: {}", header.size)?;
        writeln!(
            w,
            "  type: {}",
            std::str::from_utf8(&header.r#type).unwrap()
        )?;
        writeln!(w, "  version: {}", header.version)?;
        writeln!(w, "  num_classes: {}", header.num_classes)?;
        writeln!(w, "  num_features: {}", header.num_features)?;
        writeln!(w, "  off_weights: {:#X}", header.off_weights)?;
        writeln!(w, "  off_features: {:#X}", header.off_features)?;
        writeln!(w, "}}\n")?;
        writeln!(w, "WEIGHTS = {{")?;
        for fid in 0..header.num_features {
            let feature = self.to_feature(fid).unwrap();
            write!(w, "  {:>5}: {}:", fid, feature)?;
            for class in 0..header.num_classes {
                write!(w, " {:.6}", self.weight(fid, class)?)?;
            }
            writeln!(w)?;
        }
        writeln!(w, "}}\n")?;
        Ok(())
    }
}
