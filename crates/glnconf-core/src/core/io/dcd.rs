//! Reader for CHARMM/NAMD/X-PLOR DCD binary trajectories.
//!
//! DCD files are a sequence of Fortran unformatted records, each wrapped in a
//! 4-byte length marker. Coordinates are stored in ångström as 32-bit floats
//! and are converted to nanometres on load.

use super::traits::TrajectoryFile;
use crate::core::models::frame::{Frame, Trajectory, UnitCell};
use nalgebra::Point3;
use std::io::{self, BufRead, Read};
use thiserror::Error;
use tracing::{debug, trace};

pub const ANGSTROM_TO_NM: f64 = 0.1;

const HEADER_RECORD_LEN: i32 = 84;
const UNIT_CELL_RECORD_LEN: i32 = 48;
const TITLE_LEN: usize = 80;
const MAX_ATOMS: usize = 100_000_000;

#[derive(Debug, Error)]
pub enum DcdError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid DCD header: {0}")]
    InvalidHeader(String),
    #[error("Unsupported DCD content: {0}")]
    Unsupported(&'static str),
    #[error("Record marker mismatch in frame {frame}: expected {expected} bytes, found {found}")]
    RecordMismatch {
        frame: usize,
        expected: i32,
        found: i32,
    },
    #[error("Trajectory ends after {read} of {expected} frames")]
    Truncated { read: usize, expected: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Header information of a DCD file.
#[derive(Debug, Clone, PartialEq)]
pub struct DcdHeader {
    /// Number of frames declared by the writer (0 when the writer did not fill it in).
    pub n_frames: usize,
    /// Number of atoms in every frame.
    pub n_atoms: usize,
    /// Starting timestep.
    pub start_timestep: i32,
    /// Timesteps between saved frames.
    pub timestep_interval: i32,
    /// Integration timestep in AKMA units.
    pub timestep: f32,
    /// Whether every frame carries a unit-cell record.
    pub has_unit_cell: bool,
    /// CHARMM version stamp, 0 for X-PLOR files.
    pub charmm_version: i32,
    /// Byte order of the file.
    pub endianness: Endianness,
    /// Title lines of the header.
    pub titles: Vec<String>,
}

struct RecordReader<'r, R> {
    reader: &'r mut R,
    endianness: Endianness,
}

impl<R: Read> RecordReader<'_, R> {
    fn read_word(&mut self) -> io::Result<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_i32(&mut self) -> io::Result<i32> {
        let buf = self.read_word()?;
        Ok(match self.endianness {
            Endianness::Little => i32::from_le_bytes(buf),
            Endianness::Big => i32::from_be_bytes(buf),
        })
    }

    fn read_f32(&mut self) -> io::Result<f32> {
        let buf = self.read_word()?;
        Ok(match self.endianness {
            Endianness::Little => f32::from_le_bytes(buf),
            Endianness::Big => f32::from_be_bytes(buf),
        })
    }

    fn read_f64(&mut self) -> io::Result<f64> {
        let mut buf = [0u8; 8];
        self.reader.read_exact(&mut buf)?;
        Ok(match self.endianness {
            Endianness::Little => f64::from_le_bytes(buf),
            Endianness::Big => f64::from_be_bytes(buf),
        })
    }

    fn skip(&mut self, n_bytes: usize) -> io::Result<()> {
        let copied = io::copy(&mut self.reader.by_ref().take(n_bytes as u64), &mut io::sink())?;
        if copied as usize != n_bytes {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        Ok(())
    }

    fn expect_marker(&mut self, frame: usize, expected: i32) -> Result<(), DcdError> {
        let found = self.read_i32()?;
        if found != expected {
            return Err(DcdError::RecordMismatch {
                frame,
                expected,
                found,
            });
        }
        Ok(())
    }
}

fn detect_endianness(first_word: [u8; 4]) -> Result<Endianness, DcdError> {
    if i32::from_le_bytes(first_word) == HEADER_RECORD_LEN {
        Ok(Endianness::Little)
    } else if i32::from_be_bytes(first_word) == HEADER_RECORD_LEN {
        Ok(Endianness::Big)
    } else {
        Err(DcdError::InvalidHeader(format!(
            "first record is {} bytes (LE) / {} bytes (BE), expected {}",
            i32::from_le_bytes(first_word),
            i32::from_be_bytes(first_word),
            HEADER_RECORD_LEN
        )))
    }
}

fn read_header<R: Read>(reader: &mut R) -> Result<DcdHeader, DcdError> {
    let mut first_word = [0u8; 4];
    reader.read_exact(&mut first_word)?;
    let endianness = detect_endianness(first_word)?;
    let mut records = RecordReader { reader, endianness };

    let mut magic = [0u8; 4];
    records.reader.read_exact(&mut magic)?;
    if &magic != b"CORD" {
        return Err(DcdError::InvalidHeader(format!(
            "magic is {:?}, expected \"CORD\"",
            String::from_utf8_lossy(&magic)
        )));
    }

    // The 20 control words; word 9 is the float timestep, the rest are integers.
    let mut control = [0i32; 20];
    let mut timestep = 0.0f32;
    for (word, slot) in control.iter_mut().enumerate() {
        if word == 9 {
            timestep = records.read_f32()?;
        } else {
            *slot = records.read_i32()?;
        }
    }
    records
        .expect_marker(0, HEADER_RECORD_LEN)
        .map_err(|_| DcdError::InvalidHeader("unterminated control record".into()))?;

    let n_frames = usize::try_from(control[0])
        .map_err(|_| DcdError::InvalidHeader(format!("negative frame count {}", control[0])))?;
    let charmm_version = control[19];
    let is_charmm = charmm_version != 0;
    if control[8] != 0 {
        return Err(DcdError::Unsupported("fixed atoms"));
    }
    if is_charmm && control[11] != 0 {
        return Err(DcdError::Unsupported("four-dimensional coordinates"));
    }

    let title_record_len = records.read_i32()?;
    let n_titles = records.read_i32()?;
    let title_bytes = usize::try_from(n_titles)
        .ok()
        .and_then(|n| n.checked_mul(TITLE_LEN))
        .and_then(|n| n.checked_add(4))
        .filter(|&needed| needed <= title_record_len.max(0) as usize)
        .ok_or_else(|| {
            DcdError::InvalidHeader(format!(
                "title record of {} bytes cannot hold {} titles",
                title_record_len, n_titles
            ))
        })?;
    let mut titles = Vec::with_capacity(n_titles as usize);
    for _ in 0..n_titles {
        let mut title = [0u8; TITLE_LEN];
        records.reader.read_exact(&mut title)?;
        titles.push(
            String::from_utf8_lossy(&title)
                .trim_end_matches(['\0', ' '])
                .to_string(),
        );
    }
    records.skip(title_record_len as usize - title_bytes)?;
    records
        .expect_marker(0, title_record_len)
        .map_err(|_| DcdError::InvalidHeader("unterminated title record".into()))?;

    records
        .expect_marker(0, 4)
        .map_err(|_| DcdError::InvalidHeader("malformed atom-count record".into()))?;
    let n_atoms_raw = records.read_i32()?;
    records
        .expect_marker(0, 4)
        .map_err(|_| DcdError::InvalidHeader("malformed atom-count record".into()))?;
    let n_atoms = usize::try_from(n_atoms_raw)
        .ok()
        .filter(|&n| n <= MAX_ATOMS)
        .ok_or_else(|| DcdError::InvalidHeader(format!("invalid atom count {}", n_atoms_raw)))?;

    Ok(DcdHeader {
        n_frames,
        n_atoms,
        start_timestep: control[1],
        timestep_interval: control[2],
        timestep,
        has_unit_cell: is_charmm && control[10] != 0,
        charmm_version,
        endianness,
        titles,
    })
}

fn read_frame<R: Read>(
    reader: &mut R,
    header: &DcdHeader,
    frame_index: usize,
) -> Result<Frame, DcdError> {
    let mut records = RecordReader {
        reader,
        endianness: header.endianness,
    };

    let unit_cell = if header.has_unit_cell {
        records.expect_marker(frame_index, UNIT_CELL_RECORD_LEN)?;
        let a = records.read_f64()?;
        let gamma = records.read_f64()?;
        let b = records.read_f64()?;
        let beta = records.read_f64()?;
        let alpha = records.read_f64()?;
        let c = records.read_f64()?;
        records.expect_marker(frame_index, UNIT_CELL_RECORD_LEN)?;
        Some(UnitCell {
            lengths: [a * ANGSTROM_TO_NM, b * ANGSTROM_TO_NM, c * ANGSTROM_TO_NM],
            angles: [alpha, beta, gamma],
        })
    } else {
        None
    };

    let block_len = (header.n_atoms * 4) as i32;
    let mut axes: [Vec<f32>; 3] = Default::default();
    for axis in axes.iter_mut() {
        records.expect_marker(frame_index, block_len)?;
        *axis = (0..header.n_atoms)
            .map(|_| records.read_f32())
            .collect::<io::Result<Vec<_>>>()?;
        records.expect_marker(frame_index, block_len)?;
    }

    let [xs, ys, zs] = axes;
    let positions = xs
        .into_iter()
        .zip(ys)
        .zip(zs)
        .map(|((x, y), z)| {
            Point3::new(
                x as f64 * ANGSTROM_TO_NM,
                y as f64 * ANGSTROM_TO_NM,
                z as f64 * ANGSTROM_TO_NM,
            )
        })
        .collect();

    let frame = Frame::new(positions);
    Ok(match unit_cell {
        Some(cell) => frame.with_unit_cell(cell),
        None => frame,
    })
}

pub struct DcdFile;

impl TrajectoryFile for DcdFile {
    type Metadata = DcdHeader;
    type Error = DcdError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Trajectory, Self::Metadata), Self::Error> {
        let header = read_header(reader)?;
        debug!(
            n_atoms = header.n_atoms,
            n_frames = header.n_frames,
            charmm = header.charmm_version,
            unit_cell = header.has_unit_cell,
            "Read DCD header."
        );

        let mut trajectory = Trajectory::empty(header.n_atoms);

        // Writers that never patch the header leave the frame count at 0; read to EOF then.
        let read_to_eof = header.n_frames == 0;
        let mut frame_index = 0;
        while read_to_eof || frame_index < header.n_frames {
            if read_to_eof && reader.fill_buf()?.is_empty() {
                break;
            }
            let frame = match read_frame(reader, &header, frame_index) {
                Ok(frame) => frame,
                Err(DcdError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(DcdError::Truncated {
                        read: frame_index,
                        expected: header.n_frames.max(frame_index + 1),
                    });
                }
                Err(e) => return Err(e),
            };
            trace!(frame = frame_index, "Read DCD frame.");
            trajectory
                .push(frame)
                .map_err(|e| DcdError::InvalidHeader(e.to_string()))?;
            frame_index += 1;
        }

        Ok((trajectory, header))
    }
}

/// Encodes frames (in ångström) as a CHARMM-flavoured DCD file.
#[cfg(test)]
pub(crate) fn encode_dcd(
    frames: &[Vec<[f32; 3]>],
    endianness: Endianness,
    unit_cell: Option<[f64; 6]>,
) -> Vec<u8> {
    let n_atoms = frames.first().map_or(0, |f| f.len());
    let mut out = Vec::new();
    let i32_bytes = |v: i32| match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    };
    let f32_bytes = |v: f32| match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    };
    let f64_bytes = |v: f64| match endianness {
        Endianness::Little => v.to_le_bytes(),
        Endianness::Big => v.to_be_bytes(),
    };

    out.extend(i32_bytes(HEADER_RECORD_LEN));
    out.extend(b"CORD");
    let mut control = [0i32; 20];
    control[0] = frames.len() as i32;
    control[2] = 1;
    control[10] = i32::from(unit_cell.is_some());
    control[19] = 24;
    for (word, value) in control.iter().enumerate() {
        if word == 9 {
            out.extend(f32_bytes(0.002));
        } else {
            out.extend(i32_bytes(*value));
        }
    }
    out.extend(i32_bytes(HEADER_RECORD_LEN));

    let title_len = (4 + TITLE_LEN) as i32;
    out.extend(i32_bytes(title_len));
    out.extend(i32_bytes(1));
    let mut title = [b' '; TITLE_LEN];
    title[..9].copy_from_slice(b"glnconf  ");
    out.extend(title);
    out.extend(i32_bytes(title_len));

    out.extend(i32_bytes(4));
    out.extend(i32_bytes(n_atoms as i32));
    out.extend(i32_bytes(4));

    let block_len = (n_atoms * 4) as i32;
    for frame in frames {
        if let Some(cell) = unit_cell {
            out.extend(i32_bytes(UNIT_CELL_RECORD_LEN));
            for value in cell {
                out.extend(f64_bytes(value));
            }
            out.extend(i32_bytes(UNIT_CELL_RECORD_LEN));
        }
        for axis in 0..3 {
            out.extend(i32_bytes(block_len));
            for atom in frame {
                out.extend(f32_bytes(atom[axis]));
            }
            out.extend(i32_bytes(block_len));
        }
    }
    out
}
