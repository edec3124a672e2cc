use std::io::{ErrorKind, Read, Result, Write};

use backend::BigPoly;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{Infos, ReaderFrom, WriterTo, serialization::invalid_data};

/// `(c_0, c_1, ...)` modulo `2^log_q`, decrypting to `c_0 + c_1 * s + ...`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CkksCiphertext {
    pub(crate) polys: Vec<BigPoly>,
    pub(crate) level: usize,
    pub(crate) log_q: u32,
    pub(crate) scale: f64,
}

impl CkksCiphertext {
    pub fn alloc(n: usize, size: usize, level: usize, log_q: u32, scale: f64) -> Self {
        Self {
            polys: vec![BigPoly::alloc(n); size],
            level,
            log_q,
            scale,
        }
    }

    /// Number of polynomials: 2 for a fresh ciphertext, 3 after a product.
    pub fn size(&self) -> usize {
        self.polys.len()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn polys(&self) -> &[BigPoly] {
        &self.polys
    }

    pub fn log_q_bits(&self) -> u32 {
        self.log_q
    }
}

impl Infos for CkksCiphertext {
    fn n(&self) -> usize {
        self.polys.first().map(|p| p.n()).unwrap_or(0)
    }

    fn log_q(&self) -> usize {
        self.log_q as usize
    }
}

impl WriterTo for CkksCiphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.n() as u64)?;
        writer.write_u64::<LittleEndian>(self.size() as u64)?;
        writer.write_u64::<LittleEndian>(self.level as u64)?;
        writer.write_u32::<LittleEndian>(self.log_q)?;
        writer.write_f64::<LittleEndian>(self.scale)?;
        let mut buf: Vec<u8> = Vec::new();
        self.polys.iter().for_each(|p| p.to_bytes(self.log_q, &mut buf));
        writer.write_u64::<LittleEndian>(buf.len() as u64)?;
        writer.write_all(&buf)?;
        Ok(())
    }
}

/// Largest ring degree accepted from a serialized ciphertext.
pub const MAX_RING_DEGREE: usize = 1 << 17;
/// Largest modulus, in bits, accepted from a serialized ciphertext.
pub const MAX_LOG_Q: u32 = 1 << 12;
const MAX_SIZE: usize = 3;

impl ReaderFrom for CkksCiphertext {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let n: u64 = reader.read_u64::<LittleEndian>()?;
        let size: u64 = reader.read_u64::<LittleEndian>()?;
        let level: u64 = reader.read_u64::<LittleEndian>()?;
        let log_q: u32 = reader.read_u32::<LittleEndian>()?;
        let scale: f64 = reader.read_f64::<LittleEndian>()?;
        let len: u64 = reader.read_u64::<LittleEndian>()?;

        if !(n as usize).is_power_of_two() || n > MAX_RING_DEGREE as u64 {
            return Err(invalid_data(format!("ring degree {}", n)));
        }
        if size == 0 || size > MAX_SIZE as u64 {
            return Err(invalid_data(format!("ciphertext size {}", size)));
        }
        if log_q == 0 || log_q > MAX_LOG_Q || level >= log_q as u64 {
            return Err(invalid_data(format!("level {} with modulus 2^{}", level, log_q)));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(invalid_data(format!("scale {}", scale)));
        }
        let (n, size): (usize, usize) = (n as usize, size as usize);
        let poly_bytes: usize = n
            .checked_mul(BigPoly::coeff_bytes(log_q))
            .ok_or_else(|| invalid_data("polynomial size overflows".to_string()))?;
        let expected: u64 = poly_bytes
            .checked_mul(size)
            .ok_or_else(|| invalid_data("payload size overflows".to_string()))? as u64;
        if len != expected {
            return Err(invalid_data(format!(
                "payload of {} bytes for {} polynomials of {} bytes",
                len, size, poly_bytes
            )));
        }

        let mut buf: Vec<u8> = Vec::new();
        reader.by_ref().take(len).read_to_end(&mut buf)?;
        if buf.len() as u64 != len {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("payload of {} bytes, expected {}", buf.len(), len),
            ));
        }
        self.polys = buf
            .chunks_exact(poly_bytes)
            .map(|chunk| {
                BigPoly::from_bytes(n, log_q, chunk).ok_or_else(|| invalid_data("malformed polynomial".to_string()))
            })
            .collect::<Result<Vec<BigPoly>>>()?;
        self.level = level as usize;
        self.log_q = log_q;
        self.scale = scale;
        Ok(())
    }
}
