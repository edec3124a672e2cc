//! Length-prefixed record streams.
//!
//! Every record is a little-endian `u32` byte count followed by the payload.
//! Input streams carry serialized [`CkksCiphertext`]s, output streams carry
//! mid level verdicts.

use std::io::{BufRead, ErrorKind, Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use hemon_core::{ReaderFrom, WriterTo, ckks::CkksCiphertext, tfhe::LweCiphertext};

use crate::StreamError;

const HEADER_BYTES: usize = 4;

pub struct SizedReader<R: Read> {
    inner: R,
}

impl<R: Read> SizedReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Next record, `Ok(None)` on a clean end of stream.
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        let mut header: [u8; HEADER_BYTES] = [0u8; HEADER_BYTES];
        let got: usize = read_full(&mut self.inner, &mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < HEADER_BYTES {
            return Err(StreamError::Truncated {
                expected: HEADER_BYTES,
                actual: got,
            });
        }
        let len: usize = u32::from_le_bytes(header) as usize;
        // Grows with the bytes actually present, not with the header.
        let mut body: Vec<u8> = Vec::new();
        let got: usize = self.inner.by_ref().take(len as u64).read_to_end(&mut body)?;
        if got < len {
            return Err(StreamError::Truncated {
                expected: len,
                actual: got,
            });
        }
        Ok(Some(body))
    }

    pub fn read_ciphertext(&mut self) -> Result<Option<CkksCiphertext>, StreamError> {
        let Some(body) = self.read_record()? else {
            return Ok(None);
        };
        let mut ct: CkksCiphertext = CkksCiphertext::default();
        let mut slice: &[u8] = &body;
        ct.read_from(&mut slice)
            .map_err(|e| StreamError::Malformed(e.to_string()))?;
        if !slice.is_empty() {
            return Err(StreamError::Malformed(format!("{} trailing bytes", slice.len())));
        }
        Ok(Some(ct))
    }

    /// Next sample of `signal_size` ciphertexts. A stream ending inside a
    /// sample is truncated.
    pub fn read_sample(&mut self, signal_size: usize) -> Result<Option<Vec<CkksCiphertext>>, StreamError> {
        let mut sample: Vec<CkksCiphertext> = Vec::with_capacity(signal_size);
        for _ in 0..signal_size {
            match self.read_ciphertext()? {
                Some(ct) => sample.push(ct),
                None if sample.is_empty() => return Ok(None),
                None => {
                    return Err(StreamError::Truncated {
                        expected: signal_size,
                        actual: sample.len(),
                    });
                }
            }
        }
        Ok(Some(sample))
    }
}

/// Fills `buf` as far as the reader allows, returning the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, StreamError> {
    let mut filled: usize = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

pub struct SizedWriter<W: Write> {
    inner: W,
}

impl<W: Write> SizedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_record(&mut self, body: &[u8]) -> Result<(), StreamError> {
        let len: u32 = u32::try_from(body.len())
            .map_err(|_| StreamError::Malformed(format!("record of {} bytes", body.len())))?;
        self.inner.write_u32::<LittleEndian>(len)?;
        self.inner.write_all(body)?;
        Ok(())
    }

    pub fn write_ciphertext(&mut self, ct: &CkksCiphertext) -> Result<(), StreamError> {
        let mut body: Vec<u8> = Vec::new();
        ct.write_to(&mut body)?;
        self.write_record(&body)
    }

    pub fn write_verdict(&mut self, ct: &LweCiphertext<u32>) -> Result<(), StreamError> {
        let mut body: Vec<u8> = Vec::new();
        ct.write_to(&mut body)?;
        self.write_record(&body)
    }

    pub fn flush(&mut self) -> Result<(), StreamError> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Whitespace separated decimal values of a plain signal.
pub fn read_plain_values<R: BufRead>(reader: R) -> Result<Vec<f64>, StreamError> {
    let mut values: Vec<f64> = Vec::new();
    for line in reader.lines() {
        for token in line?.split_whitespace() {
            let v: f64 = token
                .parse()
                .map_err(|_| StreamError::Malformed(format!("not a number: {:?}", token)))?;
            values.push(v);
        }
    }
    Ok(values)
}
