use std::io::{Read, Result, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub trait WriterTo {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;
}

pub trait ReaderFrom {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()>;
}

/// Fixed width little-endian encoding of torus words.
pub trait TorusWord: Sized {
    fn write_word<W: Write>(&self, writer: &mut W) -> Result<()>;
    fn read_word<R: Read>(reader: &mut R) -> Result<Self>;
}

impl TorusWord for u32 {
    fn write_word<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(*self)
    }

    fn read_word<R: Read>(reader: &mut R) -> Result<Self> {
        reader.read_u32::<LittleEndian>()
    }
}

impl TorusWord for u64 {
    fn write_word<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(*self)
    }

    fn read_word<R: Read>(reader: &mut R) -> Result<Self> {
        reader.read_u64::<LittleEndian>()
    }
}

pub(crate) fn invalid_data(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, msg)
}
