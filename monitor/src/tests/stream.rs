use byteorder::{LittleEndian, WriteBytesExt};
use hemon_core::{WriterTo, ckks::CkksCiphertext, tfhe::LweCiphertext};

use crate::{
    StreamError,
    stream::{SizedReader, SizedWriter, read_plain_values},
    tests::fixture::{Encryptor, fixture},
};

#[test]
fn records_round_trip() {
    let mut writer: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    writer.write_record(b"abc").unwrap();
    writer.write_record(b"").unwrap();
    writer.write_record(&[7u8; 300]).unwrap();
    let bytes: Vec<u8> = writer.into_inner();
    assert_eq!(&bytes[..7], &[3, 0, 0, 0, b'a', b'b', b'c']);

    let mut reader: SizedReader<&[u8]> = SizedReader::new(bytes.as_slice());
    assert_eq!(reader.read_record().unwrap(), Some(b"abc".to_vec()));
    assert_eq!(reader.read_record().unwrap(), Some(Vec::new()));
    assert_eq!(reader.read_record().unwrap(), Some(vec![7u8; 300]));
    assert_eq!(reader.read_record().unwrap(), None);
    assert_eq!(reader.read_record().unwrap(), None);
}

#[test]
fn truncated_records() {
    let short_header: [u8; 2] = [5, 0];
    assert!(matches!(
        SizedReader::new(&short_header[..]).read_record(),
        Err(StreamError::Truncated { expected: 4, actual: 2 })
    ));

    let short_body: [u8; 6] = [5, 0, 0, 0, 1, 2];
    assert!(matches!(
        SizedReader::new(&short_body[..]).read_record(),
        Err(StreamError::Truncated { expected: 5, actual: 2 })
    ));
}

#[test]
fn ciphertext_samples() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(41);
    let cts: Vec<CkksCiphertext> = enc.encrypt_sample(fx, &[1.0, 2.0, 3.0]);
    let mut writer: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    cts.iter().for_each(|ct| writer.write_ciphertext(ct).unwrap());
    let bytes: Vec<u8> = writer.into_inner();

    let mut reader: SizedReader<&[u8]> = SizedReader::new(bytes.as_slice());
    assert_eq!(reader.read_sample(1).unwrap(), Some(vec![cts[0].clone()]));
    // Two ciphertexts left, a sample of three is cut short.
    assert!(matches!(
        reader.read_sample(3),
        Err(StreamError::Truncated { expected: 3, actual: 2 })
    ));

    let mut reader: SizedReader<&[u8]> = SizedReader::new(bytes.as_slice());
    assert_eq!(reader.read_sample(3).unwrap(), Some(cts));
    assert_eq!(reader.read_sample(3).unwrap(), None);
}

#[test]
fn malformed_payloads() {
    let mut writer: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    writer.write_record(&[1, 2, 3]).unwrap();
    let bytes: Vec<u8> = writer.into_inner();
    assert!(matches!(
        SizedReader::new(bytes.as_slice()).read_ciphertext(),
        Err(StreamError::Malformed(_))
    ));

    let fx = fixture();
    let ct: CkksCiphertext = fx.encryptor(43).encrypt(fx, 5.0);
    let mut body: Vec<u8> = Vec::new();
    ct.write_to(&mut body).unwrap();
    body.push(0);
    let mut writer: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    writer.write_record(&body).unwrap();
    writer.write_verdict(&LweCiphertext::trivial(8, 1u32 << 29)).unwrap();
    let bytes: Vec<u8> = writer.into_inner();
    let mut reader: SizedReader<&[u8]> = SizedReader::new(bytes.as_slice());
    assert!(matches!(reader.read_ciphertext(), Err(StreamError::Malformed(msg)) if msg == "1 trailing bytes"));
    // Records stay framed after a bad payload.
    assert!(reader.read_record().unwrap().is_some());
    assert_eq!(reader.read_record().unwrap(), None);
}

#[test]
fn oversized_headers() {
    let mut body: Vec<u8> = Vec::new();
    body.write_u64::<LittleEndian>(1 << 62).unwrap();
    body.write_u64::<LittleEndian>(1 << 40).unwrap();
    body.write_u64::<LittleEndian>(0).unwrap();
    body.write_u32::<LittleEndian>(60).unwrap();
    body.write_f64::<LittleEndian>((2.0f64).powi(40)).unwrap();
    body.write_u64::<LittleEndian>(u64::MAX).unwrap();
    let mut writer: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    writer.write_record(&body).unwrap();
    let bytes: Vec<u8> = writer.into_inner();
    assert!(matches!(
        SizedReader::new(bytes.as_slice()).read_ciphertext(),
        Err(StreamError::Malformed(_))
    ));

    // A 4 GiB record announced by a 6 byte stream.
    let short: [u8; 6] = [0xff, 0xff, 0xff, 0xff, 1, 2];
    assert!(matches!(
        SizedReader::new(&short[..]).read_record(),
        Err(StreamError::Truncated {
            expected: 0xffff_ffff,
            actual: 2
        })
    ));
}

#[test]
fn plain_values() {
    let text: &str = "100 90.5\n  80\n\n-7e1\n";
    assert_eq!(read_plain_values(text.as_bytes()).unwrap(), vec![100.0, 90.5, 80.0, -70.0]);
    assert!(matches!(
        read_plain_values("1 2 x".as_bytes()),
        Err(StreamError::Malformed(_))
    ));
}
