//! Binary and text file formats for keys and benchmark fixtures. Native
//! endianness is fixed to little-endian, since that is what every
//! mainstream target this crate builds for actually uses.

use std::io::{BufRead, BufReader, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use num_bigint::BigUint;

use crate::bm::BMPublicKey;
use crate::curve::{g1_from_bytes, g1_to_bytes, g2_from_bytes, g2_to_bytes, Scalar};
use crate::error::{AccumulatorError, Result};

/// BM secret key file: the scalar's 4 little-endian 64-bit limbs.
pub fn write_bm_secret_key<W: Write>(w: &mut W, secret: &Scalar) -> Result<()> {
    let bytes = secret.to_bytes_le();
    debug_assert_eq!(bytes.len(), 32);
    w.write_all(&bytes)?;
    Ok(())
}

pub fn read_bm_secret_key<R: Read>(r: &mut R) -> Result<Scalar> {
    let mut limbs = [0u8; 32];
    r.read_exact(&mut limbs)?;
    let opt = Scalar::from_bytes_le(&limbs);
    if opt.is_some().into() {
        Ok(opt.unwrap())
    } else {
        Err(AccumulatorError::ParseError(
            "BM secret key bytes do not encode a reduced scalar".to_string(),
        ))
    }
}

/// BM public key file: a `u64` length prefix `q`, then `q` G1 elements,
/// then `q` G2 elements, each serialized at the group's fixed
/// `byte_size()`.
pub fn write_bm_public_key<W: Write>(w: &mut W, pk: &BMPublicKey) -> Result<()> {
    let q = pk.g1_powers.len() as u64;
    w.write_u64::<LittleEndian>(q)?;
    for g in &pk.g1_powers {
        w.write_all(&g1_to_bytes(g))?;
    }
    for g in &pk.g2_powers {
        w.write_all(&g2_to_bytes(g))?;
    }
    Ok(())
}

pub fn read_bm_public_key<R: Read>(r: &mut R) -> Result<BMPublicKey> {
    let q = r.read_u64::<LittleEndian>()? as usize;
    let mut g1_powers = Vec::with_capacity(q);
    for _ in 0..q {
        let mut buf = [0u8; crate::curve::G1_BYTE_SIZE];
        r.read_exact(&mut buf)?;
        g1_powers.push(g1_from_bytes(&buf).ok_or_else(|| {
            AccumulatorError::ParseError("malformed G1 element in public key file".to_string())
        })?);
    }
    let mut g2_powers = Vec::with_capacity(q);
    for _ in 0..q {
        let mut buf = [0u8; crate::curve::G2_BYTE_SIZE];
        r.read_exact(&mut buf)?;
        g2_powers.push(g2_from_bytes(&buf).ok_or_else(|| {
            AccumulatorError::ParseError("malformed G2 element in public key file".to_string())
        })?);
    }
    Ok(BMPublicKey { g1_powers, g2_powers })
}

/// Random-scalar benchmark fixture: a concatenation of fixed-width scalar
/// serializations, one per element.
pub fn write_random_scalars<W: Write>(w: &mut W, scalars: &[Scalar]) -> Result<()> {
    for s in scalars {
        w.write_all(&s.to_bytes_le())?;
    }
    Ok(())
}

pub fn read_random_scalars<R: Read>(r: &mut R) -> Result<Vec<Scalar>> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    if bytes.len() % 32 != 0 {
        return Err(AccumulatorError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "random scalar file is truncated (length not a multiple of 32 bytes)",
        )));
    }
    let mut out = Vec::with_capacity(bytes.len() / 32);
    for chunk in bytes.chunks_exact(32) {
        let limbs: [u8; 32] = chunk.try_into().expect("chunks_exact(32) yields 32-byte slices");
        let opt = Scalar::from_bytes_le(&limbs);
        if opt.is_some().into() {
            out.push(opt.unwrap());
        } else {
            return Err(AccumulatorError::ParseError(
                "random scalar file contains an unreduced scalar".to_string(),
            ));
        }
    }
    Ok(out)
}

/// Random-bigint benchmark fixture: ASCII base-10, one integer per line.
pub fn write_random_bigints<W: Write>(w: &mut W, values: &[BigUint]) -> Result<()> {
    for v in values {
        writeln!(w, "{}", v)?;
    }
    Ok(())
}

pub fn read_random_bigints<R: Read>(r: R) -> Result<Vec<BigUint>> {
    let reader = BufReader::new(r);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: BigUint = line
            .parse()
            .map_err(|_| AccumulatorError::ParseError(format!("not a base-10 integer: {:?}", line)))?;
        out.push(value);
    }
    Ok(out)
}
