//! Content sniffing for error messages
//!
//! Mimics the output of the `file` tool for the formats that turn up in
//! speech corpora, so a decode error can tell "wrong extension" apart from
//! "corrupt file".

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read from the head of a file.
const HEADER_LEN: usize = 64;

/// Describe `path` like `file <path>` would: `"<path>: <description>"`.
pub fn describe_file<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let description = match read_header(path) {
        Ok(header) => describe_bytes(&header),
        Err(e) => format!("cannot open `{}' ({e})", path.display()),
    };
    format!("{}: {description}", path.display())
}

/// Check whether `path` is a NIST SPHERE file. Missing files are not.
pub fn is_nist_sphere_file<P: AsRef<Path>>(path: P) -> bool {
    read_header(path.as_ref()).is_ok_and(|header| header.starts_with(b"NIST_1A"))
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    File::open(path)?
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    Ok(header)
}

/// Describe a file from its first bytes.
pub fn describe_bytes(header: &[u8]) -> String {
    if header.is_empty() {
        return "empty".to_string();
    }
    let at = |offset: usize, magic: &[u8]| header.get(offset..offset + magic.len()) == Some(magic);

    if at(0, b"RIFF") && at(8, b"WAVE") {
        return match describe_wave_format(header) {
            Some(details) => format!("RIFF (little-endian) data, WAVE audio, {details}"),
            None => "RIFF (little-endian) data, WAVE audio".to_string(),
        };
    }
    if at(0, b"RIFX") && at(8, b"WAVE") {
        return "RIFF (big-endian) data, WAVE audio".to_string();
    }
    if at(0, b"NIST_1A") {
        return "NIST SPHERE file".to_string();
    }
    if at(0, b"fLaC") {
        return "FLAC audio bitstream data".to_string();
    }
    if at(0, b"OggS") {
        return "Ogg data".to_string();
    }
    if at(0, b"ID3") {
        let version = header.get(3).copied().unwrap_or(0);
        return format!("Audio file with ID3 version 2.{version}.0");
    }
    if header.len() >= 2 && header[0] == 0xFF && header[1] & 0xE0 == 0xE0 {
        return "MPEG ADTS, layer III".to_string();
    }
    if at(4, b"ftyp") {
        let brand = header
            .get(8..12)
            .map(|b| String::from_utf8_lossy(b).trim_end().to_string())
            .unwrap_or_default();
        return match brand.as_str() {
            "M4A" => "ISO Media, Apple iTunes ALAC/AAC-LC (.M4A) Audio".to_string(),
            "" => "ISO Media".to_string(),
            brand => format!("ISO Media, brand {brand}"),
        };
    }
    if at(0, b"FORM") && (at(8, b"AIFF") || at(8, b"AIFC")) {
        return "IFF data, AIFF audio".to_string();
    }
    if at(0, b".snd") {
        return "Sun/NeXT audio data".to_string();
    }
    if at(0, b"\x93NUMPY") {
        let major = header.get(6).copied().unwrap_or(0);
        let minor = header.get(7).copied().unwrap_or(0);
        return format!("NumPy data file, version {major}.{minor}");
    }
    if header
        .iter()
        .all(|&b| b.is_ascii_graphic() || b.is_ascii_whitespace())
    {
        return "ASCII text".to_string();
    }
    "data".to_string()
}

/// `"Microsoft PCM, 16 bit, mono 16000 Hz"` from a canonical `fmt ` chunk.
fn describe_wave_format(header: &[u8]) -> Option<String> {
    if header.get(12..16)? != b"fmt " {
        return None;
    }
    let u16_at = |offset: usize| -> Option<u16> {
        Some(u16::from_le_bytes(header.get(offset..offset + 2)?.try_into().ok()?))
    };
    let u32_at = |offset: usize| -> Option<u32> {
        Some(u32::from_le_bytes(header.get(offset..offset + 4)?.try_into().ok()?))
    };
    let format = match u16_at(20)? {
        1 => "Microsoft PCM".to_string(),
        3 => "IEEE Float".to_string(),
        6 => "ITU G.711 A-law".to_string(),
        7 => "ITU G.711 mu-law".to_string(),
        0xFFFE => "WAVE_FORMAT_EXTENSIBLE".to_string(),
        other => format!("format 0x{other:x}"),
    };
    let channels = match u16_at(22)? {
        1 => "mono".to_string(),
        2 => "stereo".to_string(),
        n => format!("{n} channels"),
    };
    let sample_rate = u32_at(24)?;
    let bits = u16_at(34)?;
    Some(format!("{format}, {bits} bit, {channels} {sample_rate} Hz"))
}
