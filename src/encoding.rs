//! 텍스트 인코딩 모듈
//!
//! 헤더와 대상 파일의 문자 인코딩 변환을 담당합니다.
//! UTF-8, Latin-1 (ISO-8859-1), Windows-1252, UTF-16LE/BE를 지원합니다.

use std::fmt;

use crate::error::{HInjectError, Result};

/// Windows-1252의 0x80..=0x9F 구간 매핑 (0은 정의되지 않은 바이트)
const WINDOWS1252_80_9F: [u16; 32] = [
    0x20AC, 0x0000, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x0000, 0x017D, 0x0000, //
    0x0000, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x0000, 0x017E, 0x0178,
];

/// 지원하는 텍스트 인코딩
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 (기본값)
    #[default]
    Utf8,
    /// ISO-8859-1
    Latin1,
    /// Windows-1252 (CP1252)
    Windows1252,
    /// UTF-16 Little Endian
    Utf16Le,
    /// UTF-16 Big Endian
    Utf16Be,
}

impl Encoding {
    /// 인코딩 이름에서 인코딩 생성
    ///
    /// 대소문자와 `-`/`_` 구분을 무시합니다 (`UTF-8`, `utf8`, `iso-8859-1`,
    /// `cp1252` 등). 알 수 없는 이름은 설정 에러입니다.
    pub fn from_name(name: &str) -> Result<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "utf8" => Ok(Encoding::Utf8),
            "latin1" | "iso88591" => Ok(Encoding::Latin1),
            "windows1252" | "cp1252" => Ok(Encoding::Windows1252),
            "utf16" | "utf16le" => Ok(Encoding::Utf16Le),
            "utf16be" => Ok(Encoding::Utf16Be),
            _ => Err(HInjectError::UnknownEncoding {
                name: name.to_string(),
            }),
        }
    }

    /// 바이트열을 이 인코딩으로 해석하여 문자열로 디코딩
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                HInjectError::Decode {
                    encoding: self.to_string(),
                    reason: e.to_string(),
                }
            }),
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Encoding::Windows1252 => decode_windows1252(bytes),
            Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes, self),
            Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes, self),
        }
    }

    /// 문자열을 이 인코딩의 바이트열로 인코딩
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(c as u32).map_err(|_| self.unmappable(c))
                })
                .collect(),
            Encoding::Windows1252 => text
                .chars()
                .map(|c| encode_windows1252_char(c).ok_or_else(|| self.unmappable(c)))
                .collect(),
            Encoding::Utf16Le => Ok(text
                .encode_utf16()
                .flat_map(|u| u.to_le_bytes())
                .collect()),
            Encoding::Utf16Be => Ok(text
                .encode_utf16()
                .flat_map(|u| u.to_be_bytes())
                .collect()),
        }
    }

    fn unmappable(&self, c: char) -> HInjectError {
        HInjectError::Encode {
            encoding: self.to_string(),
            reason: format!("표현할 수 없는 문자: {:?}", c),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "UTF-8"),
            Encoding::Latin1 => write!(f, "ISO-8859-1"),
            Encoding::Windows1252 => write!(f, "Windows-1252"),
            Encoding::Utf16Le => write!(f, "UTF-16LE"),
            Encoding::Utf16Be => write!(f, "UTF-16BE"),
        }
    }
}

fn decode_windows1252(bytes: &[u8]) -> Result<String> {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => {
                let code = WINDOWS1252_80_9F[(b - 0x80) as usize];
                if code == 0 {
                    Err(HInjectError::Decode {
                        encoding: Encoding::Windows1252.to_string(),
                        reason: format!("정의되지 않은 바이트: 0x{:02X}", b),
                    })
                } else {
                    // 테이블 값은 모두 유효한 BMP 코드 포인트
                    Ok(char::from_u32(code as u32).unwrap_or('\u{FFFD}'))
                }
            }
            _ => Ok(b as char),
        })
        .collect()
}

fn encode_windows1252_char(c: char) -> Option<u8> {
    let code = c as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    WINDOWS1252_80_9F
        .iter()
        .position(|&u| u != 0 && u as u32 == code)
        .map(|i| 0x80 + i as u8)
}

/// UTF-16 디코딩: 선행 BOM이 있으면 건너뜁니다.
fn decode_utf16(
    bytes: &[u8],
    combine: fn([u8; 2]) -> u16,
    encoding: &Encoding,
) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(HInjectError::Decode {
            encoding: encoding.to_string(),
            reason: format!("바이트 길이가 홀수입니다: {}", bytes.len()),
        });
    }

    let mut units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();

    if units.first() == Some(&0xFEFF) {
        units.remove(0);
    }

    String::from_utf16(&units).map_err(|e| HInjectError::Decode {
        encoding: encoding.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(Encoding::from_name("utf-8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::from_name("UTF8").unwrap(), Encoding::Utf8);
        assert_eq!(Encoding::from_name("latin-1").unwrap(), Encoding::Latin1);
        assert_eq!(Encoding::from_name("ISO-8859-1").unwrap(), Encoding::Latin1);
        assert_eq!(
            Encoding::from_name("cp1252").unwrap(),
            Encoding::Windows1252
        );
        assert_eq!(
            Encoding::from_name("Windows-1252").unwrap(),
            Encoding::Windows1252
        );
        assert_eq!(Encoding::from_name("utf-16le").unwrap(), Encoding::Utf16Le);
        assert_eq!(Encoding::from_name("UTF-16BE").unwrap(), Encoding::Utf16Be);
    }

    #[test]
    fn test_from_name_unknown() {
        let result = Encoding::from_name("euc-kr");
        assert!(matches!(
            result,
            Err(HInjectError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_latin1_roundtrip() {
        let bytes = [0x63, 0x61, 0x66, 0xE9]; // "café"
        let text = Encoding::Latin1.decode(&bytes).unwrap();
        assert_eq!(text, "café");
        assert_eq!(Encoding::Latin1.encode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_latin1_unmappable() {
        let result = Encoding::Latin1.encode("€");
        assert!(matches!(result, Err(HInjectError::Encode { .. })));
    }

    #[test]
    fn test_windows1252_euro() {
        let text = Encoding::Windows1252.decode(&[0x80]).unwrap();
        assert_eq!(text, "€");
        assert_eq!(Encoding::Windows1252.encode("€").unwrap(), vec![0x80]);
    }

    #[test]
    fn test_windows1252_undefined_byte() {
        let result = Encoding::Windows1252.decode(&[0x41, 0x8D]);
        assert!(matches!(result, Err(HInjectError::Decode { .. })));
    }

    #[test]
    fn test_utf8_invalid() {
        let result = Encoding::Utf8.decode(&[0xFF, 0xFE, 0x41]);
        assert!(matches!(result, Err(HInjectError::Decode { .. })));
    }

    #[test]
    fn test_utf16le_roundtrip() {
        let bytes = Encoding::Utf16Le.encode("A한").unwrap();
        assert_eq!(bytes, vec![0x41, 0x00, 0x5C, 0xD5]);
        assert_eq!(Encoding::Utf16Le.decode(&bytes).unwrap(), "A한");
    }

    #[test]
    fn test_utf16_bom_skipped() {
        let le = [0xFF, 0xFE, 0x41, 0x00];
        assert_eq!(Encoding::Utf16Le.decode(&le).unwrap(), "A");

        let be = [0xFE, 0xFF, 0x00, 0x41];
        assert_eq!(Encoding::Utf16Be.decode(&be).unwrap(), "A");
    }

    #[test]
    fn test_utf16_odd_length() {
        let result = Encoding::Utf16Le.decode(&[0x41, 0x00, 0x42]);
        assert!(matches!(result, Err(HInjectError::Decode { .. })));
    }
}
