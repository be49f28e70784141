//! EOL(줄 끝) 정책 모듈
//!
//! 헤더와 본문을 이어 붙일 때 사용할 줄 끝 문자열을 결정합니다.

use std::fmt;

/// 줄 끝 정책
///
/// 토큰으로 선택합니다 (대소문자 무시):
/// `cr`/`mac`, `lf`/`unix`, `crlf`/`dos`, 그 외에는 플랫폼 기본값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Eol {
    /// Carriage Return (\r)
    Cr,
    /// Line Feed (\n)
    Lf,
    /// Carriage Return + Line Feed (\r\n)
    CrLf,
    /// 플랫폼 기본값 (Windows는 \r\n, 그 외에는 \n)
    #[default]
    Platform,
}

impl Eol {
    /// 토큰 문자열에서 EOL 정책 생성
    ///
    /// 알 수 없는 토큰은 에러가 아니라 플랫폼 기본값으로 처리합니다.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "cr" | "mac" => Eol::Cr,
            "lf" | "unix" => Eol::Lf,
            "crlf" | "dos" => Eol::CrLf,
            _ => Eol::Platform,
        }
    }

    /// 실제 줄 끝 문자열 반환
    pub fn as_str(&self) -> &'static str {
        match self {
            Eol::Cr => "\r",
            Eol::Lf => "\n",
            Eol::CrLf => "\r\n",
            Eol::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

impl fmt::Display for Eol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eol::Cr => write!(f, "cr"),
            Eol::Lf => write!(f, "lf"),
            Eol::CrLf => write!(f, "crlf"),
            Eol::Platform => write!(f, "platform"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_cr() {
        assert_eq!(Eol::from_token("cr"), Eol::Cr);
        assert_eq!(Eol::from_token("mac"), Eol::Cr);
        assert_eq!(Eol::Cr.as_str(), "\r");
    }

    #[test]
    fn test_from_token_lf() {
        assert_eq!(Eol::from_token("lf"), Eol::Lf);
        assert_eq!(Eol::from_token("unix"), Eol::Lf);
        assert_eq!(Eol::Lf.as_str(), "\n");
    }

    #[test]
    fn test_from_token_crlf() {
        assert_eq!(Eol::from_token("crlf"), Eol::CrLf);
        assert_eq!(Eol::from_token("dos"), Eol::CrLf);
        assert_eq!(Eol::CrLf.as_str(), "\r\n");
    }

    #[test]
    fn test_from_token_case_insensitive() {
        assert_eq!(Eol::from_token("CRLF"), Eol::CrLf);
        assert_eq!(Eol::from_token("Unix"), Eol::Lf);
        assert_eq!(Eol::from_token("MAC"), Eol::Cr);
    }

    #[test]
    fn test_from_token_unknown_is_platform() {
        assert_eq!(Eol::from_token("native"), Eol::Platform);
        assert_eq!(Eol::from_token(""), Eol::Platform);

        let expected = if cfg!(windows) { "\r\n" } else { "\n" };
        assert_eq!(Eol::Platform.as_str(), expected);
    }
}
