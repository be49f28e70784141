//! hinject - LICENSE HEADER INJECTOR
//!
//! 헤더 파일(라이선스 블록 등)의 내용을 대상 파일 묶음의 맨 앞에 삽입하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 📌 **헤더 삽입**: 헤더 + EOL + 원본 내용으로 대상 파일을 제자리에서 재작성
//! - 🔍 **파일셋 선택**: 기준 폴더 + include/exclude 글로브 패턴으로 대상 결정
//! - 📝 **EOL 정책**: cr/mac, lf/unix, crlf/dos 토큰 또는 플랫폼 기본값
//! - 🌐 **인코딩 변환**: UTF-8, ISO-8859-1, Windows-1252, UTF-16LE/BE
//! - 🔖 **태그 제거 변형**: 오픈 태그 마커 줄(`<?php` 등)을 제거하고 새 마커 줄을 헤더 앞에 출력
//! - ⏱️ **수정 시각 보존**: 처리 전 수정 시각을 처리 후 그대로 복원
//! - 🛡️ **실패 정책**: 첫 실패에서 중단(기본값) 또는 기록하고 계속 진행
//! - 📊 **상세 통계**: 성공/실패 파일 수, 입출력 용량, 성공률 등 표시
//! - 🧪 **드라이런 모드**: 실제 수정 없이 처리될 파일 목록 미리 확인
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! hinject -H LICENSE -d src -i "*.txt"
//!
//! # 단일 파일
//! hinject -H LICENSE -t notes.txt --eol lf
//!
//! # PHP 파일의 오픈 태그 뒤에 헤더 삽입
//! hinject -H LICENSE -d src -i "*.php" --strip-tag "<?php"
//! ```

pub mod cli;
pub mod encoding;
pub mod eol;
pub mod error;
pub mod fileset;
pub mod header;
pub mod injector;
pub mod stats;

// Re-exports for convenient access
pub use cli::Args;
pub use encoding::Encoding;
pub use eol::Eol;
pub use error::{HInjectError, Result};
pub use fileset::{FileSet, PatternSet};
pub use header::Header;
pub use injector::{InjectOptions, InjectResult, Injector, RunReport, Targets, Variant};
pub use stats::{format_bytes, Statistics};
