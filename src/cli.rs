//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::fileset::FileSet;

/// hinject CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "hinject",
    author = "YourName <your@email.com>",
    version,
    about = "LICENSE HEADER INJECTOR - 파일 묶음 맨 앞에 헤더(라이선스 블록)를 일괄 삽입하는 CLI 도구",
    long_about = r#"
LICENSE HEADER INJECTOR
=======================

헤더 파일(라이선스 블록 등)의 내용을 대상 파일들의 맨 앞에 삽입합니다.
단일 파일 또는 폴더 + 글로브 패턴으로 대상을 지정할 수 있습니다.

특징:
  • EOL 정책 선택 (cr/mac, lf/unix, crlf/dos, 기본값은 플랫폼)
  • 헤더 인코딩 변환 (UTF-8, ISO-8859-1, Windows-1252, UTF-16)
  • 오픈 태그 제거 변형 (<?php 등 마커 줄을 제거하고 새로 출력)
  • 수정 시각 보존 옵션
  • 실패 시 중단 또는 계속 진행 정책 선택

예제:
  hinject -H LICENSE -t src/main.txt
  hinject -H LICENSE -d src -i "*.txt"
  hinject -H LICENSE -d src -i "*.php" --strip-tag "<?php" --eol lf
  hinject -H LICENSE -d src -i "*.txt" --keep-going --verbose
  hinject -H LICENSE -d src --dry-run
"#
)]
pub struct Args {
    /// 삽입할 헤더 파일 경로
    #[arg(short = 'H', long)]
    pub header: PathBuf,

    /// 단일 대상 파일 (폴더 지정과 배타적)
    #[arg(short, long)]
    pub to_file: Option<PathBuf>,

    /// 대상 폴더 (반복 지정 가능, 각 폴더가 하나의 파일셋)
    #[arg(short, long)]
    pub dir: Vec<PathBuf>,

    /// include 글로브 패턴 (반복 지정 가능, 없으면 전체 파일)
    #[arg(short, long)]
    pub include: Vec<String>,

    /// exclude 글로브 패턴 (반복 지정 가능)
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,

    /// 줄 끝 정책: cr/mac, lf/unix, crlf/dos (그 외에는 플랫폼 기본값)
    #[arg(long)]
    pub eol: Option<String>,

    /// 헤더 파일의 원본 인코딩
    #[arg(short, long, default_value = "utf-8")]
    pub encoding: String,

    /// 출력 인코딩 (헤더 변환용, 태그 제거 변형에서는 미적용)
    #[arg(long, default_value = "utf-8")]
    pub to_encoding: String,

    /// 오픈 태그 마커 (지정 시 태그 제거 변형으로 동작, 예: "<?php")
    #[arg(long)]
    pub strip_tag: Option<String>,

    /// 대상 하나가 실패해도 나머지를 계속 처리
    #[arg(short, long)]
    pub keep_going: bool,

    /// 대상 파일의 수정 시각 보존
    #[arg(short, long)]
    pub preserve_last_modified: bool,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 수정 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 최대 폴더 탐색 깊이
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Args {
    /// 폴더 인자들을 파일셋 목록으로 변환
    ///
    /// 모든 폴더가 같은 include/exclude 패턴과 탐색 깊이를 공유합니다.
    pub fn filesets(&self) -> Vec<FileSet> {
        self.dir
            .iter()
            .map(|dir| {
                FileSet::new(dir)
                    .with_includes(self.include.clone())
                    .with_excludes(self.exclude.clone())
                    .with_max_depth(self.max_depth)
            })
            .collect()
    }
}
