//! 헤더 주입 모듈
//!
//! 설정 검증, 헤더 로드, 대상 파일별 읽기-변환-쓰기 순차 처리를 담당합니다.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::encoding::Encoding;
use crate::eol::Eol;
use crate::error::{HInjectError, Result};
use crate::fileset::FileSet;
use crate::header::Header;

/// 대상 선택 모드
///
/// 단일 대상 파일 또는 파일셋 목록 중 정확히 하나만 유효합니다.
#[derive(Debug, Clone)]
pub enum Targets {
    /// 단일 대상 파일
    Single(PathBuf),
    /// 하나 이상의 파일셋
    Sets(Vec<FileSet>),
}

/// 변환 변형: 그대로 붙이기 vs 오픈 태그 제거 후 붙이기
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Variant {
    /// 헤더 + EOL + 원본 내용
    #[default]
    Plain,
    /// 마커가 포함된 첫 줄을 제거하고 새 마커 줄을 헤더 앞에 출력
    StripTag {
        /// 오픈 태그 마커 (예: `<?php`)
        marker: String,
    },
}

/// 주입 옵션
#[derive(Debug, Clone)]
pub struct InjectOptions {
    /// 줄 끝 정책
    pub eol: Eol,
    /// 헤더 리소스의 원본 인코딩
    pub encoding: Encoding,
    /// 출력 인코딩 (Plain 변형에서만 헤더에 적용)
    pub to_encoding: Encoding,
    /// 변환 변형
    pub variant: Variant,
    /// 대상 하나가 실패하면 배치 전체를 중단할지 여부 (기본값: true)
    pub fail_on_error: bool,
    /// 수정 시각 보존 여부
    pub preserve_last_modified: bool,
    /// 상세 로그 출력 여부
    pub verbose: bool,
    /// 진행률 바 표시 여부
    pub progress: bool,
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            eol: Eol::Platform,
            encoding: Encoding::Utf8,
            to_encoding: Encoding::Utf8,
            variant: Variant::Plain,
            fail_on_error: true,
            preserve_last_modified: false,
            verbose: false,
            progress: false,
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }
}

impl InjectOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 줄 끝 정책 설정
    pub fn with_eol(mut self, eol: Eol) -> Self {
        self.eol = eol;
        self
    }

    /// 헤더 원본 인코딩 설정
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// 출력 인코딩 설정
    pub fn with_to_encoding(mut self, to_encoding: Encoding) -> Self {
        self.to_encoding = to_encoding;
        self
    }

    /// 변환 변형 설정
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// 실패 정책 설정
    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }

    /// 수정 시각 보존 설정
    pub fn with_preserve_last_modified(mut self, preserve: bool) -> Self {
        self.preserve_last_modified = preserve;
        self
    }

    /// 상세 로그 설정
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 진행률 바 설정
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// 대상 파일별 처리 결과
#[derive(Debug)]
pub struct InjectResult {
    /// 처리된 파일 경로
    pub path: PathBuf,
    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
    /// 읽은 바이트
    pub bytes_read: u64,
    /// 쓴 바이트
    pub bytes_written: u64,
    /// 제거된 오픈 태그의 1-기반 (행, 열). 열은 행 안의 바이트 오프셋 + 1.
    pub tag_location: Option<(usize, usize)>,
    /// 본문이 비어 있었는지 여부
    pub no_content: bool,
}

impl InjectResult {
    /// 성공 결과 생성
    pub fn success(
        path: PathBuf,
        bytes_read: u64,
        bytes_written: u64,
        tag_location: Option<(usize, usize)>,
        no_content: bool,
    ) -> Self {
        Self {
            path,
            error: None,
            bytes_read,
            bytes_written,
            tag_location,
            no_content,
        }
    }

    /// 실패 결과 생성
    pub fn failure(path: PathBuf, error: String) -> Self {
        Self {
            path,
            error: Some(error),
            bytes_read: 0,
            bytes_written: 0,
            tag_location: None,
            no_content: false,
        }
    }

    /// 성공 여부
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 실행 보고서
///
/// fail-on-error를 끈 실행에서도 실패 내역을 로그가 아닌 구조로 제공합니다.
#[derive(Debug, Default)]
pub struct RunReport {
    /// 처리 순서대로의 대상별 결과
    pub results: Vec<InjectResult>,
}

impl RunReport {
    /// 새 보고서 생성
    pub fn new(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    /// 결과 추가
    pub fn push(&mut self, result: InjectResult) {
        self.results.push(result);
    }

    /// 성공한 대상 수
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// 실패한 대상 수
    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// 실패한 결과만 순회
    pub fn failures(&self) -> impl Iterator<Item = &InjectResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// 읽은 총 바이트
    pub fn total_bytes_read(&self) -> u64 {
        self.results.iter().map(|r| r.bytes_read).sum()
    }

    /// 쓴 총 바이트
    pub fn total_bytes_written(&self) -> u64 {
        self.results.iter().map(|r| r.bytes_written).sum()
    }
}

/// 헤더 주입기
///
/// 설정을 검증하고 헤더를 로드한 뒤 대상 파일을 순서대로 하나씩 처리합니다.
///
/// # Examples
/// ```no_run
/// use hinject::fileset::FileSet;
/// use hinject::injector::{InjectOptions, Injector};
///
/// let report = Injector::new()
///     .header("LICENSE")
///     .fileset(FileSet::new("src").with_includes(vec!["*.rs".to_string()]))
///     .options(InjectOptions::new())
///     .run()
///     .unwrap();
/// assert_eq!(report.failure_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Injector {
    header_path: Option<PathBuf>,
    to_file: Option<PathBuf>,
    filesets: Vec<FileSet>,
    options: InjectOptions,
}

impl Injector {
    /// 새 주입기 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 헤더 리소스 경로 설정
    pub fn header(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_path = Some(path.into());
        self
    }

    /// 단일 대상 파일 설정 (파일셋과 배타적)
    pub fn to_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.to_file = Some(path.into());
        self
    }

    /// 파일셋 추가
    pub fn fileset(mut self, fileset: FileSet) -> Self {
        self.filesets.push(fileset);
        self
    }

    /// 옵션 설정
    pub fn options(mut self, options: InjectOptions) -> Self {
        self.options = options;
        self
    }

    /// 설정 검증 (대상 파일 I/O 전에 수행)
    pub fn validate(&self) -> Result<()> {
        let header = self.header_path.as_ref().ok_or(HInjectError::HeaderNotSet)?;

        if self.to_file.is_none() && self.filesets.is_empty() {
            return Err(HInjectError::NoTargets);
        }
        if self.to_file.is_some() && !self.filesets.is_empty() {
            return Err(HInjectError::AmbiguousTargets);
        }

        if !header.exists() {
            return Err(HInjectError::HeaderNotFound {
                path: header.clone(),
            });
        }
        if header.is_dir() {
            return Err(HInjectError::HeaderIsDirectory {
                path: header.clone(),
            });
        }

        Ok(())
    }

    /// 검증 후 대상 선택 모드 반환
    pub fn selector(&self) -> Result<Targets> {
        self.validate()?;

        Ok(match &self.to_file {
            Some(path) => Targets::Single(path.clone()),
            None => Targets::Sets(self.filesets.clone()),
        })
    }

    /// 검증 후 전체 대상 파일 목록을 처리 순서대로 반환
    ///
    /// 파일셋 모드에서는 파일셋 설정 순서, 그 안에서는 정렬된 탐색 순서입니다.
    pub fn resolve_targets(&self) -> Result<Vec<PathBuf>> {
        match self.selector()? {
            Targets::Single(path) => Ok(vec![path]),
            Targets::Sets(sets) => {
                let mut paths = Vec::new();
                for set in &sets {
                    paths.extend(set.resolve()?);
                }
                Ok(paths)
            }
        }
    }

    /// 검증, 헤더 로드, 배치 처리까지 전체 실행
    pub fn run(&self) -> Result<RunReport> {
        let targets = self.resolve_targets()?;
        self.run_targets(&targets)
    }

    /// 미리 결정된 대상 목록에 대해 배치 처리 실행
    ///
    /// 대상은 엄격히 순차적으로 하나씩 처리됩니다. fail-on-error 모드에서는
    /// 첫 실패에서 해당 경로를 지목하는 에러로 즉시 중단합니다 - 이미 처리된
    /// 파일은 수정된 채 남고 이후 파일은 건드리지 않습니다.
    pub fn run_targets(&self, targets: &[PathBuf]) -> Result<RunReport> {
        let header = self.load_header()?;
        let header_out = self.options.to_encoding.encode(&header.text)?;

        let pb = if self.options.progress {
            Some(create_progress_bar(targets.len()))
        } else {
            None
        };

        let mut report = RunReport::new(targets.len());

        for path in targets {
            let result = self.inject_file(path, &header, &header_out);

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            if let Some(reason) = &result.error {
                if self.options.fail_on_error {
                    if let Some(ref pb) = pb {
                        pb.finish_and_clear();
                    }
                    return Err(HInjectError::Batch {
                        file: path.clone(),
                        reason: reason.clone(),
                    });
                }
                println!("  {} 실패: {:?} - {}", "❌".bright_red(), path, reason);
            }

            report.push(result);
        }

        if let Some(ref pb) = pb {
            pb.finish_with_message("완료!");
        }

        Ok(report)
    }

    /// 헤더 로드 및 로드 로그/빈 헤더 경고 출력
    fn load_header(&self) -> Result<Header> {
        let path = self.header_path.as_ref().ok_or(HInjectError::HeaderNotSet)?;
        let header = Header::load(path, self.options.encoding)?;

        if self.options.verbose {
            println!(
                "  {} 헤더 로드: {:?} ({} 바이트)",
                "📖".bright_cyan(),
                header.path,
                header.byte_len
            );
        }
        if header.is_empty() {
            println!(
                "{}",
                format!("⚠️ 헤더 파일이 비어 있습니다: {:?}", header.path).yellow()
            );
        }

        Ok(header)
    }

    /// 단일 대상 처리 (에러를 결과로 수집)
    fn inject_file(&self, path: &Path, header: &Header, header_out: &[u8]) -> InjectResult {
        match self.inject_file_inner(path, header, header_out) {
            Ok(result) => result,
            Err(e) => InjectResult::failure(path.to_path_buf(), e.to_string()),
        }
    }

    /// 내부 처리 로직: 읽기 - 변환 - 쓰기
    fn inject_file_inner(
        &self,
        path: &Path,
        header: &Header,
        header_out: &[u8],
    ) -> Result<InjectResult> {
        let opts = &self.options;

        if opts.verbose {
            println!("  {} 읽는 중: {:?}", "📖".bright_cyan(), path);
        }

        let raw = read_bytes(path, opts.mmap_threshold).map_err(|e| {
            HInjectError::TargetRead {
                file: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let bytes_read = raw.len() as u64;
        let eol = opts.eol.as_str();

        let (output, tag_location, no_content) = match &opts.variant {
            Variant::Plain => {
                let no_content = raw.is_empty();
                let mut output =
                    Vec::with_capacity(header_out.len() + eol.len() + raw.len());
                output.extend_from_slice(header_out);
                output.extend_from_slice(eol.as_bytes());
                output.extend_from_slice(&raw);
                (output, None, no_content)
            }
            Variant::StripTag { marker } => {
                // 태그 제거 변형은 UTF-8 대상만 다룬다 (출력 인코딩 미적용)
                let text =
                    String::from_utf8(raw).map_err(|e| HInjectError::TargetRead {
                        file: path.to_path_buf(),
                        reason: format!("UTF-8 디코딩 실패: {}", e),
                    })?;

                let mut lines: Vec<&str> = text.lines().collect();

                let found = lines
                    .iter()
                    .enumerate()
                    .find_map(|(i, line)| line.find(marker.as_str()).map(|pos| (i, pos)));

                let tag_location = found.map(|(i, pos)| (i + 1, pos + 1));
                if let Some((i, _)) = found {
                    lines.remove(i);
                }

                if let Some((line, col)) = tag_location {
                    if opts.verbose {
                        println!(
                            "    {} 오픈 태그 발견: {}행 {}열",
                            "🔖".bright_magenta(),
                            line,
                            col
                        );
                    }
                }

                let no_content = lines.is_empty();
                let body = match lines.len() {
                    0 => String::new(),
                    1 => lines[0].to_string(),
                    _ => lines.join(eol),
                };

                let mut output = String::with_capacity(
                    marker.len() + header.text.len() + body.len() + eol.len() * 2,
                );
                output.push_str(marker);
                output.push_str(eol);
                output.push_str(&header.text);
                output.push_str(eol);
                output.push_str(&body);

                (output.into_bytes(), tag_location, no_content)
            }
        };

        if no_content && opts.verbose {
            println!("    {} 쓸 내용이 없습니다: {:?}", "⚠️".bright_yellow(), path);
        }

        if opts.verbose {
            println!("  {} 쓰는 중: {:?}", "💾".bright_green(), path);
        }

        let mtime = if opts.preserve_last_modified {
            let modified = fs::metadata(path)
                .and_then(|m| m.modified())
                .map_err(|e| HInjectError::TargetRead {
                    file: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            Some(modified)
        } else {
            None
        };

        fs::write(path, &output).map_err(|e| HInjectError::TargetWrite {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(mtime) = mtime {
            restore_mtime(path, mtime)?;
        }

        Ok(InjectResult::success(
            path.to_path_buf(),
            bytes_read,
            output.len() as u64,
            tag_location,
            no_content,
        ))
    }
}

/// 파일 전체 읽기
///
/// 임계값 이상이면 메모리 매핑을 사용하되, 같은 파일을 다시 쓰기 전에
/// 매핑이 해제되도록 내용을 복사해서 반환합니다.
fn read_bytes(path: &Path, mmap_threshold: u64) -> io::Result<Vec<u8>> {
    let size = fs::metadata(path)?.len();

    if size >= mmap_threshold {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(mmap.to_vec())
    } else {
        fs::read(path)
    }
}

/// 쓰기 완료 후 원래 수정 시각 복원
fn restore_mtime(path: &Path, mtime: std::time::SystemTime) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| HInjectError::TargetWrite {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    file.set_modified(mtime).map_err(|e| HInjectError::TargetWrite {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb
}
