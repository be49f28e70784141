//! hinject - LICENSE HEADER INJECTOR
//!
//! 메인 엔트리포인트

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use hinject::{
    cli::Args,
    encoding::Encoding,
    eol::Eol,
    injector::{InjectOptions, Injector, Variant},
    stats::Statistics,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // 주입기 구성 및 설정 검증
    let injector = build_injector(&args).map_err(|e| anyhow::anyhow!("{}", e))?;
    injector.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    // 배너 출력
    print_header(&args);

    // 대상 파일 수집
    let targets = injector
        .resolve_targets()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if targets.is_empty() {
        println!("{}", "⚠️ 처리할 파일이 없습니다.".yellow());
        return Ok(());
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        targets.len().to_string().bright_green()
    );

    // 통계 초기화
    let stats = Statistics::new(targets.len());

    // 드라이런 모드
    if args.dry_run {
        print_dry_run(&targets);
        return Ok(());
    }

    // 배치 처리
    println!("\n{}", "🖋️ 헤더 삽입 중...".bright_cyan());

    let report = injector
        .run_targets(&targets)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // 결과 집계
    for result in &report.results {
        if result.is_success() {
            stats.increment_success();
            stats.add_bytes_read(result.bytes_read);
            stats.add_bytes_written(result.bytes_written);

            if args.verbose {
                println!(
                    "  {} {:?}",
                    "✓".green(),
                    result.path.file_name().unwrap_or_default()
                );
            }
        } else {
            stats.increment_error();
        }
    }

    // 에러 출력
    let errors: Vec<(PathBuf, String)> = report
        .failures()
        .map(|r| (r.path.clone(), r.error.clone().unwrap_or_default()))
        .collect();
    print_errors(&errors, args.verbose);

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)?;
    }

    // 통계 출력
    stats.print_summary();

    println!("\n{} 처리 완료\n", "✅".bright_green());

    Ok(())
}

/// CLI 인자로부터 주입기 구성
fn build_injector(args: &Args) -> hinject::Result<Injector> {
    let encoding = Encoding::from_name(&args.encoding)?;
    let to_encoding = Encoding::from_name(&args.to_encoding)?;
    let eol = args.eol.as_deref().map(Eol::from_token).unwrap_or_default();

    let variant = match &args.strip_tag {
        Some(marker) => Variant::StripTag {
            marker: marker.clone(),
        },
        None => Variant::Plain,
    };

    let options = InjectOptions::new()
        .with_eol(eol)
        .with_encoding(encoding)
        .with_to_encoding(to_encoding)
        .with_variant(variant)
        .with_fail_on_error(!args.keep_going)
        .with_preserve_last_modified(args.preserve_last_modified)
        .with_verbose(args.verbose)
        .with_progress(true);

    let mut injector = Injector::new().header(&args.header).options(options);

    if let Some(ref to_file) = args.to_file {
        injector = injector.to_file(to_file);
    }
    for fileset in args.filesets() {
        injector = injector.fileset(fileset);
    }

    Ok(injector)
}

/// 배너 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🧾 LICENSE HEADER INJECTOR".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 헤더 파일: {:?}", "📄".bright_cyan(), args.header);

    if let Some(ref to_file) = args.to_file {
        println!("  {} 대상 파일: {:?}", "🎯".bright_green(), to_file);
    }
    for dir in &args.dir {
        println!("  {} 대상 폴더: {:?}", "📂".bright_green(), dir);
    }

    if !args.include.is_empty() {
        println!(
            "  {} include 패턴: {}",
            "🔍".bright_magenta(),
            args.include.join(", ")
        );
    }
    if !args.exclude.is_empty() {
        println!(
            "  {} exclude 패턴: {}",
            "🚫".bright_magenta(),
            args.exclude.join(", ")
        );
    }

    if let Some(ref eol) = args.eol {
        println!("  {} EOL: {}", "📝".bright_yellow(), eol);
    }
    println!("  {} 헤더 인코딩: {}", "🌐".bright_cyan(), args.encoding);
    if args.to_encoding != args.encoding {
        println!("  {} 출력 인코딩: {}", "🌐".bright_cyan(), args.to_encoding);
    }

    if let Some(ref marker) = args.strip_tag {
        println!("  {} 오픈 태그 마커: {}", "🔖".bright_cyan(), marker);
    }
    if let Some(depth) = args.max_depth {
        println!("  {} 최대 깊이: {}", "📏".bright_white(), depth);
    }

    if args.keep_going {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "실패해도 계속 진행".yellow()
        );
    }
    if args.preserve_last_modified {
        println!("  {} {}", "⏱️".bright_cyan(), "수정 시각 보존".cyan());
    }
    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 수정 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 드라이런 출력
fn print_dry_run(targets: &[PathBuf]) {
    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, path) in targets.iter().enumerate() {
        println!("  {}. {:?}", i + 1, path);
    }
    println!(
        "\n{} 총 {} 개의 파일이 처리될 예정입니다.",
        "ℹ️".bright_blue(),
        targets.len().to_string().bright_green()
    );
}

/// 에러 목록 출력
fn print_errors(errors: &[(PathBuf, String)], verbose: bool) {
    if errors.is_empty() {
        return;
    }

    println!("\n{}", "❌ 오류 발생 파일:".bright_red());
    for (path, error) in errors {
        println!("  {} {:?}", "•".red(), path.file_name().unwrap_or_default());
        if verbose {
            println!("    {}", error.dimmed());
        }
    }
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &PathBuf, errors: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "hinject 에러 로그")?;
    writeln!(log_file, "생성 시간: {}", chrono_now())?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}

/// 현재 시간 문자열 반환
fn chrono_now() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now();
    let duration = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            header: PathBuf::from("LICENSE"),
            to_file: None,
            dir: vec![PathBuf::from("src")],
            include: vec!["*.txt".to_string()],
            exclude: vec!["vendor/*".to_string()],
            eol: None,
            encoding: "utf-8".to_string(),
            to_encoding: "utf-8".to_string(),
            strip_tag: None,
            keep_going: false,
            preserve_last_modified: false,
            verbose: false,
            dry_run: false,
            max_depth: None,
            log: None,
        }
    }

    #[test]
    fn test_args_filesets() {
        let mut args = base_args();
        args.dir.push(PathBuf::from("docs"));

        let filesets = args.filesets();
        assert_eq!(filesets.len(), 2);
        assert_eq!(filesets[0].dir, PathBuf::from("src"));
        assert_eq!(filesets[1].dir, PathBuf::from("docs"));
        assert_eq!(filesets[0].includes, vec!["*.txt".to_string()]);
        assert_eq!(filesets[1].excludes, vec!["vendor/*".to_string()]);
    }

    #[test]
    fn test_build_injector_strip_tag_variant() {
        let mut args = base_args();
        args.strip_tag = Some("<?php".to_string());
        args.eol = Some("lf".to_string());

        let injector = build_injector(&args).unwrap();
        // 설정 검증은 헤더 파일 존재까지 확인하므로 여기서는 구성만 확인
        let debug = format!("{:?}", injector);
        assert!(debug.contains("StripTag"));
        assert!(debug.contains("Lf"));
    }

    #[test]
    fn test_build_injector_unknown_encoding() {
        let mut args = base_args();
        args.encoding = "euc-kr".to_string();

        let result = build_injector(&args);
        assert!(result.is_err());
    }
}
