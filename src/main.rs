use clap::Parser;
use claim_report_rust::{cli, config, error, report, scanner, sharpness};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PhotoCheck {
    file_name: String,
    #[serde(flatten)]
    result: sharpness::SharpnessResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Check { folder, output, use_cache } => {
            println!("📸 claim-report - photo check\n");

            println!("[1/2] Scanning photos...");
            let images = scanner::scan_folder(&folder)?;
            println!("✔ {} photos found\n", images.len());

            if images.is_empty() {
                return Err(error::ClaimReportError::NoImagesFound(
                    folder.display().to_string(),
                ));
            }

            println!("[2/2] Analyzing sharpness...{}", if use_cache { " (cache enabled)" } else { "" });
            let checks = check_folder(&images, &folder, &config, use_cache)?;
            println!("✔ Analysis complete\n");

            for check in &checks {
                let icon = if check.result.is_blurry { "⚠" } else { "✔" };
                println!(
                    "{} {} (score {}): {}",
                    icon, check.file_name, check.result.score, check.result.message
                );
            }

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&checks)?;
                std::fs::write(&output, json)?;
                println!("\n✔ Results saved: {}", output.display());
            }

            let blurry = checks.iter().filter(|c| c.result.is_blurry).count();
            if blurry > 0 {
                println!("\n⚠ {} photo(s) look blurry. Consider retaking them.", blurry);
            } else {
                println!("\n✅ All photos look usable");
            }
        }

        Commands::Report { input, output, pdf_quality } => {
            println!("📄 claim-report - report generation\n");

            let claim = claim_report_rust::claim::ClaimReportInput::load(&input)?;
            let output_path = resolve_output_path(&claim, output, &input);

            println!("- Generating PDF... (quality: {})", pdf_quality);
            report::generate_report(&claim, pdf_quality, &output_path).await?;
            println!("✔ PDF written: {}", output_path.display());
            println!("  {} photo(s) attached", claim.photos.len());

            println!("\n✅ Report complete");
        }

        Commands::Run { input, output, pdf_quality } => {
            println!("🚀 claim-report - check and report\n");

            let claim = claim_report_rust::claim::ClaimReportInput::load(&input)?;

            // 1. Screen the claim's photos.
            println!("[1/2] Screening claim photos...");
            let labeled = claim.labeled_photos();
            let mut photo_bytes = Vec::new();
            for (i, photo) in labeled.iter().enumerate() {
                match report::resolve_photo_source(&photo.source) {
                    Ok(bytes) => photo_bytes.push((i as u64, bytes)),
                    Err(_) => println!("  ⚠ {}: photo source unreadable", photo.label),
                }
            }

            let verdicts = sharpness::analyze_many(photo_bytes, config.sharpness()).await;
            for (id, result) in &verdicts {
                let label = &labeled[*id as usize].label;
                if result.is_blurry {
                    println!("  ⚠ {}: {}", label, result.message);
                } else if cli.verbose {
                    println!("  ✔ {} (score {})", label, result.score);
                }
            }
            println!("✔ Screening complete\n");

            // 2. Generate the report regardless; blur is advisory only.
            println!("[2/2] Generating report...");
            let output_path = resolve_output_path(&claim, output, &input);
            report::generate_report(&claim, pdf_quality, &output_path).await?;
            println!("✔ PDF written: {}", output_path.display());

            println!("\n✅ Complete");
        }

        Commands::Config { set_threshold, show } => {
            let mut config = config;

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ Blur threshold set to {}", threshold);
            }

            if show {
                println!("Configuration:");
                println!("  Blur threshold: {}", config.blur_threshold);
                println!("  Analysis edge: {}px", config.max_analysis_edge);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = sharpness::cache::CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = sharpness::cache::CacheFile::load(&target);
                    println!("Cache info:");
                    println!("  Path: {}", cache_path.display());
                    println!("  Entries: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  Size: {} bytes", meta.len());
                    }
                } else {
                    println!("No cache file: {}", cache_path.display());
                }
            }

            if clear {
                match sharpness::cache::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ Cache deleted: {}", cache_path.display()),
                    Ok(false) => println!("No cache file to delete"),
                    Err(e) => println!("Cache delete error: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Analyzes a folder of photos in parallel, consulting and updating the
/// per-folder cache when requested.
fn check_folder(
    images: &[scanner::ImageInfo],
    folder: &Path,
    config: &Config,
    use_cache: bool,
) -> Result<Vec<PhotoCheck>> {
    let sharpness_config = config.sharpness();

    let (cached, to_analyze): (Vec<_>, Vec<_>) = if use_cache {
        let cache = sharpness::cache::CacheFile::load(folder);
        sharpness::cache::partition_cached(images, &cache)
    } else {
        (
            Vec::new(),
            images.iter().map(|i| (i.clone(), String::new())).collect(),
        )
    };

    let bar = ProgressBar::new(to_analyze.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let analyzed: Vec<(scanner::ImageInfo, String, sharpness::SharpnessResult)> = to_analyze
        .par_iter()
        .map(|(image, hash)| {
            let result = match std::fs::read(&image.path) {
                Ok(bytes) => sharpness::evaluate_bytes(&bytes, &sharpness_config),
                // Unreadable files fail open like undecodable ones.
                Err(_) => sharpness::Analysis::Unanalyzable.into_result(&sharpness_config),
            };
            bar.inc(1);
            (image.clone(), hash.clone(), result)
        })
        .collect();
    bar.finish_and_clear();

    if use_cache {
        let mut cache = sharpness::cache::CacheFile::load(folder);
        for (image, hash, result) in &analyzed {
            if hash.is_empty() {
                continue;
            }
            let file_size = std::fs::metadata(&image.path).map(|m| m.len()).unwrap_or(0);
            cache.insert(hash.clone(), image.file_name.clone(), file_size, result.clone());
        }
        cache.save(folder)?;
    }

    let mut checks: Vec<PhotoCheck> = cached
        .into_iter()
        .map(|(file_name, result)| PhotoCheck { file_name, result })
        .chain(analyzed.into_iter().map(|(image, _, result)| PhotoCheck {
            file_name: image.file_name,
            result,
        }))
        .collect();
    checks.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(checks)
}

/// Output resolution: directories and extension-less paths get the default
/// `Claim-<ID>.pdf` name; otherwise the path is taken as given.
fn resolve_output_path(
    claim: &claim_report_rust::claim::ClaimReportInput,
    output: Option<PathBuf>,
    input: &Path,
) -> PathBuf {
    let default_name = report::default_output_name(claim);
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(default_name),
        Some(path) => path,
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(default_name),
    }
}
