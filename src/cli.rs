use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "claim-report")]
#[command(about = "Accident photo screening and claim report generation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen a folder of scene photos for blur
    Check {
        /// Photo folder path
        #[arg(required = true)]
        folder: PathBuf,

        /// Write results as JSON (default: print only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the per-folder result cache (skip re-analysis)
        #[arg(long)]
        use_cache: bool,
    },

    /// Generate a claim report PDF from a claim JSON file
    Report {
        /// Claim JSON file
        #[arg(required = true)]
        input: PathBuf,

        /// Output file or directory (default: Claim-<ID>.pdf next to input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Embedded photo quality (high/medium/low)
        #[arg(long, default_value = "medium")]
        pdf_quality: PdfQuality,
    },

    /// Screen the claim's photos, then generate the report in one pass
    Run {
        /// Claim JSON file
        #[arg(required = true)]
        input: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Embedded photo quality (high/medium/low)
        #[arg(long, default_value = "medium")]
        pdf_quality: PdfQuality,
    },

    /// Show or edit configuration
    Config {
        /// Set the blur threshold (Laplacian variance)
        #[arg(long)]
        set_threshold: Option<f64>,

        /// Show the configuration
        #[arg(long)]
        show: bool,
    },

    /// Manage the sharpness result cache
    Cache {
        /// Delete the cache
        #[arg(long)]
        clear: bool,

        /// Target folder (default: current directory)
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Show cache information
        #[arg(long)]
        info: bool,
    },
}

/// Embedded photo quality preset for report generation.
#[derive(Clone, Copy, Debug, Default)]
pub enum PdfQuality {
    /// 1400px, 85%
    High,
    /// 800px, 75% (default)
    #[default]
    Medium,
    /// 500px, 60%
    Low,
}

impl PdfQuality {
    /// Maximum pixel width for an embedded photo.
    pub fn max_width(&self) -> u32 {
        match self {
            PdfQuality::High => 1400,
            PdfQuality::Medium => 800,
            PdfQuality::Low => 500,
        }
    }

    /// JPEG quality (0-100).
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PdfQuality::High => 85,
            PdfQuality::Medium => 75,
            PdfQuality::Low => 60,
        }
    }
}

impl std::str::FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PdfQuality::High),
            "medium" | "med" | "m" => Ok(PdfQuality::Medium),
            "low" | "l" => Ok(PdfQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfQuality::High => write!(f, "high"),
            PdfQuality::Medium => write!(f, "medium"),
            PdfQuality::Low => write!(f, "low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_quality_from_str() {
        assert!(matches!("high".parse::<PdfQuality>(), Ok(PdfQuality::High)));
        assert!(matches!("MED".parse::<PdfQuality>(), Ok(PdfQuality::Medium)));
        assert!(matches!("l".parse::<PdfQuality>(), Ok(PdfQuality::Low)));
        assert!("ultra".parse::<PdfQuality>().is_err());
    }

    #[test]
    fn test_pdf_quality_presets() {
        assert_eq!(PdfQuality::High.max_width(), 1400);
        assert_eq!(PdfQuality::Medium.jpeg_quality(), 75);
        assert_eq!(PdfQuality::Low.max_width(), 500);
    }
}
