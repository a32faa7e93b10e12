//! Shared plumbing for the trinket binaries: arguments, logging, output.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trinket::pendant::PendantParams;
use trinket::{export, Generated, GlyphError, Solid, StlFormat, TrinketConfig};
use trinket_ir::Plan;

/// Options every generator accepts. None of them are needed for the stock
/// designs.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory to write STL files into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// TOML file overriding design parameters
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    pub ascii: bool,

    /// Also write the primitive plan as JSON to this path
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Log debug detail
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Parameters from `--params`, or the stock defaults.
    pub fn config(&self) -> Result<TrinketConfig> {
        match &self.params {
            Some(path) => {
                let config = TrinketConfig::load(path)?;
                info!(path = %path.display(), "loaded parameters");
                Ok(config)
            }
            None => Ok(TrinketConfig::default()),
        }
    }

    /// STL encoding selected by `--ascii`.
    pub fn format(&self) -> StlFormat {
        if self.ascii {
            StlFormat::Ascii
        } else {
            StlFormat::Binary
        }
    }

    /// Write the plan to `--plan`, if given.
    pub fn write_plan(&self, plan: impl FnOnce() -> Result<Plan, GlyphError>) -> Result<()> {
        let Some(path) = &self.plan else {
            return Ok(());
        };
        let json = plan()?.to_json()?;
        fs::write(path, json).with_context(|| format!("writing plan to {}", path.display()))?;
        info!(path = %path.display(), "wrote plan");
        Ok(())
    }

    /// Create the output directory and export `outputs`.
    pub fn export(&self, generated: &Generated, outputs: &[(&str, &str)]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating {}", self.out_dir.display()))?;
        Ok(export::export(generated, outputs, &self.out_dir, self.format())?)
    }
}

/// Filter used when `RUST_LOG` is unset: the trinket crates and both
/// generator binaries at info (debug with `verbose`), everything else at warn.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "trinket=debug,bulls_pendant=debug,austin_keychain=debug,warn"
    } else {
        "trinket=info,bulls_pendant=info,austin_keychain=info,warn"
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise [`default_filter`] applies.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// A horizontal rule `width` characters wide.
pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

/// Print a banner: rule, title, rule.
pub fn banner(title: &str, width: usize) {
    println!("{}", rule(width));
    println!("{title}");
    println!("{}", rule(width));
}

/// File name of `path` for display.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Bounding box extents as `[x, y, z]` with two decimals.
pub fn extents(solid: &Solid) -> String {
    let e = solid.extents();
    format!("[{:.2}, {:.2}, {:.2}]", e.x, e.y, e.z)
}

/// Printing advice shown after the keychain is exported.
pub const KEYCHAIN_RECOMMENDATIONS: &[&str] = &[
    "Layer height: 0.1-0.2mm for FDM",
    "Supports: Not required",
    "Orientation: Flat on build plate",
    "Material: PLA, PETG, ABS, or resin",
    "Estimated print time: 15-30 minutes (depending on printer)",
];

/// Multi-color printing instructions for the pendant, with pause heights
/// taken from `params`.
pub fn pendant_instructions(params: &PendantParams) -> String {
    let black_top = params.black_height;
    let red_top = black_top + params.red_height;
    format!(
        "
MULTI-COLOR PRINTING:
1. Load BLACK filament
2. Start printing the combined STL file
3. PAUSE at layer height {black_top:.1}mm
4. Change to RED filament
5. Resume printing
6. PAUSE at layer height {red_top:.1}mm
7. Change to WHITE filament
8. Resume printing until complete

SINGLE COLOR PRINTING:
- Use bulls_pendant_combined.stl
- Print in any single color
- No pauses needed

SETTINGS:
- Layer Height: 0.1-0.2mm
- Infill: 20-100%
- Supports: Not required
- Build Plate Adhesion: Brim recommended
- Nozzle Temperature: Per filament specs
- Print Time: ~45-90 minutes (varies by settings)

MATERIALS:
- PLA (easiest, recommended)
- PETG (more durable)
- ABS (heat resistant)

DIMENSIONS:
- Pendant Diameter: {diameter}mm
- Total Height: {height}mm
- Chain Loop: {loop_d}mm ring above the disc, flat in the black layer
- Chain Loop Hole: {hole}mm diameter
",
        diameter = params.diameter,
        height = params.total_height(),
        loop_d = params.loop_diameter,
        hole = params.loop_hole_diameter,
    )
}

/// Print any warnings the build recorded.
pub fn print_warnings(generated: &Generated) {
    if generated.warnings.is_empty() {
        return;
    }
    println!();
    println!("Warnings:");
    for w in &generated.warnings {
        println!("  ! {w}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn no_flags_means_stock_design() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.common.out_dir, PathBuf::from("."));
        assert_eq!(cli.common.format(), StlFormat::Binary);
        assert_eq!(cli.common.config().unwrap(), TrinketConfig::default());
        assert!(cli.common.write_plan(|| unreachable!()).is_ok());
    }

    #[test]
    fn flags_parse() {
        let cli = TestCli::parse_from(["test", "-o", "out", "--ascii", "--plan", "p.json", "-v"]);
        assert_eq!(cli.common.out_dir, PathBuf::from("out"));
        assert_eq!(cli.common.format(), StlFormat::Ascii);
        assert_eq!(cli.common.plan, Some(PathBuf::from("p.json")));
        assert!(cli.common.verbose);
    }

    #[test]
    fn params_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.toml");
        fs::write(&path, "[keychain]\ntext = \"TINA\"\n").unwrap();
        let cli = TestCli::parse_from(["test", "--params", path.to_str().unwrap()]);
        assert_eq!(cli.common.config().unwrap().keychain.text, "TINA");
    }

    #[test]
    fn plan_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let cli = TestCli::parse_from(["test", "--plan", path.to_str().unwrap()]);
        cli.common
            .write_plan(|| trinket::keychain::plan(&Default::default()))
            .unwrap();
        let plan = Plan::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(plan.primitive_count(), 22);
    }

    #[test]
    fn export_creates_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("stl");
        let cli = TestCli::parse_from(["test", "-o", out.to_str().unwrap()]);
        let generated = trinket::keychain::build(&Default::default());
        let paths = cli.common.export(&generated, trinket::keychain::OUTPUTS).unwrap();
        assert_eq!(file_name(&paths[0]), "austin_keychain.stl");
        assert!(paths[0].exists());
    }

    #[test]
    fn default_filter_covers_binaries() {
        for verbose in [false, true] {
            let filter = default_filter(verbose);
            assert!(filter.contains("bulls_pendant="), "{filter}");
            assert!(filter.contains("austin_keychain="), "{filter}");
            assert!(filter.ends_with(",warn"));
            assert!(filter.parse::<EnvFilter>().is_ok());
        }
        assert!(default_filter(true).contains("trinket=debug"));
        assert!(default_filter(false).contains("trinket=info"));
    }

    #[test]
    fn print_times_are_listed() {
        assert!(KEYCHAIN_RECOMMENDATIONS
            .iter()
            .any(|l| l.contains("15-30 minutes")));
        let text = pendant_instructions(&PendantParams::default());
        assert!(text.contains("- Print Time: ~45-90 minutes (varies by settings)"));
        assert!(text.contains("PAUSE at layer height 1.0mm"));
        assert!(text.contains("PAUSE at layer height 2.0mm"));
        assert!(text.contains("Pendant Diameter: 35mm"));
    }
}
