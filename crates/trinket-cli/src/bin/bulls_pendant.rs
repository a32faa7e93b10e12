//! Generate the three-color bull pendant STL files.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use trinket::pendant::{self, PendantParams};
use trinket_cli::{banner, file_name, pendant_instructions, print_warnings, rule, CommonArgs};

const WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "bulls-pendant")]
#[command(about = "Generate a layered bull pendant for multi-color printing", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

/// Per-file notes printed after export, in `pendant::OUTPUTS` order.
fn notes(key: &str, params: &PendantParams) -> Vec<String> {
    let black_top = params.black_height;
    let red_top = black_top + params.red_height;
    let white_top = red_top + params.white_height;
    match key {
        "black" => vec![
            format!("Print first (0-{black_top}mm height)"),
            "Color: BLACK".into(),
        ],
        "red" => vec![
            format!("Print second ({black_top}-{red_top}mm height)"),
            "Color: RED".into(),
            format!("PAUSE at {black_top}mm to change filament!"),
        ],
        "white" => vec![
            format!("Print third ({red_top}-{white_top}mm height)"),
            "Color: WHITE".into(),
            format!("PAUSE at {red_top}mm to change filament!"),
        ],
        _ => vec![
            "Complete pendant (all layers)".into(),
            "For reference/single color printing".into(),
        ],
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    trinket_cli::init_logging(cli.common.verbose);

    let params = cli.common.config()?.pendant;
    cli.common.write_plan(|| pendant::plan(&params))?;

    banner("Creating Bulls Basketball Chicago Chain Pendant", WIDTH);
    let generated = pendant::build(&params);
    info!(solids = generated.solids.len(), "pendant generated");

    println!();
    banner("Exporting STL Files", WIDTH);
    let paths = cli.common.export(&generated, pendant::OUTPUTS)?;

    for ((key, _), path) in pendant::OUTPUTS.iter().zip(&paths) {
        let Some(solid) = generated.get(key) else {
            continue;
        };
        println!();
        println!("✓ {}", file_name(path));
        for line in notes(key, &params) {
            println!("  - {line}");
        }
        println!("  - Triangles: {}", solid.num_triangles());
        if *key == "combined" {
            println!("  - Volume: {:.2} mm³", solid.volume());
            println!("  - Surface Area: {:.2} mm²", solid.surface_area());
        }
    }
    print_warnings(&generated);

    println!();
    banner("PRINTING INSTRUCTIONS", WIDTH);
    println!("{}", pendant_instructions(&params));

    println!("{}", rule(WIDTH));
    println!("✓ All STL files generated successfully!");
    println!("✓ Ready for 3D printing!");
    println!("{}", rule(WIDTH));
    Ok(())
}
