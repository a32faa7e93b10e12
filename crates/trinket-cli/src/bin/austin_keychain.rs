//! Generate the text keychain STL file.

use anyhow::{Context, Result};
use clap::Parser;
use trinket::keychain;
use trinket_cli::{
    banner, extents, file_name, print_warnings, rule, CommonArgs, KEYCHAIN_RECOMMENDATIONS,
};

const WIDTH: usize = 50;

#[derive(Parser)]
#[command(name = "austin-keychain")]
#[command(about = "Generate a keychain with embossed lettering", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    trinket_cli::init_logging(cli.common.verbose);

    let params = cli.common.config()?.keychain;
    cli.common.write_plan(|| keychain::plan(&params))?;

    banner("Generating Keychain", WIDTH);
    let generated = keychain::build(&params);
    let paths = cli.common.export(&generated, keychain::OUTPUTS)?;
    let solid = generated
        .get("keychain")
        .context("keychain build produced no solid")?;
    let path = paths.first().context("keychain was not exported")?;

    println!();
    banner("KEYCHAIN SPECIFICATIONS", WIDTH);
    println!("Output File:        {}", file_name(path));
    println!(
        "Dimensions:         {}mm x {}mm x {}mm (plus {}mm text)",
        params.length, params.width, params.height, params.text_depth
    );
    println!("Text:               {} (embossed)", params.text.to_uppercase());
    println!(
        "Keyring Hole:       {}mm diameter, {}mm from right edge",
        params.hole_diameter, params.hole_inset
    );
    println!("Triangles:          {}", solid.num_triangles());
    println!("Vertices:           {}", solid.num_vertices());
    println!("Volume:             {:.2} mm³", solid.volume());
    println!("Surface Area:       {:.2} mm²", solid.surface_area());
    println!("Bounding Box:       {}", extents(solid));
    print_warnings(&generated);
    println!();
    println!("{}", rule(WIDTH));
    println!("✓ STL file generated successfully!");
    println!("✓ Ready for 3D printing (FDM or resin)");
    println!("{}", rule(WIDTH));

    println!();
    println!("PRINTING RECOMMENDATIONS:");
    for line in KEYCHAIN_RECOMMENDATIONS {
        println!("- {line}");
    }
    Ok(())
}
