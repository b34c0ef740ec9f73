//! Entry point for the tephra mesh tool: inspect and convert OBJ assets.

use std::path::PathBuf;

use anyhow::Result;
use asset::obj::{self, MeshOptions};
use asset::texture::TextureData;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "tephra", about = "Inspect and convert OBJ mesh assets")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Parse a mesh and report its contents.
    Info(InfoArgs),
    /// Rewrite a mesh centered at the origin and scaled into the unit sphere.
    Normalize(NormalizeArgs),
    /// Decode an image and report its dimensions.
    Texture(TextureArgs),
}

#[derive(Debug, Parser)]
struct InfoArgs {
    /// Path to the .obj file.
    input: PathBuf,
}

#[derive(Debug, Parser)]
struct NormalizeArgs {
    /// Path to the .obj file to read.
    input: PathBuf,
    /// Path to write the normalized .obj to.
    output: PathBuf,
    /// Recompute smooth normals even when the file has them.
    #[arg(long)]
    gen_normals: bool,
}

#[derive(Debug, Parser)]
struct TextureArgs {
    /// Path to the image file.
    input: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.cmd {
        Command::Info(ref a) => info(a),
        Command::Normalize(ref a) => normalize(a),
        Command::Texture(ref a) => texture(a),
    }
}

fn info(args: &InfoArgs) -> Result<()> {
    let parsed = obj::load_obj_from_path(&args.input)?;
    let mesh = &parsed.mesh;
    let stats = &parsed.stats;

    println!("{}", args.input.display());
    println!(
        "  vertices:  {} ({} corner refs before dedup)",
        mesh.vertices.len(),
        stats.face_corners
    );
    println!(
        "  triangles: {} ({} faces in source)",
        mesh.triangle_count(),
        stats.faces
    );
    println!(
        "  normals:   {}",
        if stats.has_normals() { "from file" } else { "absent" }
    );
    println!(
        "  texcoords: {}",
        if stats.has_texcoords() { "from file" } else { "absent" }
    );

    let aabb = mesh.aabb();
    if aabb.is_valid() {
        println!(
            "  bounds:    {:?} .. {:?}",
            aabb.min.to_array(),
            aabb.max.to_array()
        );
        println!("  radius:    {:.4}", aabb.max_radius());
    }
    Ok(())
}

fn normalize(args: &NormalizeArgs) -> Result<()> {
    let options = MeshOptions {
        force_generate_normals: args.gen_normals,
        normalize_positions: true,
    };
    let mesh = obj::load_mesh_from_path(&args.input, &options)?;
    obj::write_obj_to_path(&mesh, &args.output)?;
    log::info!(
        "wrote {} ({} vertices, {} triangles)",
        args.output.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(())
}

fn texture(args: &TextureArgs) -> Result<()> {
    let tex = TextureData::from_image_path(&args.input)?;
    println!(
        "{}: {}x{} {:?}, {} bytes",
        args.input.display(),
        tex.width,
        tex.height,
        tex.format,
        tex.data.len()
    );
    Ok(())
}
