use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Everything under `assets/` is the read-only application bundle that
// `Bundle::main()` resolves models from.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/*");

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if assets_src.exists() {
        copy_items(&[assets_src], out_dir, &copy_options)?;
    } else {
        // Keep `Bundle::main()` pointing at a real, if empty, directory.
        std::fs::create_dir_all(PathBuf::from(out_dir).join("assets"))?;
    }

    Ok(())
}
