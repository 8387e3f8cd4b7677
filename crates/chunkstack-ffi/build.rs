//! Regenerates `include/chunkstack.h` from the `extern "C"` surface.

use std::error::Error;
use std::path::Path;

fn generate_header(manifest_dir: &Path) -> Result<(), Box<dyn Error>> {
    let config = cbindgen::Config::from_file(manifest_dir.join("cbindgen.toml"))?;
    let include = manifest_dir.join("include");
    std::fs::create_dir_all(&include)?;

    let bindings = cbindgen::Builder::new()
        .with_crate(manifest_dir)
        .with_config(config)
        .generate()?;
    bindings.write_to_file(include.join("chunkstack.h"));
    Ok(())
}

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR")
        .expect("cargo sets CARGO_MANIFEST_DIR for build scripts");
    if let Err(e) = generate_header(Path::new(&manifest_dir)) {
        panic!("failed to generate chunkstack.h: {e}");
    }
}
