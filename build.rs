use std::error::Error;

// Commit and target triple shown by `cmake-deps --version`
fn main() {
    if let Err(e) = emit_metadata() {
        println!("cargo:warning=build metadata unavailable: {e}");
        println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
        println!(
            "cargo:rustc-env=VERGEN_CARGO_TARGET_TRIPLE={}",
            std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string())
        );
    }
}

// Without git, vergen emits placeholder values instead of failing
fn emit_metadata() -> Result<(), Box<dyn Error>> {
    vergen_gitcl::Emitter::default()
        .add_instructions(
            &vergen_gitcl::CargoBuilder::default()
                .target_triple(true)
                .build()?,
        )?
        .add_instructions(&vergen_gitcl::GitclBuilder::default().sha(true).build()?)?
        .emit()?;
    Ok(())
}
