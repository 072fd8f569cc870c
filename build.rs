// Embed the short git hash so --version can name the exact build.
// Builds outside a checkout simply go without one.
fn main() {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();
    if let Ok(output) = output {
        if output.status.success() {
            if let Ok(hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=HALFTONE_GIT_HASH={}", hash.trim());
            }
        }
    }
}
