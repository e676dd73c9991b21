fn main() {
    // CI sets ASSURANCE_VERSION (e.g., "version-abc1234"); otherwise derive from git.
    println!("cargo:rerun-if-env-changed=ASSURANCE_VERSION");
    let version = std::env::var("ASSURANCE_VERSION").unwrap_or_else(|_| {
        let hash = std::process::Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if hash.is_empty() {
            env!("CARGO_PKG_VERSION").to_string()
        } else {
            format!("{}+{hash}", env!("CARGO_PKG_VERSION"))
        }
    });
    println!("cargo:rustc-env=ASSURANCE_VERSION={version}");
}
