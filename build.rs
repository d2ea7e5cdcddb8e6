use std::process::Command;
use vergen::EmitBuilder;

fn main() {
    let in_git_checkout = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();
    if in_git_checkout {
        // Short SHA, read back with option_env! in the version endpoint
        builder.git_sha(true);
    }

    builder.emit().expect("Unable to generate build metadata");
}
