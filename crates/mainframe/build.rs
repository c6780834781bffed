use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs only uses clap + clap_complete, both build-dependencies.
#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        panic!("OUT_DIR not set by Cargo");
    };
    let man_dir = Path::new(&out_dir).join("man");
    if let Err(e) = fs::create_dir_all(&man_dir) {
        panic!("cannot create {}: {e}", man_dir.display());
    }

    write_pages(&cli::Cli::command(), &man_dir);
}

/// One page per visible command, named `mainframe-widgets-run.1` and so on.
fn write_pages(cmd: &clap::Command, dir: &Path) {
    let name = cmd.get_name().to_owned();
    let mut page = Vec::new();
    if let Err(e) = clap_mangen::Man::new(cmd.clone()).render(&mut page) {
        panic!("rendering man page for `{name}` failed: {e}");
    }
    let path = dir.join(format!("{name}.1"));
    if let Err(e) = fs::write(&path, page) {
        panic!("writing {} failed: {e}", path.display());
    }

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        write_pages(&sub.clone().name(format!("{name}-{}", sub.get_name())), dir);
    }
}
