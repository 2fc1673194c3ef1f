// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Options shared by `resolve` and `lookup`
fn resolver_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("PATH")
            .help("Config file (default: /etc/acctgids/config.toml if present)"),
        Arg::new("getent_path")
            .long("getent-path")
            .value_name("PATH")
            .help("Fixed path of the getent utility (default: /usr/bin/getent)"),
        Arg::new("root")
            .short('r')
            .long("root")
            .value_name("DIR")
            .help("Root whose account database the fallback provider reads"),
        Arg::new("source")
            .short('s')
            .long("source")
            .value_parser(["auto", "getent", "provider"])
            .help("Account source to use"),
        Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help("Fail on invalid GIDs and malformed records instead of defaulting"),
    ]
}

fn build_cli() -> Command {
    Command::new("acctgids")
        .version(env!("CARGO_PKG_VERSION"))
        .author("acctgids Contributors")
        .about("Map system logins to their primary GID")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging on stderr"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve every login to its primary GID")
                .args(resolver_args())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["json", "text"])
                        .default_value("json")
                        .help("Output format"),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .action(ArgAction::SetTrue)
                        .help("Also report defaulted GIDs and skipped records on stderr"),
                ),
        )
        .subcommand(
            Command::new("lookup")
                .about("Print the primary GID of one login")
                .arg(Arg::new("login").required(true).help("Login name"))
                .args(resolver_args()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("acctgids.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
