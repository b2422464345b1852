use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("linkpress")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Linkpress Contributors")
        .about("Compile yesterday's top links into one EPUB")
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand_required(true)
        .subcommand(
            clap::Command::new("daily")
                .about("List, extract, compile and deliver today's digest")
                .arg(clap::arg!(-n --count <NUM> "Number of stories to fetch").default_value("10"))
                .arg(
                    clap::arg!(-o --output <FILE> "Output EPUB path (default: hn_daily_YYYY-MM-DD.epub)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(clap::arg!(--timeout <SECS> "Per-request timeout in seconds").default_value("15"))
                .arg(clap::arg!(--"skip-send" "Compile only, do not deliver"))
                .arg(clap::arg!(--keep "Keep the EPUB after a successful delivery"))
                .arg(
                    clap::arg!(--transport <TRANSPORT> "How the EPUB is delivered")
                        .value_parser(["smtp", "spool"])
                        .default_value("smtp"),
                )
                .arg(clap::arg!(--"smtp-host" <HOST> "SMTP relay host").default_value("smtp.gmail.com"))
                .arg(clap::arg!(--"smtp-port" <PORT> "SMTP relay port (STARTTLS)").default_value("587"))
                .arg(
                    clap::arg!(--"spool-dir" <DIR> "Spool directory for --transport spool")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(clap::arg!(--sender <ADDRESS> "Sender address"))
                .arg(clap::arg!(--password <SECRET> "Sender app password"))
                .arg(clap::arg!(--recipients <LIST> "Comma-separated recipient addresses")),
        )
        .subcommand(
            clap::Command::new("build")
                .about("Compile local HTML files into an EPUB")
                .arg(clap::arg!(<FILES>... "HTML files, one chapter each").value_parser(clap::value_parser!(PathBuf)))
                .arg(clap::arg!(-o --output <FILE> "Output EPUB path").required(true).value_parser(clap::value_parser!(PathBuf)))
                .arg(clap::arg!(--title <TITLE> "Display title of the document")),
        )
        .subcommand(
            clap::Command::new("extract")
                .about("Extract one URL or local file and print the record as JSON")
                .arg(clap::arg!(<INPUT> "URL to fetch or local HTML file"))
                .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("15")),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "linkpress", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "linkpress", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "linkpress", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "linkpress", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
