//! k2list: CLI tool for converting block/allow lists into canonical rule text.

use clap::{Args, Parser, Subcommand};
use k2list::config::{run_list, ListOutputs};
use k2list::{BatchConfig, DriveStats, DriverOptions, FieldSeparator, Grammar, HeaderPolicy, Mode, StreamDriver};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "k2list")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Convert block/allow lists into domain-suffix and IP-CIDR rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract domain-suffix rules (`+.example.com`)
    Domain {
        /// Input list file, `-` for stdin (gzip is detected)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output rule file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Extract IP-CIDR rules (`1.2.3.0/24`)
    Ip {
        /// Input list file, `-` for stdin (gzip is detected)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output rule file, `-` for stdout
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Require IP addresses to be real addresses (octet range checks)
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Split a mixed list into domain and IP-CIDR rule files
    Mixed {
        /// Input list file, `-` for stdin (gzip is detected)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file for domain rules
        #[arg(long)]
        domain_output: PathBuf,

        /// Output file for IP-CIDR rules
        #[arg(long)]
        ip_output: PathBuf,

        /// Which outputs receive header comments (domain, both)
        #[arg(long, default_value = "domain")]
        header: HeaderPolicy,

        /// Require IP addresses to be real addresses (octet range checks)
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Convert every list in a YAML batch config
    Batch {
        /// Batch config file
        #[arg(short, long)]
        config: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Options shared by the single-list commands.
#[derive(Args)]
struct ParseArgs {
    /// Field separator: " " for whitespace, one character, or a regex
    #[arg(short, long, default_value = " ")]
    separator: FieldSeparator,

    /// Line grammar (full, ipv4-only)
    #[arg(long, default_value = "full")]
    grammar: Grammar,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl ParseArgs {
    fn driver(self, strict: bool, header_policy: HeaderPolicy) -> (StreamDriver, bool) {
        let driver = StreamDriver::new(DriverOptions {
            separator: self.separator,
            grammar: self.grammar,
            strict_addresses: strict,
            header_policy,
        });
        (driver, self.verbose)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Domain {
            input,
            output,
            parse,
        } => convert(Mode::Domain, input, ListOutputs::Single(&output), parse, false, HeaderPolicy::Domain),
        Commands::Ip {
            input,
            output,
            strict,
            parse,
        } => convert(Mode::Ip, input, ListOutputs::Single(&output), parse, strict, HeaderPolicy::Domain),
        Commands::Mixed {
            input,
            domain_output,
            ip_output,
            header,
            strict,
            parse,
        } => convert(
            Mode::Mixed,
            input,
            ListOutputs::Split {
                domain: &domain_output,
                ip: &ip_output,
            },
            parse,
            strict,
            header,
        ),
        Commands::Batch { config, verbose } => batch(&config, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn convert(
    mode: Mode,
    input: PathBuf,
    outputs: ListOutputs<'_>,
    parse: ParseArgs,
    strict: bool,
    header_policy: HeaderPolicy,
) -> k2list::Result<()> {
    if let ListOutputs::Split { domain, ip } = outputs {
        if domain == ip {
            return Err(k2list::Error::Config(
                "--domain-output and --ip-output must differ".to_string(),
            ));
        }
    }

    let (driver, verbose) = parse.driver(strict, header_policy);
    if verbose {
        eprintln!("Reading {:?} ({} mode, separator {:?})", input, mode, driver.separator().to_string());
    }

    let stats = run_list(&driver, mode, &input, outputs)?;

    if verbose {
        print_stats(mode.as_str(), &stats);
    }
    Ok(())
}

fn batch(config_path: &Path, verbose: bool) -> k2list::Result<()> {
    let config = BatchConfig::load(config_path)?;

    if verbose {
        eprintln!("Loaded {} lists from {:?}", config.lists.len(), config_path);
    }

    let reports = config.run()?;

    if verbose {
        for report in &reports {
            print_stats(&report.name, &report.stats);
        }
    }
    Ok(())
}

fn print_stats(label: &str, stats: &DriveStats) {
    eprintln!(
        "{}: {} lines, {} header comments, {} data lines -> {} domain rules, {} CIDR rules, {} dropped",
        label,
        stats.lines,
        stats.header_comments,
        stats.data_lines,
        stats.domain_rules,
        stats.ip_rules,
        stats.rejected
    );
}
