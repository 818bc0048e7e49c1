//! Batch configuration: many lists converted in one run.
//!
//! ```yaml
//! separator: " "
//! grammar: full
//! strict: false
//! header: domain
//! lists:
//!   - name: ads
//!     input: lists/ads.txt
//!     mode: domain
//!     output: out/ads.txt
//!   - name: feed
//!     input: lists/feed.csv.gz
//!     mode: mixed
//!     separator: ","
//!     domain_output: out/feed-domain.txt
//!     ip_output: out/feed-ip.txt
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::driver::{DriveStats, DriverOptions, StreamDriver};
use crate::stream::{self, Output};
use crate::{Error, FieldSeparator, Grammar, HeaderPolicy, Mode, Result};

/// Top-level batch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Default separator for every list
    #[serde(default)]
    pub separator: Option<String>,
    /// Grammar variant
    #[serde(default)]
    pub grammar: Grammar,
    /// Require real IP addresses
    #[serde(default)]
    pub strict: bool,
    /// Header comment routing in mixed mode
    #[serde(default)]
    pub header: HeaderPolicy,
    /// Lists to convert, in order
    #[serde(default)]
    pub lists: Vec<ListSource>,
}

/// One list in a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSource {
    /// Name used in log output
    pub name: String,
    /// Input path, or `-` for stdin
    pub input: PathBuf,
    /// Processing mode
    pub mode: Mode,
    /// Separator override for this list
    #[serde(default)]
    pub separator: Option<String>,
    /// Output for `domain` and `ip` modes
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Domain output for `mixed` mode
    #[serde(default)]
    pub domain_output: Option<PathBuf>,
    /// IP output for `mixed` mode
    #[serde(default)]
    pub ip_output: Option<PathBuf>,
}

/// Where a list's rules are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutputs<'a> {
    /// Single output for domain-only or ip-only mode
    Single(&'a Path),
    /// Separate outputs for mixed mode
    Split { domain: &'a Path, ip: &'a Path },
}

/// Result of converting one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReport {
    /// List name from the config
    pub name: String,
    /// Mode the list was converted in
    pub mode: Mode,
    /// Counters from the pass
    pub stats: DriveStats,
}

impl ListSource {
    /// Resolve the configured outputs for this list's mode.
    pub fn outputs(&self) -> Result<ListOutputs<'_>> {
        match self.mode {
            Mode::Domain | Mode::Ip => {
                let output = self.output.as_deref().ok_or_else(|| {
                    Error::Config(format!("list '{}': {} mode needs `output`", self.name, self.mode))
                })?;
                Ok(ListOutputs::Single(output))
            }
            Mode::Mixed => match (self.domain_output.as_deref(), self.ip_output.as_deref()) {
                (Some(domain), Some(ip)) => {
                    if domain == ip {
                        return Err(Error::Config(format!(
                            "list '{}': `domain_output` and `ip_output` must differ",
                            self.name
                        )));
                    }
                    Ok(ListOutputs::Split { domain, ip })
                }
                _ => Err(Error::Config(format!(
                    "list '{}': mixed mode needs `domain_output` and `ip_output`",
                    self.name
                ))),
            },
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            Some(&mut self.input),
            self.output.as_mut(),
            self.domain_output.as_mut(),
            self.ip_output.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            if !stream::is_stdio(path) && path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl BatchConfig {
    /// Parse and validate a batch config from YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: BatchConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a batch config from disk. Relative paths inside it are
    /// resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: BatchConfig = serde_yaml::from_str(&content)?;

        if let Some(base) = path.parent() {
            for list in &mut config.lists {
                list.resolve_paths(base);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the whole config before any list is touched.
    pub fn validate(&self) -> Result<()> {
        if self.lists.is_empty() {
            return Err(Error::Config("no lists configured".to_string()));
        }

        let mut names = HashSet::new();
        for list in &self.lists {
            if list.name.trim().is_empty() {
                return Err(Error::Config("list name must not be empty".to_string()));
            }
            if !names.insert(list.name.as_str()) {
                return Err(Error::Config(format!("duplicate list name '{}'", list.name)));
            }
            list.outputs()?;
            self.driver_options(list)?;
        }

        Ok(())
    }

    /// Build driver options for one list, applying its overrides.
    pub fn driver_options(&self, list: &ListSource) -> Result<DriverOptions> {
        let separator = match list.separator.as_deref().or(self.separator.as_deref()) {
            Some(sep) => FieldSeparator::parse(sep)?,
            None => FieldSeparator::Whitespace,
        };

        Ok(DriverOptions {
            separator,
            grammar: self.grammar,
            strict_addresses: self.strict,
            header_policy: self.header,
        })
    }

    /// Convert every list in order. Stops at the first failing list.
    pub fn run(&self) -> Result<Vec<ListReport>> {
        let mut reports = Vec::with_capacity(self.lists.len());

        for list in &self.lists {
            let driver = StreamDriver::new(self.driver_options(list)?);
            let stats = run_list(&driver, list.mode, &list.input, list.outputs()?)?;

            log::info!(
                "{}: {} domain rules, {} CIDR rules, {} lines dropped",
                list.name,
                stats.domain_rules,
                stats.ip_rules,
                stats.rejected
            );

            reports.push(ListReport {
                name: list.name.clone(),
                mode: list.mode,
                stats,
            });
        }

        Ok(reports)
    }
}

/// Convert one list from `input` into `outputs`.
///
/// Outputs are only moved into place when the whole pass succeeds.
pub fn run_list(
    driver: &StreamDriver,
    mode: Mode,
    input: &Path,
    outputs: ListOutputs<'_>,
) -> Result<DriveStats> {
    let reader = stream::open_input(input)?;

    match (mode, outputs) {
        (mode, ListOutputs::Single(path)) if mode != Mode::Mixed => {
            let mut output = Output::create(path)?;
            let result = if mode.wants_domains() {
                driver.domain_only(reader, &mut output)
            } else {
                driver.ip_only(reader, &mut output)
            };
            match result {
                Ok(stats) => {
                    output.commit()?;
                    Ok(stats)
                }
                Err(e) => {
                    output.discard();
                    Err(e)
                }
            }
        }
        (mode, ListOutputs::Split { domain, ip }) if mode.wants_domains() && mode.wants_ips() => {
            let mut domain_out = Output::create(domain)?;
            let mut ip_out = match Output::create(ip) {
                Ok(out) => out,
                Err(e) => {
                    domain_out.discard();
                    return Err(e);
                }
            };
            match driver.mixed(reader, &mut domain_out, &mut ip_out) {
                Ok(stats) => {
                    domain_out.commit()?;
                    ip_out.commit()?;
                    Ok(stats)
                }
                Err(e) => {
                    domain_out.discard();
                    ip_out.discard();
                    Err(e)
                }
            }
        }
        (mode, _) => Err(Error::Config(format!(
            "outputs do not match {} mode",
            mode
        ))),
    }
}
