//! Stream driver: reads a list line by line and writes canonical rules.

use std::io::{BufRead, Write};

use crate::line::{host_token, LineKind, ParserState};
use crate::normalize::{DomainNormalizer, IpNormalizer, Normalizer};
use crate::{FieldSeparator, Grammar, HeaderPolicy, Result};

/// Options shared by every pass of a [`StreamDriver`].
#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Separator used to find the first column
    pub separator: FieldSeparator,
    /// Grammar variant for both normalizers
    pub grammar: Grammar,
    /// Require captured IP addresses to be real addresses
    pub strict_addresses: bool,
    /// Where header comments go in mixed mode
    pub header_policy: HeaderPolicy,
}

/// Counters collected during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// Raw lines read
    pub lines: usize,
    /// Header comments echoed
    pub header_comments: usize,
    /// Data lines seen
    pub data_lines: usize,
    /// Domain rules written
    pub domain_rules: usize,
    /// CIDR rules written
    pub ip_rules: usize,
    /// Data lines that produced no rule
    pub rejected: usize,
}

/// StreamDriver feeds a line stream through the classifier and the
/// normalizers, preserving input order.
///
/// # Examples
/// ```
/// use k2list::{DriverOptions, StreamDriver};
///
/// let driver = StreamDriver::new(DriverOptions::default());
/// let input = "# ads\nexample.com\n1.2.3.4\n# dropped\n";
/// let mut out = Vec::new();
/// driver.domain_only(input.as_bytes(), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "# ads\n+.example.com\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamDriver {
    separator: FieldSeparator,
    domain: DomainNormalizer,
    ip: IpNormalizer,
    header_policy: HeaderPolicy,
}

impl StreamDriver {
    /// Create a driver from options.
    pub fn new(options: DriverOptions) -> Self {
        Self {
            separator: options.separator,
            domain: DomainNormalizer::new(options.grammar),
            ip: IpNormalizer::new(options.grammar).with_strict(options.strict_addresses),
            header_policy: options.header_policy,
        }
    }

    /// Get the field separator.
    pub fn separator(&self) -> &FieldSeparator {
        &self.separator
    }

    /// Write header comments and domain rules to `output`.
    pub fn domain_only<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<DriveStats> {
        let stats = self.drive(input, |line| match line {
            Event::Header(raw) => {
                write_line(&mut output, raw)?;
                Ok(Emitted::default())
            }
            Event::Data(token) => Ok(Emitted {
                domain: write_rule(&mut output, &self.domain, token)?,
                ip: false,
            }),
        })?;
        output.flush()?;
        Ok(stats)
    }

    /// Write header comments and CIDR rules to `output`.
    pub fn ip_only<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<DriveStats> {
        let stats = self.drive(input, |line| match line {
            Event::Header(raw) => {
                write_line(&mut output, raw)?;
                Ok(Emitted::default())
            }
            Event::Data(token) => Ok(Emitted {
                domain: false,
                ip: write_rule(&mut output, &self.ip, token)?,
            }),
        })?;
        output.flush()?;
        Ok(stats)
    }

    /// Offer every data line to both normalizers, writing domain rules to
    /// `domain_out` and CIDR rules to `ip_out`.
    ///
    /// Header comments follow the configured [`HeaderPolicy`].
    pub fn mixed<R: BufRead, D: Write, I: Write>(
        &self,
        input: R,
        mut domain_out: D,
        mut ip_out: I,
    ) -> Result<DriveStats> {
        let stats = self.drive(input, |line| match line {
            Event::Header(raw) => {
                write_line(&mut domain_out, raw)?;
                if self.header_policy == HeaderPolicy::Both {
                    write_line(&mut ip_out, raw)?;
                }
                Ok(Emitted::default())
            }
            Event::Data(token) => Ok(Emitted {
                domain: write_rule(&mut domain_out, &self.domain, token)?,
                ip: write_rule(&mut ip_out, &self.ip, token)?,
            }),
        })?;
        domain_out.flush()?;
        ip_out.flush()?;
        Ok(stats)
    }

    /// Read `input` to the end, dispatching each classified line to `sink`.
    fn drive<R, F>(&self, mut input: R, mut sink: F) -> Result<DriveStats>
    where
        R: BufRead,
        F: FnMut(Event<'_>) -> Result<Emitted>,
    {
        let mut state = ParserState::new();
        let mut stats = DriveStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines += 1;

            // Headers are copied as raw bytes; only the grammars see decoded text
            let raw = trim_line_ending(&buf);
            let text = String::from_utf8_lossy(raw);

            match state.classify(&text) {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::HeaderComment => {
                    stats.header_comments += 1;
                    sink(Event::Header(raw))?;
                }
                LineKind::Data(raw) => {
                    stats.data_lines += 1;
                    let token = host_token(raw, &self.separator);
                    let emitted = sink(Event::Data(token))?;
                    if emitted.domain {
                        stats.domain_rules += 1;
                    }
                    if emitted.ip {
                        stats.ip_rules += 1;
                    }
                    if !emitted.domain && !emitted.ip {
                        stats.rejected += 1;
                        log::trace!("line {}: no rule extracted from {:?}", stats.lines, raw);
                    }
                }
            }
        }

        log::debug!(
            "Processed {} lines: {} header comments, {} domain rules, {} CIDR rules, {} rejected",
            stats.lines,
            stats.header_comments,
            stats.domain_rules,
            stats.ip_rules,
            stats.rejected
        );

        Ok(stats)
    }
}

/// A classified line handed to an output sink.
enum Event<'a> {
    /// Header comment bytes without the line ending
    Header(&'a [u8]),
    /// Host token of a data line
    Data(&'a str),
}

/// Which outputs received a rule for one data line.
#[derive(Default)]
struct Emitted {
    domain: bool,
    ip: bool,
}

/// Strip any trailing `\n` and `\r` bytes.
fn trim_line_ending(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

/// Write raw bytes followed by a newline.
fn write_line<W: Write>(output: &mut W, line: &[u8]) -> Result<()> {
    output.write_all(line)?;
    output.write_all(b"\n")?;
    Ok(())
}

/// Normalize `token` and write the rule line if there is one.
fn write_rule<W: Write, N: Normalizer>(
    output: &mut W,
    normalizer: &N,
    token: &str,
) -> Result<bool> {
    match normalizer.normalize(token) {
        Some(rule) => {
            writeln!(output, "{}", rule)?;
            Ok(true)
        }
        None => {
            log::trace!("{}: no rule from {:?}", normalizer.name(), token);
            Ok(false)
        }
    }
}
