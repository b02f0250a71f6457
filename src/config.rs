// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Launch parameters of a [`Reporter`].
//!
//! [`Reporter`]: crate::Reporter

use std::{str::FromStr, vec};

use derive_more::with_trait::{Deref, From};
use smart_default::SmartDefault;

use crate::client::{Attribute, LaunchMode};

/// Parameters of a launch, parseable from CLI as `--rp-*` options.
///
/// Flatten it into a runner's CLI to let users configure reporting:
/// ```rust
/// # use cucumber_reportportal::Config;
/// #[derive(clap::Parser)]
/// struct Cli {
///     #[command(flatten)]
///     report: Config,
/// }
/// ```
#[derive(Clone, Debug, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Config {
    /// Name of the reported launch.
    #[arg(
        id = "rp-launch",
        long = "rp-launch",
        value_name = "name",
        default_value = "Cucumber launch"
    )]
    #[default(String::from("Cucumber launch"))]
    pub launch: String,

    /// Description of the reported launch.
    #[arg(id = "rp-description", long = "rp-description", value_name = "text")]
    pub description: Option<String>,

    /// Visibility mode of the reported launch.
    #[arg(
        id = "rp-mode",
        long = "rp-mode",
        value_name = "default|debug",
        default_value = "default"
    )]
    pub mode: LaunchMode,

    /// Attributes of the reported launch, `;`-delimited.
    ///
    /// Each attribute is either `key:value` or a plain `value`.
    #[arg(
        id = "rp-attributes",
        long = "rp-attributes",
        value_name = "key:value;value",
        default_value = ""
    )]
    pub attributes: Attributes,

    /// Report the launch as a rerun of the last one with the same name.
    #[arg(id = "rp-rerun", long = "rp-rerun")]
    pub rerun: bool,

    /// Id of the launch to report a rerun of.
    #[arg(id = "rp-rerun-of", long = "rp-rerun-of", value_name = "id")]
    pub rerun_of: Option<String>,

    /// Whether skipped items should be marked with an issue.
    #[arg(
        id = "rp-skipped-issue",
        long = "rp-skipped-issue",
        value_name = "bool"
    )]
    pub skipped_issue: Option<bool>,
}

impl Config {
    /// Sets the launch name.
    #[must_use]
    pub fn launch(mut self, name: impl Into<String>) -> Self {
        self.launch = name.into();
        self
    }

    /// Sets the launch description.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the launch [`LaunchMode`].
    #[must_use]
    pub const fn mode(mut self, mode: LaunchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a launch [`Attribute`].
    #[must_use]
    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.attributes.0.push(attr);
        self
    }

    /// Marks the launch as a rerun, optionally of the launch with the given
    /// id.
    #[must_use]
    pub fn rerun(mut self, of: Option<String>) -> Self {
        self.rerun = true;
        self.rerun_of = of;
        self
    }

    /// Sets whether skipped items should be marked with an issue.
    #[must_use]
    pub const fn skipped_issue(mut self, mark: bool) -> Self {
        self.skipped_issue = Some(mark);
        self
    }
}

/// `;`-delimited list of [`Attribute`]s.
#[derive(Clone, Debug, Default, Deref, Eq, From, PartialEq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Unwraps the parsed [`Attribute`]s.
    #[must_use]
    pub fn into_inner(self) -> Vec<Attribute> {
        self.0
    }
}

impl IntoIterator for Attributes {
    type Item = Attribute;
    type IntoIter = vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromStr for Attributes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|a| {
                let (key, value) = match a.split_once(':') {
                    Some((k, v)) => (Some(k.trim()), v.trim()),
                    None => (None, a),
                };
                if value.is_empty() {
                    return Err("attribute value must not be empty");
                }
                Ok(match key.filter(|k| !k.is_empty()) {
                    Some(k) => Attribute::new(k, value),
                    None => Attribute::tag(value),
                })
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(clap::Parser)]
    struct Cli {
        #[command(flatten)]
        report: Config,
    }

    #[test]
    fn parses_attributes() {
        let attrs = "build:42; smoke ;:nightly;".parse::<Attributes>().unwrap();

        assert_eq!(
            attrs.into_inner(),
            vec![
                Attribute::new("build", "42"),
                Attribute::tag("smoke"),
                Attribute::tag("nightly"),
            ],
        );
    }

    #[test]
    fn rejects_empty_attribute_value() {
        assert!("build:".parse::<Attributes>().is_err());
    }

    #[test]
    fn cli_defaults_match_default() {
        let cli = Cli::try_parse_from(["test"]).unwrap();
        let default = Config::default();

        assert_eq!(cli.report.launch, default.launch);
        assert_eq!(cli.report.mode, LaunchMode::Default);
        assert!(cli.report.attributes.is_empty());
        assert!(!cli.report.rerun);
        assert_eq!(cli.report.skipped_issue, None);
    }

    #[test]
    fn parses_cli_options() {
        let cli = Cli::try_parse_from([
            "test",
            "--rp-launch",
            "nightly",
            "--rp-mode",
            "debug",
            "--rp-attributes",
            "os:linux;fast",
            "--rp-rerun",
            "--rp-skipped-issue",
            "false",
        ])
        .unwrap();

        assert_eq!(cli.report.launch, "nightly");
        assert_eq!(cli.report.mode, LaunchMode::Debug);
        assert_eq!(cli.report.attributes.len(), 2);
        assert!(cli.report.rerun);
        assert_eq!(cli.report.skipped_issue, Some(false));
    }

    #[test]
    fn builder_setters() {
        let cfg = Config::default()
            .launch("smoke")
            .attribute(Attribute::tag("fast"))
            .rerun(Some("launch-1".into()))
            .skipped_issue(true);

        assert_eq!(cfg.launch, "smoke");
        assert_eq!(*cfg.attributes, vec![Attribute::tag("fast")]);
        assert_eq!(cfg.rerun_of.as_deref(), Some("launch-1"));
        assert_eq!(cfg.skipped_issue, Some(true));
    }
}
